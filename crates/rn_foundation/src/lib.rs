// roadnet\crates\rn_foundation\src/lib.rs

//! RoadNet Foundation Layer
//!
//! 零依赖基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 (`RnError` / `RnResult`)
//! - [`ids`]: 路网实体的强类型 ID 与无效哨兵值
//! - [`tolerance`]: 几何重建使用的可调容差集合
//!
//! # 设计原则
//!
//! 1. **零外部依赖**: 仅依赖 serde 和 thiserror
//! 2. **类型安全**: ID 类别在编译期区分，避免道路/车道/边界 ID 混用
//! 3. **容差可调**: 平滑与匹配阈值不是硬编码契约，而是参数
//!
//! # 示例
//!
//! ```
//! use rn_foundation::{RnError, RnResult, ids::LaneUid};
//!
//! fn find_lane(uid: LaneUid) -> RnResult<()> {
//!     Err(RnError::not_found(format!("lane {uid}")))
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod tolerance;

// 重导出常用类型
pub use error::{RnError, RnResult};
pub use ids::{
    BoundaryId, JunctionId, LaneId, LaneUid, LinkId, RoadId, SectionId, JUNCTION_NONE,
    LANE_ID_INVALID, ROAD_ID_INVALID, SECTION_ID_INVALID,
};
pub use tolerance::BuildTolerances;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{RnError, RnResult};
    pub use crate::ids::{
        BoundaryId, JunctionId, LaneId, LaneUid, LinkId, RoadId, SectionId, JUNCTION_NONE,
        LANE_ID_INVALID, ROAD_ID_INVALID, SECTION_ID_INVALID,
    };
    pub use crate::tolerance::BuildTolerances;
    pub use crate::{ensure, require};
}
