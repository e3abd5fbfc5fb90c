// roadnet\crates\rn_model\src/lib.rs

//! RoadNet 数据模型
//!
//! 重建完成的路网实体集合，供下游存储/查询层按普通记录消费。
//!
//! # 模块概览
//!
//! - [`enums`]: 车道类型、路面标线、接触点等枚举
//! - [`header`]: 地图头部记录
//! - [`road`]: 道路 / 车道段 / 车道 / 车道边界
//! - [`link`]: 车道连接
//! - [`junction`]: 路口与信号控制器
//! - [`object`]: 路侧对象与信号
//! - [`network`]: 整幅路网容器
//!
//! # 所有权约定
//!
//! 车道边界由 [`road::Section`] 统一持有（边界数 = 车道数 + 1），
//! 车道通过下标引用自己的左右边界，避免相邻车道共享边界时的
//! 双重所有权。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod enums;
pub mod header;
pub mod junction;
pub mod link;
pub mod network;
pub mod object;
pub mod road;

pub use enums::{
    ContactPoint, CoordFrame, LaneType, MarkColor, MarkType, ObjectKind, Orientation, RoadType,
};
pub use header::Header;
pub use junction::{Controller, Junction};
pub use link::LaneLink;
pub use network::RoadNetwork;
pub use object::{MapObject, ObjectGeometry};
pub use road::{BoundaryMark, CurveSummary, Lane, LaneBoundary, Road, Section};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::enums::{
        ContactPoint, CoordFrame, LaneType, MarkColor, MarkType, ObjectKind, Orientation, RoadType,
    };
    pub use crate::header::Header;
    pub use crate::junction::{Controller, Junction};
    pub use crate::link::LaneLink;
    pub use crate::network::RoadNetwork;
    pub use crate::object::{MapObject, ObjectGeometry};
    pub use crate::road::{BoundaryMark, CurveSummary, Lane, LaneBoundary, Road, Section};
}
