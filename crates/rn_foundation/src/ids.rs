// roadnet\crates\rn_foundation\src/ids.rs

//! 路网实体 ID 定义
//!
//! OpenDRIVE 中道路/路口 ID 为非负整数，车道 ID 为有符号整数
//! （正负号编码行车方向，0 保留给中心车道）。缺失的引用统一用
//! 哨兵值表示，避免 `Option` 在热路径上的包装开销。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 道路 ID
pub type RoadId = u64;
/// 车道段索引（在所属道路内从 0 递增）
pub type SectionId = u64;
/// 有符号车道 ID
pub type LaneId = i64;
/// 车道边界 ID（全局递增分配）
pub type BoundaryId = u64;
/// 车道连接 ID（全局递增分配）
pub type LinkId = u64;
/// 路口 ID
pub type JunctionId = u64;

/// 无效道路 ID
pub const ROAD_ID_INVALID: RoadId = RoadId::MAX;
/// 无效车道段索引
pub const SECTION_ID_INVALID: SectionId = SectionId::MAX;
/// 无效车道 ID
pub const LANE_ID_INVALID: LaneId = LaneId::MAX;
/// 道路不属于任何路口
pub const JUNCTION_NONE: JunctionId = 0;

/// 全局唯一车道定位：(道路, 车道段, 车道)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneUid {
    /// 所属道路
    pub road: RoadId,
    /// 所属车道段
    pub section: SectionId,
    /// 车道 ID（有符号）
    pub lane: LaneId,
}

impl LaneUid {
    /// 创建车道定位
    #[inline]
    pub const fn new(road: RoadId, section: SectionId, lane: LaneId) -> Self {
        Self {
            road,
            section,
            lane,
        }
    }

    /// 全无效哨兵
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            road: ROAD_ID_INVALID,
            section: SECTION_ID_INVALID,
            lane: LANE_ID_INVALID,
        }
    }

    /// 是否为有效定位
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.road != ROAD_ID_INVALID
            && self.section != SECTION_ID_INVALID
            && self.lane != LANE_ID_INVALID
    }
}

impl fmt::Display for LaneUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.road, self.section, self.lane)
    }
}
