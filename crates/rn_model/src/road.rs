// roadnet\crates\rn_model\src/road.rs

//! 道路 / 车道段 / 车道 / 车道边界
//!
//! # 设计原则
//!
//! - 车道边界由所在 [`Section`] 统一持有，车道通过下标引用左右
//!   边界；相邻车道共用同一条边界时不会产生重复拷贝
//! - 所有几何均为离散采样折线，采样密度在重建阶段按曲率自适应
//! - 坡度/曲率概要按参考线里程分段记录，段间可叠加取均值

use rn_foundation::ids::{BoundaryId, JunctionId, LaneId, RoadId, SectionId, JUNCTION_NONE};
use rn_geo::{Point3, Polyline, Rect};
use serde::{Deserialize, Serialize};

use crate::enums::{CoordFrame, LaneType, MarkColor, MarkType, RoadType};

// ============================================================================
// 边界
// ============================================================================

/// 车道边界标线样式
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryMark {
    /// 线型
    pub kind: MarkType,
    /// 颜色
    pub color: MarkColor,
    /// 标线宽度 [m]，未声明为 0
    pub width: f64,
}

/// 车道边界：一条带标线样式的采样折线
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneBoundary {
    /// 全局唯一边界 id
    pub id: BoundaryId,
    /// 采样几何
    pub geometry: Polyline,
    /// 标线样式
    pub mark: BoundaryMark,
}

impl LaneBoundary {
    /// 就地反转采样顺序
    pub fn reverse(&mut self) {
        self.geometry.reverse();
    }
}

// ============================================================================
// 车道
// ============================================================================

/// 车道
///
/// `id` 沿用 OpenDRIVE 约定：负为右侧（前进方向），正为左侧，
/// 不存在 0 号车道（参考线本身）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lane {
    /// 所属道路
    pub road: RoadId,
    /// 所属车道段
    pub section: SectionId,
    /// 车道 id（有符号）
    pub id: LaneId,
    /// 车道类型
    pub kind: LaneType,
    /// 限速 [m/s]，0 表示继承道路限速
    pub speed_limit: f64,
    /// 车道中心线采样
    pub geometry: Polyline,
    /// 每个采样点处的车道宽度 [m]，与 `geometry` 等长
    pub widths: Vec<f64>,
    /// 左边界在所属段 `boundaries` 中的下标
    pub left_boundary: usize,
    /// 右边界在所属段 `boundaries` 中的下标
    pub right_boundary: usize,
    /// 摩擦系数，未声明为 0
    pub friction: f64,
    /// 路面材质纵向偏移 [m]
    pub material_offset: f64,
}

impl Lane {
    /// 车道代表宽度：取采样宽度的首元素，空为 0
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.widths.first().copied().unwrap_or(0.0)
    }

    /// 车道平均宽度
    #[must_use]
    pub fn mean_width(&self) -> f64 {
        if self.widths.is_empty() {
            return 0.0;
        }
        self.widths.iter().sum::<f64>() / self.widths.len() as f64
    }
}

// ============================================================================
// 车道段
// ============================================================================

/// 车道段：参考线上一段里程内车道数目不变的区间
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    /// 段 id，沿参考线从 0 递增
    pub id: SectionId,
    /// 段起始里程 [m]
    pub start_s: f64,
    /// 段长度 [m]
    pub length: f64,
    /// 段内全部车道边界，数目 = 车道数 + 1
    pub boundaries: Vec<LaneBoundary>,
    /// 段内车道，按 id 从小到大排列
    pub lanes: Vec<Lane>,
    /// 段内平均纵坡
    pub mean_slope: f64,
    /// 段内平均曲率
    pub mean_curvature: f64,
}

impl Section {
    /// 按车道 id 查车道
    #[must_use]
    pub fn lane(&self, lane_id: LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == lane_id)
    }

    /// 按车道 id 查车道（可变）
    pub fn lane_mut(&mut self, lane_id: LaneId) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|l| l.id == lane_id)
    }

    /// 车道的左边界
    #[must_use]
    pub fn left_boundary_of(&self, lane: &Lane) -> Option<&LaneBoundary> {
        self.boundaries.get(lane.left_boundary)
    }

    /// 车道的右边界
    #[must_use]
    pub fn right_boundary_of(&self, lane: &Lane) -> Option<&LaneBoundary> {
        self.boundaries.get(lane.right_boundary)
    }

    /// 段终止里程
    #[inline]
    #[must_use]
    pub fn end_s(&self) -> f64 {
        self.start_s + self.length
    }
}

// ============================================================================
// 概要曲线
// ============================================================================

/// 沿参考线分段记录的标量概要（坡度或曲率）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    /// 段起始里程 [m]
    pub start_s: f64,
    /// 段长度 [m]
    pub length: f64,
    /// 段内取值
    pub value: f64,
}

impl CurveSummary {
    /// 创建
    #[inline]
    #[must_use]
    pub const fn new(start_s: f64, length: f64, value: f64) -> Self {
        Self {
            start_s,
            length,
            value,
        }
    }

    /// 与区间 `[from, to]` 的重叠长度
    #[must_use]
    pub fn overlap(&self, from: f64, to: f64) -> f64 {
        let lo = self.start_s.max(from);
        let hi = (self.start_s + self.length).min(to);
        (hi - lo).max(0.0)
    }
}

/// 区间 `[from, to]` 内按重叠长度加权的概要均值
#[must_use]
pub fn weighted_mean(segments: &[CurveSummary], from: f64, to: f64) -> f64 {
    let mut total = 0.0;
    let mut acc = 0.0;
    for seg in segments {
        let w = seg.overlap(from, to);
        if w > 0.0 {
            total += w;
            acc += seg.value * w;
        }
    }
    if total > 0.0 {
        acc / total
    } else {
        0.0
    }
}

// ============================================================================
// 道路
// ============================================================================

/// 道路
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Road {
    /// 道路 id
    pub id: RoadId,
    /// 名称
    pub name: String,
    /// 类别
    pub kind: RoadType,
    /// 所属路口，普通道路为 [`JUNCTION_NONE`]
    pub junction: JunctionId,
    /// 参考线长度 [m]
    pub length: f64,
    /// 道路限速 [m/s]
    pub speed_limit: f64,
    /// 参考线（含车道偏移）采样
    pub geometry: Polyline,
    /// 车道段
    pub sections: Vec<Section>,
    /// 曲率概要
    pub curvature: Vec<CurveSummary>,
    /// 坡度概要
    pub slope: Vec<CurveSummary>,
    /// 高程控制点（里程, 高程）对，空表示无高程数据
    pub ele_control: Vec<Point3>,
    /// 几何当前坐标 frame
    pub coord_frame: CoordFrame,
    /// 是否双向（未分侧）道路，拆分后为 false
    pub bidirectional: bool,
}

impl Road {
    /// 是否路口内部连接道路
    #[inline]
    #[must_use]
    pub fn is_junction_road(&self) -> bool {
        self.junction != JUNCTION_NONE
    }

    /// 全路几何（含所有车道边界）的包络框
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut any = false;
        let mut take = |p: &Point3| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            any = true;
        };
        for p in self.geometry.points() {
            take(p);
        }
        for sec in &self.sections {
            for bdy in &sec.boundaries {
                for p in bdy.geometry.points() {
                    take(p);
                }
            }
        }
        if any {
            Some(Rect::from_corners(
                rn_geo::Point2::new(min_x, min_y),
                rn_geo::Point2::new(max_x, max_y),
            ))
        } else {
            None
        }
    }

    /// 区间平均坡度
    #[must_use]
    pub fn mean_slope(&self, from: f64, to: f64) -> f64 {
        weighted_mean(&self.slope, from, to)
    }

    /// 区间平均曲率
    #[must_use]
    pub fn mean_curvature(&self, from: f64, to: f64) -> f64 {
        weighted_mean(&self.curvature, from, to)
    }
}
