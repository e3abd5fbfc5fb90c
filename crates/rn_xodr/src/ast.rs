// roadnet\crates\rn_xodr\src/ast.rs

//! 解析后的 OpenDRIVE 文档模型
//!
//! 尽量贴近源文档的层次：道路持有几何元素、车道偏移与高程
//! 多项式、车道段与对象；路口持有连接表。重建管线在这些原始
//! 记录之上采样出离散路网。
//!
//! # 求值约定
//!
//! 多项式记录 (`s, a, b, c, d`) 的求值参数是**相对记录起点**的
//! 弧长；道路级求值函数接受**绝对**弧长并自行定位记录。

use rn_foundation::ids::{JunctionId, LaneId, RoadId};
use rn_foundation::BuildTolerances;
use rn_geo::{Curve, Point2, Point3};
use rn_model::{ContactPoint, Header, LaneType, MarkColor, MarkType, ObjectKind, Orientation, RoadType};
use rn_model::road::CurveSummary;

/// 多项式高次项低于该值按直线段处理
const POLY_FLAT: f64 = 1e-6;

// ============================================================================
// 多项式记录
// ============================================================================

/// 三次多项式记录 value = a + b·ds + c·ds² + d·ds³
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Poly3Seg {
    /// 记录起点弧长（相对所在容器）
    pub s: f64,
    /// 常数项
    pub a: f64,
    /// 一次项
    pub b: f64,
    /// 二次项
    pub c: f64,
    /// 三次项
    pub d: f64,
}

impl Poly3Seg {
    /// 相对记录起点 `ds` 处的取值
    #[inline]
    #[must_use]
    pub fn value(&self, ds: f64) -> f64 {
        self.a + self.b * ds + self.c * ds * ds + self.d * ds * ds * ds
    }

    /// 相对记录起点 `ds` 处的一阶导数
    #[inline]
    #[must_use]
    pub fn slope(&self, ds: f64) -> f64 {
        self.b + 2.0 * self.c * ds + 3.0 * self.d * ds * ds
    }

    /// 高次项是否可忽略（记录整体近似线性）
    #[inline]
    #[must_use]
    pub fn is_linear(&self) -> bool {
        self.c.abs() < POLY_FLAT && self.d.abs() < POLY_FLAT
    }
}

/// 绝对弧长 `s` 落在哪条记录上：取最后一条起点不超过 `s` 的记录
#[must_use]
pub fn piecewise_index(segs: &[Poly3Seg], s: f64) -> Option<usize> {
    if segs.is_empty() {
        return None;
    }
    let mut idx = 0;
    for (i, seg) in segs.iter().enumerate() {
        if seg.s <= s {
            idx = i;
        } else {
            break;
        }
    }
    Some(idx)
}

/// 绝对弧长 `s` 处的分段多项式取值，无记录为 0
#[must_use]
pub fn piecewise_value(segs: &[Poly3Seg], s: f64) -> f64 {
    match piecewise_index(segs, s) {
        Some(i) => segs[i].value(s - segs[i].s),
        None => 0.0,
    }
}

// ============================================================================
// 车道与车道段
// ============================================================================

/// 车道标线记录
#[derive(Debug, Clone, Copy, Default)]
pub struct OdrMark {
    /// 相对段起点的弧长
    pub s_offset: f64,
    /// 线型
    pub kind: MarkType,
    /// 颜色
    pub color: MarkColor,
    /// 标线宽度 [m]
    pub width: f64,
}

/// 原始车道记录
#[derive(Debug, Clone, Default)]
pub struct OdrLane {
    /// 有符号车道 id
    pub id: LaneId,
    /// 车道类型
    pub kind: LaneType,
    /// 宽度多项式，`s` 相对段起点
    pub widths: Vec<Poly3Seg>,
    /// 标线记录
    pub marks: Vec<OdrMark>,
    /// 车道限速 [m/s]，0 表示未声明
    pub speed_limit: f64,
    /// 前驱车道 id
    pub predecessor: Option<LaneId>,
    /// 后继车道 id
    pub successor: Option<LaneId>,
    /// 摩擦系数
    pub friction: f64,
    /// 材质纵向偏移
    pub material_offset: f64,
}

impl OdrLane {
    /// 相对段起点 `ds` 处的车道宽度
    #[must_use]
    pub fn width_at(&self, ds: f64) -> f64 {
        piecewise_value(&self.widths, ds).max(0.0)
    }

    /// `ds` 处生效的标线记录
    #[must_use]
    pub fn mark_at(&self, ds: f64) -> OdrMark {
        let mut current = OdrMark::default();
        for mark in &self.marks {
            if mark.s_offset <= ds {
                current = *mark;
            } else {
                break;
            }
        }
        current
    }
}

/// 原始车道段：起点弧长 + 按 id 升序的车道表
#[derive(Debug, Clone, Default)]
pub struct OdrSection {
    /// 段起点绝对弧长
    pub s: f64,
    /// 车道，按 id 升序（右侧负 id 在前），不含 0 号中心车道
    pub lanes: Vec<OdrLane>,
    /// 中心车道（id = 0）的标线记录，决定最内侧边界样式
    pub center_marks: Vec<OdrMark>,
}

impl OdrSection {
    /// 按 id 查车道
    #[must_use]
    pub fn lane(&self, id: LaneId) -> Option<&OdrLane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    /// 右侧（id < 0）车道数
    #[must_use]
    pub fn right_count(&self) -> usize {
        self.lanes.iter().filter(|l| l.id < 0).count()
    }

    /// 左侧（id > 0）车道数
    #[must_use]
    pub fn left_count(&self) -> usize {
        self.lanes.iter().filter(|l| l.id > 0).count()
    }
}

// ============================================================================
// 对象
// ============================================================================

/// 对象重复记录
#[derive(Debug, Clone, Copy, Default)]
pub struct OdrRepeat {
    /// 起点弧长
    pub s: f64,
    /// 覆盖长度
    pub length: f64,
    /// 重复间距，0 表示连续展开
    pub distance: f64,
    /// 起点横向偏移
    pub t_start: f64,
    /// 终点横向偏移
    pub t_end: f64,
    /// 起点宽度
    pub width_start: f64,
    /// 终点宽度
    pub width_end: f64,
    /// 起点高度
    pub height_start: f64,
    /// 终点高度
    pub height_end: f64,
    /// 起点高程偏移
    pub z_offset_start: f64,
    /// 终点高程偏移
    pub z_offset_end: f64,
}

/// 原始路侧对象 / 信号记录
#[derive(Debug, Clone, Default)]
pub struct OdrObject {
    /// 对象 id
    pub id: u64,
    /// 名称
    pub name: String,
    /// 类别
    pub kind: ObjectKind,
    /// 是否来自 `<signals>` 小节
    pub is_signal: bool,
    /// 弧长
    pub s: f64,
    /// 横向偏移
    pub t: f64,
    /// 高程偏移
    pub z_offset: f64,
    /// 相对航向
    pub hdg: f64,
    /// 俯仰
    pub pitch: f64,
    /// 滚转
    pub roll: f64,
    /// 朝向
    pub orientation: Orientation,
    /// 长
    pub length: f64,
    /// 宽
    pub width: f64,
    /// 高
    pub height: f64,
    /// 重复记录
    pub repeat: Option<OdrRepeat>,
    /// 轮廓角点（局部 u, v, z）
    pub outline: Vec<Point3>,
    /// 轮廓是否闭合
    pub outline_closed: bool,
    /// 有效性声明（fromLane, toLane）
    pub validity: Vec<(LaneId, LaneId)>,
}

// ============================================================================
// 道路
// ============================================================================

/// 道路级前驱/后继连接
#[derive(Debug, Clone, Copy)]
pub struct OdrRoadLink {
    /// 目标是否路口
    pub is_junction: bool,
    /// 目标 id
    pub id: RoadId,
    /// 接触端
    pub contact: ContactPoint,
}

/// 原始道路记录
#[derive(Debug, Clone, Default)]
pub struct OdrRoad {
    /// 道路 id
    pub id: RoadId,
    /// 名称
    pub name: String,
    /// 参考线长度
    pub length: f64,
    /// 所属路口，非路口道路为 0
    pub junction: JunctionId,
    /// 道路类别
    pub kind: RoadType,
    /// 道路限速 [m/s]
    pub speed_limit: f64,
    /// planView 几何，按弧长升序
    pub geometry: Vec<Curve>,
    /// 车道偏移多项式（绝对弧长）
    pub lane_offsets: Vec<Poly3Seg>,
    /// 高程多项式（绝对弧长）
    pub elevations: Vec<Poly3Seg>,
    /// 车道段，按弧长升序
    pub sections: Vec<OdrSection>,
    /// 前驱连接
    pub predecessor: Option<OdrRoadLink>,
    /// 后继连接
    pub successor: Option<OdrRoadLink>,
    /// 对象与信号
    pub objects: Vec<OdrObject>,
}

impl OdrRoad {
    /// 绝对弧长 `s` 所在的几何元素
    #[must_use]
    pub fn element_at(&self, s: f64) -> Option<&Curve> {
        if self.geometry.is_empty() {
            return None;
        }
        let mut idx = 0;
        for (i, geom) in self.geometry.iter().enumerate() {
            if geom.offset() <= s {
                idx = i;
            } else {
                break;
            }
        }
        Some(&self.geometry[idx])
    }

    /// 参考线平面坐标（未计车道偏移）
    #[must_use]
    pub fn ref_point(&self, s: f64) -> Point2 {
        self.element_at(s)
            .map(|g| g.point(s))
            .unwrap_or(Point2::ZERO)
    }

    /// 参考线航向
    #[must_use]
    pub fn ref_heading(&self, s: f64) -> f64 {
        self.element_at(s).map(|g| g.heading(s)).unwrap_or(0.0)
    }

    /// 参考线外法向
    #[must_use]
    pub fn ref_normal(&self, s: f64) -> Point2 {
        self.element_at(s)
            .map(|g| g.normal(s))
            .unwrap_or(Point2::new(0.0, 1.0))
    }

    /// 车道偏移
    #[inline]
    #[must_use]
    pub fn lane_offset(&self, s: f64) -> f64 {
        piecewise_value(&self.lane_offsets, s)
    }

    /// 高程
    #[inline]
    #[must_use]
    pub fn elevation(&self, s: f64) -> f64 {
        piecewise_value(&self.elevations, s)
    }

    /// 全路采样站位（绝对弧长）
    ///
    /// 逐元素自适应采样后拼接，跳过后续元素的首点避免重复；
    /// 退化元素不贡献站位。
    #[must_use]
    pub fn stations(&self, tol: &BuildTolerances) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::new();
        for geom in &self.geometry {
            let iv = geom.intervals(tol.min_step, tol.min_angle);
            for (j, rel) in iv.iter().enumerate() {
                if j == 0 && !out.is_empty() {
                    continue;
                }
                out.push(geom.offset() + rel);
            }
        }
        out
    }

    /// 采样含车道偏移的参考线，高程来自 elevation 记录
    #[must_use]
    pub fn reference_line(&self, stations: &[f64]) -> Vec<Point3> {
        stations
            .iter()
            .map(|&s| {
                let p = self.ref_point(s);
                let n = self.ref_normal(s);
                let off = self.lane_offset(s);
                Point3::new(p.x + n.x * off, p.y + n.y * off, self.elevation(s))
            })
            .collect()
    }

    /// 曲率概要：直线/圆弧整段一条记录，参数多项式按 `window` 米
    /// 分块拟合，螺旋线与普通多项式不产生记录
    #[must_use]
    pub fn curvature_records(&self, window: f64) -> Vec<CurveSummary> {
        let mut out = Vec::new();
        for geom in &self.geometry {
            match geom {
                Curve::Line { .. } | Curve::Arc { .. } => {
                    out.push(CurveSummary::new(
                        geom.offset(),
                        geom.length(),
                        geom.curvature(geom.offset()),
                    ));
                }
                Curve::ParamPoly3 { .. } => {
                    chunked(geom.length(), window, |start, len| {
                        out.push(CurveSummary::new(
                            geom.offset() + start,
                            len,
                            geom.curvature(geom.offset() + start),
                        ));
                    });
                }
                Curve::Spiral { .. } | Curve::Poly3 { .. } => {}
            }
        }
        out
    }

    /// 坡度概要：近线性的高程记录整段一条，其余按 `window` 米
    /// 分块取平均变化率
    #[must_use]
    pub fn slope_records(&self, window: f64) -> Vec<CurveSummary> {
        let mut out = Vec::new();
        for (i, ele) in self.elevations.iter().enumerate() {
            let rec_len = match self.elevations.get(i + 1) {
                Some(next) => next.s - ele.s,
                None => self.length - ele.s,
            };
            if ele.is_linear() {
                out.push(CurveSummary::new(ele.s, rec_len, ele.b));
            } else {
                chunked(rec_len, window, |start, len| {
                    let slope = (ele.value(start + len) - ele.value(start)) / len;
                    out.push(CurveSummary::new(ele.s + start, len, slope));
                });
            }
        }
        out
    }

    /// 高程控制点 (s, z, slope)
    ///
    /// 近线性记录（或显式声明控制点语义的数据源）每条一个控制点，
    /// 其余记录取 4 个等分样本；末条记录补道路终点。
    #[must_use]
    pub fn ele_control_points(&self, single_per_record: bool) -> Vec<Point3> {
        let mut out = Vec::new();
        let n = self.elevations.len();
        for (i, ele) in self.elevations.iter().enumerate() {
            let rec_len = match self.elevations.get(i + 1) {
                Some(next) => next.s - ele.s,
                None => self.length - ele.s,
            };
            if ele.is_linear() || single_per_record {
                out.push(Point3::new(ele.s, ele.value(0.0), ele.slope(0.0)));
            } else {
                for k in 0..4 {
                    let ds = k as f64 / 5.0 * rec_len;
                    out.push(Point3::new(ele.s + ds, ele.value(ds), ele.slope(ds)));
                }
            }
            if i + 1 == n {
                out.push(Point3::new(
                    self.length,
                    ele.value(rec_len),
                    ele.slope(rec_len),
                ));
            }
        }
        out
    }

    /// 平面控制点 (x, y, hdg) 及其插值方式
    ///
    /// 全直线/圆弧几何返回对应类型；含参数多项式时按 catmull-rom
    /// 输出并在两端镜像补点；含其他形状返回 `None`。
    #[must_use]
    pub fn control_points(&self) -> Option<(&'static str, Vec<Point3>)> {
        let mut kind = "none";
        let mut points: Vec<Point3> = Vec::new();
        for geom in &self.geometry {
            match geom {
                Curve::Line { .. } | Curve::Arc { .. } => {
                    let s0 = geom.offset();
                    let s1 = geom.end_offset();
                    let p0 = geom.point(s0);
                    points.push(Point3::new(p0.x, p0.y, geom.heading(s0)));
                    let p1 = geom.point(s1);
                    points.push(Point3::new(p1.x, p1.y, geom.heading(s1)));
                    kind = if matches!(geom, Curve::Line { .. }) {
                        "line"
                    } else {
                        "arc"
                    };
                }
                Curve::ParamPoly3 { .. } => {
                    if points.is_empty() {
                        let s0 = geom.offset();
                        let p0 = geom.point(s0);
                        points.push(Point3::new(p0.x, p0.y, geom.heading(s0)));
                    }
                    let s1 = geom.end_offset();
                    let p1 = geom.point(s1);
                    points.push(Point3::new(p1.x, p1.y, geom.heading(s1)));
                    kind = "catmullrom";
                }
                _ => return None,
            }
        }
        if points.len() < 2 {
            return None;
        }
        if kind == "catmullrom" {
            // 两端镜像补点，保证插值经过首尾
            let head = Point3::new(
                2.0 * points[0].x - points[1].x,
                2.0 * points[0].y - points[1].y,
                points[0].z,
            );
            let last = points.len() - 1;
            let tail = Point3::new(
                2.0 * points[last].x - points[last - 1].x,
                2.0 * points[last].y - points[last - 1].y,
                points[last].z,
            );
            points.insert(0, head);
            points.push(tail);
        }
        Some((kind, points))
    }

    /// 车道段弧长区间 `[begin, end)`
    #[must_use]
    pub fn section_range(&self, index: usize) -> (f64, f64) {
        let begin = self.sections.get(index).map(|s| s.s).unwrap_or(0.0);
        let end = match self.sections.get(index + 1) {
            Some(next) => next.s,
            None => self.length,
        };
        (begin, end)
    }

    /// 绝对弧长所在的车道段下标
    #[must_use]
    pub fn section_index_at(&self, s: f64) -> usize {
        let mut idx = 0;
        for (i, sec) in self.sections.iter().enumerate() {
            if sec.s <= s {
                idx = i;
            } else {
                break;
            }
        }
        idx
    }

    /// 前驱车道配对 (对方车道, 本路首段车道)
    #[must_use]
    pub fn predecessor_pairs(&self) -> Vec<(LaneId, LaneId)> {
        let Some(front) = self.sections.first() else {
            return Vec::new();
        };
        if self.predecessor.is_none() {
            return Vec::new();
        }
        front
            .lanes
            .iter()
            .filter_map(|l| l.predecessor.map(|p| (p, l.id)))
            .collect()
    }

    /// 后继车道配对 (本路末段车道, 对方车道)
    #[must_use]
    pub fn successor_pairs(&self) -> Vec<(LaneId, LaneId)> {
        let Some(back) = self.sections.last() else {
            return Vec::new();
        };
        if self.successor.is_none() {
            return Vec::new();
        }
        back.lanes
            .iter()
            .filter_map(|l| l.successor.map(|n| (l.id, n)))
            .collect()
    }

    /// 贯穿整条道路的车道链
    ///
    /// 每条链形如 `[前驱车道, 各段车道…, 后继车道]`，长度为段数+2；
    /// 任一跳缺失的链被丢弃。路口连接道路依赖这些链拼接连接几何。
    #[must_use]
    pub fn lane_chains(&self) -> Vec<Vec<LaneId>> {
        let mut chains = Vec::new();
        if self.predecessor.is_none() || self.successor.is_none() {
            return chains;
        }
        let Some(front) = self.sections.first() else {
            return chains;
        };
        for lane in &front.lanes {
            let (Some(from), Some(to)) = (lane.predecessor, lane.successor) else {
                continue;
            };
            let mut chain = vec![from, lane.id, to];
            for sec in &self.sections[1..] {
                let prev_id = chain[chain.len() - 2];
                let cur_id = *chain.last().unwrap_or(&0);
                let hop = sec.lanes.iter().find(|l| {
                    l.predecessor == Some(prev_id)
                        && l.id == cur_id
                        && l.successor.is_some()
                });
                if let Some(hop) = hop {
                    if let Some(next) = hop.successor {
                        chain.push(next);
                    }
                }
            }
            if chain.len() == self.sections.len() + 2 {
                chains.push(chain);
            }
        }
        chains
    }
}

// ============================================================================
// 路口
// ============================================================================

/// 路口连接记录
#[derive(Debug, Clone, Default)]
pub struct OdrConnection {
    /// 连接 id
    pub id: u64,
    /// 来路
    pub incoming_road: RoadId,
    /// 连接道路
    pub connecting_road: RoadId,
    /// 连接道路的接触端
    pub contact: ContactPoint,
    /// 车道配对 (来路车道, 连接道路车道)
    pub lane_links: Vec<(LaneId, LaneId)>,
}

/// 原始路口记录
#[derive(Debug, Clone, Default)]
pub struct OdrJunction {
    /// 路口 id
    pub id: JunctionId,
    /// 名称
    pub name: String,
    /// 连接表
    pub connections: Vec<OdrConnection>,
    /// 关联控制器 id
    pub controller_ids: Vec<u64>,
}

/// 文档级信号控制器记录
#[derive(Debug, Clone, Default)]
pub struct OdrController {
    /// 控制器 id
    pub id: u64,
    /// 名称
    pub name: String,
    /// 受控信号 id
    pub signals: Vec<u64>,
}

/// 完整 OpenDRIVE 文档
#[derive(Debug, Clone, Default)]
pub struct OdrMap {
    /// 头部
    pub header: Header,
    /// 道路表
    pub roads: Vec<OdrRoad>,
    /// 路口表
    pub junctions: Vec<OdrJunction>,
    /// 控制器表
    pub controllers: Vec<OdrController>,
}

impl OdrMap {
    /// 按 id 查道路
    #[must_use]
    pub fn road(&self, id: RoadId) -> Option<&OdrRoad> {
        self.roads.iter().find(|r| r.id == id)
    }
}

/// 把 `[0, total)` 按窗口 `window` 分块回调 (start, len)
fn chunked(total: f64, window: f64, mut f: impl FnMut(f64, f64)) {
    let mut i = 0u32;
    while window * f64::from(i) < total {
        let start = window * f64::from(i);
        let len = if start > total - window {
            total - start
        } else {
            window
        };
        f(start, len);
        i += 1;
    }
}
