// roadnet\crates\rn_build\src/section_builder.rs

//! 单条道路的车道段重建
//!
//! 沿参考线按曲率自适应采样，逐段累加车道宽度得到每条车道的
//! 中心线与左右边界。车道段衔接处宽度跳变的车道向同段的连续
//! 车道做 logistic 过渡，避免重建出的几何出现台阶。
//!
//! # 边界布局
//!
//! 段内边界按空间顺序从最左排到最右，数目 = 车道数 + 1；
//! 下标 `n_left` 处是参考线（含车道偏移）本身对应的中心边界，
//! 车道 `p` 的左右边界固定为 `p` 与 `p + 1`。

use std::sync::atomic::{AtomicU64, Ordering};

use rn_foundation::ids::LaneId;
use rn_foundation::{BuildTolerances, RnError, RnResult};
use rn_geo::{Point2, Point3, Polyline};
use rn_model::road::{weighted_mean, CurveSummary};
use rn_model::{
    BoundaryMark, CoordFrame, Header, Lane, LaneBoundary, MapObject, Road, Section,
};
use rn_xodr::{OdrLane, OdrRoad};

use crate::objects::place_objects;

/// 特定数据源：高程记录按控制点语义逐条取点
const VENDOR_CONTROL_POINTS: &str = "tadsim v2.0";

/// 重建完成的单条道路及其对象
#[derive(Debug, Clone)]
pub struct BuiltRoad {
    /// 道路
    pub road: Road,
    /// 道路上的对象与信号
    pub objects: Vec<MapObject>,
}

/// 车道段的中间采样数据
struct SectionWork {
    /// 原始段区间（未内缩）
    start: f64,
    end: f64,
    /// 内缩后的采样站位（绝对弧长）
    stations: Vec<f64>,
    /// 距内缩段起点的弧长
    ds: Vec<f64>,
    /// 参考线采样（含车道偏移与高程）
    ref_pts: Vec<Point3>,
    /// 各站位的参考线外法向
    normals: Vec<Point2>,
    /// 段内车道在源记录中的下标，按 id 降序（左侧在前）
    order: Vec<usize>,
    /// 各车道 id，与 `order` 对齐
    lane_ids: Vec<LaneId>,
    /// 各车道中心线相对参考线的有符号偏移（右正），逐站位
    centers: Vec<Vec<f64>>,
    /// 各边界相对参考线的有符号偏移，数目 = 车道数 + 1
    bounds: Vec<Vec<f64>>,
    /// 左侧（id > 0）车道数，也是中心边界下标
    n_left: usize,
}

impl SectionWork {
    fn lane<'a>(&self, odr: &'a OdrRoad, section: usize, pos: usize) -> &'a OdrLane {
        &odr.sections[section].lanes[self.order[pos]]
    }
}

/// 重建一条道路
///
/// `bound_ids` 为全局边界 id 分配器，多条道路并行重建时共享。
pub fn build_road(
    odr: &OdrRoad,
    header: &Header,
    bound_ids: &AtomicU64,
    tol: &BuildTolerances,
) -> RnResult<BuiltRoad> {
    if odr.geometry.is_empty() {
        return Err(RnError::structure(format!("道路 {} 没有参考线几何", odr.id)));
    }
    let offset = Point2::new(header.west, header.south);
    let stations = odr.stations(tol);
    let curvature = odr.curvature_records(tol.curvature_window);
    let slope = odr.slope_records(tol.curvature_window);

    // 第一阶段：逐段采样并累加宽度
    let mut works: Vec<SectionWork> = (0..odr.sections.len())
        .map(|i| sample_section(odr, i, &stations, offset, tol))
        .collect();

    // 第二阶段：段间宽度跳变平滑
    smooth_section_joints(odr, &mut works, tol);

    // 第三阶段：落成边界与车道
    let sections = works
        .iter()
        .enumerate()
        .map(|(i, work)| emit_section(odr, i, work, bound_ids, &curvature, &slope))
        .collect();

    let road = Road {
        id: odr.id,
        name: odr.name.clone(),
        kind: odr.kind,
        junction: odr.junction,
        length: odr.length,
        speed_limit: odr.speed_limit,
        geometry: sample_reference(odr, &stations, offset),
        sections,
        curvature,
        slope,
        ele_control: if odr.elevations.is_empty() {
            Vec::new()
        } else {
            odr.ele_control_points(header.vendor == VENDOR_CONTROL_POINTS)
        },
        coord_frame: CoordFrame::Planar,
        bidirectional: odr
            .sections
            .iter()
            .any(|s| s.lanes.iter().any(|l| l.id > 0)),
    };

    let objects = place_objects(odr, header);
    Ok(BuiltRoad { road, objects })
}

/// 采样整条参考线（含车道偏移），平移到头部声明的原点
fn sample_reference(odr: &OdrRoad, stations: &[f64], offset: Point2) -> Polyline {
    odr.reference_line(stations)
        .into_iter()
        .map(|p| Point3::new(p.x + offset.x, p.y + offset.y, p.z))
        .collect()
}

/// 采样一个车道段并累加出车道中心/边界偏移
fn sample_section(
    odr: &OdrRoad,
    index: usize,
    road_stations: &[f64],
    offset: Point2,
    tol: &BuildTolerances,
) -> SectionWork {
    let (start, end) = odr.section_range(index);
    let sec_s = start + tol.section_inset;
    let sec_e = end - tol.section_inset;

    // 段两端各取一个内缩站位，中间沿用参考线自适应站位
    let mut stations = Vec::new();
    if sec_s < sec_e {
        stations.push(sec_s);
        stations.extend(
            road_stations
                .iter()
                .copied()
                .filter(|&s| s > sec_s && s < sec_e),
        );
        stations.push(sec_e);
    }

    let ds: Vec<f64> = stations.iter().map(|&s| s - sec_s).collect();
    let ref_pts: Vec<Point3> = odr
        .reference_line(&stations)
        .into_iter()
        .map(|p| Point3::new(p.x + offset.x, p.y + offset.y, p.z))
        .collect();
    let normals: Vec<Point2> = stations.iter().map(|&s| odr.ref_normal(s)).collect();

    let section = &odr.sections[index];
    // 车道按 id 降序排列：左侧外→内，中心，右侧内→外
    let mut order: Vec<usize> = (0..section.lanes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(section.lanes[i].id));
    let lane_ids: Vec<LaneId> = order.iter().map(|&i| section.lanes[i].id).collect();
    let n_left = lane_ids.iter().filter(|&&id| id > 0).count();
    let n_lanes = order.len();
    let n_pts = stations.len();

    let mut centers = vec![vec![0.0; n_pts]; n_lanes];
    let mut bounds = vec![vec![0.0; n_pts]; n_lanes + 1];

    // 右侧：从中心边界向外累加（右为正）
    let mut acc = vec![0.0; n_pts];
    for pos in n_left..n_lanes {
        let lane = &section.lanes[order[pos]];
        for (j, &d) in ds.iter().enumerate() {
            let w = lane.width_at(d);
            centers[pos][j] = acc[j] + w * 0.5;
            acc[j] += w;
            bounds[pos + 1][j] = acc[j];
        }
    }
    // 左侧：同样从中心向外累加（左为负）
    let mut acc = vec![0.0; n_pts];
    for pos in (0..n_left).rev() {
        let lane = &section.lanes[order[pos]];
        for (j, &d) in ds.iter().enumerate() {
            let w = lane.width_at(d);
            centers[pos][j] = acc[j] - w * 0.5;
            acc[j] -= w;
            bounds[pos][j] = acc[j];
        }
    }

    SectionWork {
        start,
        end,
        stations,
        ds,
        ref_pts,
        normals,
        order,
        lane_ids,
        centers,
        bounds,
        n_left,
    }
}

/// 段间宽度跳变平滑
///
/// 相邻段宽度连续的车道不动；跳变或新增的车道在段首/段尾
/// `width_fix_distance` 范围内向同侧最近的连续车道过渡。
fn smooth_section_joints(odr: &OdrRoad, works: &mut [SectionWork], tol: &BuildTolerances) {
    if works.len() < 2 {
        return;
    }

    // 先统一判定衔接有效性，再做过渡，避免过渡结果影响判定
    let mut valid_pre: Vec<Vec<bool>> = Vec::with_capacity(works.len());
    let mut valid_suc: Vec<Vec<bool>> = Vec::with_capacity(works.len());
    for (i, work) in works.iter().enumerate() {
        let mut pre = vec![true; work.lane_ids.len()];
        let mut suc = vec![true; work.lane_ids.len()];
        for pos in 0..work.lane_ids.len() {
            if i > 0 {
                let lane = work.lane(odr, i, pos);
                pre[pos] = joint_continuous(
                    &works[i - 1],
                    lane.predecessor,
                    work.centers[pos].first().copied(),
                    JointEnd::Tail,
                    tol,
                );
            }
            if i + 1 < works.len() {
                let lane = work.lane(odr, i, pos);
                suc[pos] = joint_continuous(
                    &works[i + 1],
                    lane.successor,
                    work.centers[pos].last().copied(),
                    JointEnd::Head,
                    tol,
                );
            }
        }
        valid_pre.push(pre);
        valid_suc.push(suc);
    }

    for (i, work) in works.iter_mut().enumerate() {
        let sec_len = work.end - work.start;
        let fix = tol.width_fix_distance.min(sec_len);
        if fix <= 0.0 {
            continue;
        }
        let snapshot = work.centers.clone();
        for pos in 0..work.lane_ids.len() {
            if i > 0 && !valid_pre[i][pos] {
                if let Some(ne) = nearest_valid(&work.lane_ids, &valid_pre[i], pos) {
                    for j in 0..work.ds.len() {
                        let dis = work.ds[j];
                        if dis >= fix {
                            break;
                        }
                        let alpha = tol.blend_alpha(dis, fix);
                        work.centers[pos][j] =
                            work.centers[pos][j] * alpha + snapshot[ne][j] * (1.0 - alpha);
                    }
                }
            }
            if i + 1 < valid_suc.len() && !valid_suc[i][pos] {
                if let Some(ne) = nearest_valid(&work.lane_ids, &valid_suc[i], pos) {
                    let sec_end = work.stations.last().copied().unwrap_or(work.end);
                    for j in (0..work.ds.len()).rev() {
                        let dis = sec_end - work.stations[j];
                        if dis >= fix {
                            break;
                        }
                        let alpha = tol.blend_alpha(dis, fix);
                        work.centers[pos][j] =
                            work.centers[pos][j] * alpha + snapshot[ne][j] * (1.0 - alpha);
                    }
                }
            }
        }
    }
}

/// 衔接端：与邻段的哪一端比较
enum JointEnd {
    Head,
    Tail,
}

/// 车道与邻段是否宽度连续
///
/// 声明了衔接车道时比较两侧中心偏移；未声明（新增/消失车道）
/// 时只要邻段存在足够接近的车道就视为连续。
fn joint_continuous(
    neighbor: &SectionWork,
    linked: Option<LaneId>,
    own: Option<f64>,
    end: JointEnd,
    tol: &BuildTolerances,
) -> bool {
    let Some(own) = own else {
        return true;
    };
    let neighbor_center = |pos: usize| -> Option<f64> {
        match end {
            JointEnd::Head => neighbor.centers[pos].first().copied(),
            JointEnd::Tail => neighbor.centers[pos].last().copied(),
        }
    };
    match linked {
        Some(lid) => match neighbor.lane_ids.iter().position(|&id| id == lid) {
            Some(pos) => neighbor_center(pos)
                .map(|c| (c - own).abs() <= tol.width_equal)
                .unwrap_or(true),
            None => false,
        },
        None => (0..neighbor.lane_ids.len()).any(|pos| {
            neighbor_center(pos)
                .map(|c| (c - own).abs() < tol.added_lane_equal)
                .unwrap_or(false)
        }),
    }
}

/// 同号车道里离 `pos` 最近的连续车道
fn nearest_valid(lane_ids: &[LaneId], valid: &[bool], pos: usize) -> Option<usize> {
    let sign = lane_ids[pos].signum();
    for off in 1..lane_ids.len() {
        for cand in [pos.checked_sub(off), pos.checked_add(off)] {
            let Some(cand) = cand else { continue };
            if cand < lane_ids.len() && valid[cand] && lane_ids[cand].signum() == sign {
                return Some(cand);
            }
        }
    }
    None
}

/// 由偏移序列生成折线：参考点沿法向右移 `offsets`
fn offset_polyline(ref_pts: &[Point3], normals: &[Point2], offsets: &[f64]) -> Polyline {
    ref_pts
        .iter()
        .zip(normals)
        .zip(offsets)
        .map(|((p, n), &off)| Point3::new(p.x - n.x * off, p.y - n.y * off, p.z))
        .collect()
}

/// 标线记录转边界样式
fn boundary_mark(lane: &OdrLane) -> BoundaryMark {
    let mark = lane.mark_at(0.0);
    BoundaryMark {
        kind: mark.kind,
        color: mark.color,
        width: mark.width,
    }
}

/// 落成一个车道段
fn emit_section(
    odr: &OdrRoad,
    index: usize,
    work: &SectionWork,
    bound_ids: &AtomicU64,
    curvature: &[CurveSummary],
    slope: &[CurveSummary],
) -> Section {
    let n_lanes = work.lane_ids.len();
    let mut boundaries = Vec::with_capacity(n_lanes + 1);
    for j in 0..=n_lanes {
        // 每条车道的外侧边界沿用该车道的标线；中心边界用 0 号车道的
        let mark = if j == work.n_left {
            let m = odr.sections[index]
                .center_marks
                .iter()
                .take_while(|m| m.s_offset <= 0.0)
                .last()
                .copied()
                .unwrap_or_default();
            BoundaryMark {
                kind: m.kind,
                color: m.color,
                width: m.width,
            }
        } else if j < work.n_left {
            boundary_mark(work.lane(odr, index, j))
        } else {
            boundary_mark(work.lane(odr, index, j - 1))
        };
        boundaries.push(LaneBoundary {
            id: bound_ids.fetch_add(1, Ordering::Relaxed),
            geometry: offset_polyline(&work.ref_pts, &work.normals, &work.bounds[j]),
            mark,
        });
    }

    let mut lanes = Vec::with_capacity(n_lanes);
    for pos in 0..n_lanes {
        let src = work.lane(odr, index, pos);
        let widths: Vec<f64> = (0..work.ds.len())
            .map(|j| (work.bounds[pos + 1][j] - work.bounds[pos][j]).abs())
            .collect();
        lanes.push(Lane {
            road: odr.id,
            section: index as u64,
            id: src.id,
            kind: src.kind,
            speed_limit: if src.speed_limit > 0.0 {
                src.speed_limit
            } else {
                odr.speed_limit
            },
            geometry: offset_polyline(&work.ref_pts, &work.normals, &work.centers[pos]),
            widths,
            left_boundary: pos,
            right_boundary: pos + 1,
            friction: src.friction,
            material_offset: src.material_offset,
        });
    }
    lanes.sort_by_key(|l| l.id);

    Section {
        id: index as u64,
        start_s: work.start,
        length: work.end - work.start,
        boundaries,
        lanes,
        mean_slope: weighted_mean(slope, work.start, work.end),
        mean_curvature: weighted_mean(curvature, work.start, work.end),
    }
}
