// roadnet\crates\rn_build\src/linker.rs

//! 车道级拓扑连接
//!
//! 三类来源：
//!
//! 1. 路口连接道路：沿车道链把连接道路各段的车道几何拼成一条
//!    连接，携带左右边界拷贝；连接道路本身随后从道路表删除
//! 2. 道路级前驱/后继声明：直接的端点相接记录
//! 3. 端点吸附：没有声明前驱的道路，在全图车道端点里找足够近
//!    的端点补一条连接
//!
//! 汇入/分流处多条车道共用一个衔接端点时，除最近的一条外其余
//! 车道的端部几何向最近车道做 logistic 过渡，消除重建缝隙。

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rn_foundation::ids::{BoundaryId, JunctionId, RoadId};
use rn_foundation::{BuildTolerances, LaneUid};
use rn_geo::Point3;
use rn_model::road::weighted_mean;
use rn_model::{ContactPoint, Lane, LaneLink, LaneType, Road};
use rn_xodr::OdrRoad;
use tracing::debug;

/// 按 uid 查车道
fn lane_of<'a>(roads: &'a BTreeMap<RoadId, Road>, uid: &LaneUid) -> Option<&'a Lane> {
    roads
        .get(&uid.road)?
        .sections
        .get(uid.section as usize)?
        .lane(uid.lane)
}

/// 目标道路上与接触端对应的车道段下标
fn contact_section(roads: &BTreeMap<RoadId, Road>, road: RoadId, contact: ContactPoint) -> u64 {
    match contact {
        ContactPoint::Start => 0,
        ContactPoint::End => roads
            .get(&road)
            .map(|r| r.sections.len().saturating_sub(1) as u64)
            .unwrap_or(0),
    }
}

/// 由路口连接道路生成连接
///
/// 连接道路缺失前驱/后继或链断开时不产生连接；调用方无论结果
/// 如何都会把连接道路从道路表删除。
pub fn junction_links(
    odr: &OdrRoad,
    junction: JunctionId,
    roads: &BTreeMap<RoadId, Road>,
    vendor_control_points: bool,
    tol: &BuildTolerances,
    out: &mut Vec<LaneLink>,
) {
    let (Some(pre), Some(suc)) = (odr.predecessor, odr.successor) else {
        debug!(road = odr.id, "连接道路缺失前驱/后继，跳过");
        return;
    };
    let Some(built) = roads.get(&odr.id) else {
        return;
    };
    let from_sid = contact_section(roads, pre.id, pre.contact);
    let to_sid = contact_section(roads, suc.id, suc.contact);

    let mean_slope = weighted_mean(&odr.slope_records(tol.curvature_window), 0.0, odr.length);
    let mean_curvature =
        weighted_mean(&odr.curvature_records(tol.curvature_window), 0.0, odr.length);
    let control_points: Vec<Point3> = if vendor_control_points {
        odr.control_points().map(|(_, pts)| pts).unwrap_or_default()
    } else {
        Vec::new()
    };
    let ele_control = if odr.elevations.is_empty() {
        Vec::new()
    } else {
        odr.ele_control_points(vendor_control_points)
    };

    for chain in odr.lane_chains() {
        let from_lid = chain[0];
        let to_lid = *chain.last().unwrap_or(&0);

        let mut link = LaneLink {
            from: LaneUid::new(pre.id, from_sid, from_lid),
            to: LaneUid::new(suc.id, to_sid, to_lid),
            from_contact: pre.contact,
            to_contact: suc.contact,
            junction,
            odr_road: odr.id,
            mean_slope,
            mean_curvature,
            control_points: control_points.clone(),
            ele_control: ele_control.clone(),
            ..LaneLink::default()
        };

        // 逐段拼接连接道路自身的车道几何与边界
        let mut seen: HashSet<BoundaryId> = HashSet::new();
        let mut broken = false;
        for (si, &lid) in chain[1..chain.len() - 1].iter().enumerate() {
            let Some(sec) = built.sections.get(si) else {
                broken = true;
                break;
            };
            let Some(lane) = sec.lane(lid) else {
                broken = true;
                break;
            };
            link.geometry.extend_from(&lane.geometry);
            for (idx, side) in [
                (lane.left_boundary, &mut link.left_boundaries),
                (lane.right_boundary, &mut link.right_boundaries),
            ] {
                if let Some(bdy) = sec.boundaries.get(idx) {
                    if seen.insert(bdy.id) {
                        side.push(bdy.clone());
                    }
                }
            }
        }
        if broken {
            debug!(road = odr.id, "车道链在重建结果里断开，丢弃");
            continue;
        }

        // 连接道路车道为正时，行驶方向与参考线相反
        if chain[1] > 0 {
            link.reverse();
        }
        out.push(link);
    }
}

/// 由道路级前驱/后继声明生成连接
pub fn road_links(
    odr: &OdrRoad,
    roads: &BTreeMap<RoadId, Road>,
    lane_ends: &HashMap<LaneUid, (Point3, Point3)>,
    tol: &BuildTolerances,
) -> Vec<LaneLink> {
    let mut out = Vec::new();
    let Some(built) = roads.get(&odr.id) else {
        return out;
    };
    let mean_slope = weighted_mean(&odr.slope_records(tol.curvature_window), 0.0, odr.length);
    let mean_curvature =
        weighted_mean(&odr.curvature_records(tol.curvature_window), 0.0, odr.length);
    let base = |from: LaneUid, to: LaneUid, fc: ContactPoint, tc: ContactPoint| LaneLink {
        from,
        to,
        from_contact: fc,
        to_contact: tc,
        mean_slope,
        mean_curvature,
        ..LaneLink::default()
    };

    if let Some(pre) = odr.predecessor.filter(|l| !l.is_junction) {
        let pre_sid = contact_section(roads, pre.id, pre.contact);
        let mut pairs = odr.predecessor_pairs();
        pairs.sort_by(|a, b| b.cmp(a));
        for (pid, own) in pairs {
            let mut link = base(
                LaneUid::new(pre.id, pre_sid, pid),
                LaneUid::new(odr.id, 0, own),
                pre.contact,
                ContactPoint::Start,
            );
            if own > 0 {
                link.reverse();
            }
            out.push(link);
        }
    } else if odr.predecessor.is_none() {
        // 没有前驱声明：端点足够近的车道吸附成连接
        let first_sid = 0u64;
        if let Some(front) = built.sections.first() {
            for lane in &front.lanes {
                let Some(start) = lane.geometry.start() else {
                    continue;
                };
                for (uid, (_, end)) in lane_ends {
                    if uid.road == odr.id {
                        continue;
                    }
                    if end.xy().distance_sq(&start.xy()) < tol.endpoint_snap_sq {
                        out.push(base(
                            *uid,
                            LaneUid::new(odr.id, first_sid, lane.id),
                            ContactPoint::End,
                            ContactPoint::Start,
                        ));
                    }
                }
            }
        }
    }

    if let Some(suc) = odr.successor.filter(|l| !l.is_junction) {
        let last_sid = built.sections.len().saturating_sub(1) as u64;
        let to_sid = contact_section(roads, suc.id, suc.contact);
        let mut pairs = odr.successor_pairs();
        pairs.sort_by(|a, b| b.cmp(a));
        for (own, nid) in pairs {
            let mut link = base(
                LaneUid::new(odr.id, last_sid, own),
                LaneUid::new(suc.id, to_sid, nid),
                ContactPoint::End,
                suc.contact,
            );
            if own > 0 {
                link.reverse();
            }
            out.push(link);
        }
    }
    out
}

/// 去重并分配连接 id
///
/// 同一对车道且接触端相同的连接只保留先出现的一条，id 从 1
/// 顺序分配。
#[must_use]
pub fn dedup_and_assign(links: Vec<LaneLink>) -> Vec<LaneLink> {
    let mut by_route: HashMap<String, Vec<usize>> = HashMap::new();
    let mut kept: Vec<LaneLink> = Vec::with_capacity(links.len());
    for link in links {
        let key = link.route_key();
        let dup = by_route.get(&key).is_some_and(|idxs| {
            idxs.iter().any(|&i| {
                kept[i].same_route(&link)
                    && kept[i].from_contact == link.from_contact
                    && kept[i].to_contact == link.to_contact
            })
        });
        if dup {
            continue;
        }
        by_route.entry(key).or_default().push(kept.len());
        kept.push(link);
    }
    for (i, link) in kept.iter_mut().enumerate() {
        link.id = i as u64 + 1;
    }
    kept
}

/// 汇入/分流处的车道几何过渡
pub fn smooth_link_transitions(
    links: &[LaneLink],
    roads: &mut BTreeMap<RoadId, Road>,
    tol: &BuildTolerances,
) {
    // 分流：一个来源车道对多个目标车道
    let mut diverge: HashMap<LaneUid, BTreeSet<LaneUid>> = HashMap::new();
    // 汇入：一个目标车道对多个来源车道
    let mut converge: HashMap<LaneUid, BTreeSet<LaneUid>> = HashMap::new();
    for link in links {
        if link.from.road == link.to.road {
            continue;
        }
        diverge.entry(link.from).or_default().insert(link.to);
        converge.entry(link.to).or_default().insert(link.from);
    }

    for (src, targets) in &diverge {
        if targets.len() < 2 {
            continue;
        }
        let Some(anchor) = lane_of(roads, src).and_then(|l| l.geometry.end()) else {
            continue;
        };
        blend_group(roads, targets, anchor, false, tol);
    }
    for (dst, sources) in &converge {
        if sources.len() < 2 {
            continue;
        }
        let Some(anchor) = lane_of(roads, dst).and_then(|l| l.geometry.start()) else {
            continue;
        };
        blend_group(roads, sources, anchor, true, tol);
    }
}

/// 组内除离锚点最近的车道外，其余车道端部向其过渡
///
/// `tail` 为 true 时比较并修正车道末端（汇入侧），否则修正
/// 车道首端（分流侧）。
fn blend_group(
    roads: &mut BTreeMap<RoadId, Road>,
    group: &BTreeSet<LaneUid>,
    anchor: Point3,
    tail: bool,
    tol: &BuildTolerances,
) {
    let endpoint = |lane: &Lane| -> Option<Point3> {
        if tail {
            lane.geometry.end()
        } else {
            lane.geometry.start()
        }
    };
    let nearest = group
        .iter()
        .filter_map(|uid| {
            let p = lane_of(roads, uid).and_then(|l| endpoint(l))?;
            Some((*uid, p.distance_xy(&anchor)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((near_uid, near_dis)) = nearest else {
        return;
    };
    if near_dis >= tol.link_snap {
        return;
    }
    let Some(near_lane) = lane_of(roads, &near_uid) else {
        return;
    };
    let mut base: Vec<Point3> = near_lane.geometry.points().to_vec();
    let near_kind = near_lane.kind;
    if near_kind == LaneType::None {
        return;
    }
    if tail {
        base.reverse();
    }

    for uid in group {
        if uid == &near_uid || uid.road != near_uid.road || uid.section != near_uid.section {
            continue;
        }
        // 夹在中间的 None 类型车道说明两条车道并不相邻，不修
        let step = (near_uid.lane - uid.lane).signum();
        let between_none = lane_of(roads, &LaneUid::new(uid.road, uid.section, uid.lane + step))
            .map(|l| l.kind == LaneType::None)
            .unwrap_or(false);
        let own_none = lane_of(roads, uid)
            .map(|l| l.kind == LaneType::None)
            .unwrap_or(true);
        if own_none || (uid.lane + step != near_uid.lane && between_none) {
            continue;
        }
        let Some(road) = roads.get_mut(&uid.road) else {
            continue;
        };
        let Some(lane) = road
            .sections
            .get_mut(uid.section as usize)
            .and_then(|s| s.lane_mut(uid.lane))
        else {
            continue;
        };
        let fix = tol.link_fix_distance.min(lane.geometry.length());
        if fix <= 0.0 {
            continue;
        }
        let prefix = if tail {
            let mut p = lane.geometry.prefix_lengths();
            let total = p.last().copied().unwrap_or(0.0);
            p.iter_mut().for_each(|v| *v = total - *v);
            p.reverse();
            lane.geometry.reverse();
            p
        } else {
            lane.geometry.prefix_lengths()
        };
        hook_up_lines(lane.geometry.points_mut(), &prefix, &base, fix, tol);
        if tail {
            lane.geometry.reverse();
        }
    }
}

/// 端部 `fix` 弧长内向基准线过渡
///
/// `prefix` 为各点距被修端的弧长。端点处几乎落在基准线上，
/// 随弧长增大平滑回到自身。
fn hook_up_lines(
    points: &mut [Point3],
    prefix: &[f64],
    base: &[Point3],
    fix: f64,
    tol: &BuildTolerances,
) {
    let n = points.len().min(base.len()).min(prefix.len());
    for k in 0..n {
        let d = prefix[k];
        if d >= fix {
            break;
        }
        let alpha = tol.blend_alpha(d, fix);
        points[k] = base[k] + (points[k] - base[k]) * alpha;
    }
}
