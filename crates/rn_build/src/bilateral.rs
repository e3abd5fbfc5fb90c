// roadnet\crates\rn_build\src/bilateral.rs

//! 双向道路拆分
//!
//! 含左侧（正 id）车道的道路拆成两条单向道路：正 id 车道搬到
//! 一条新道路上，id 取反、几何反转，使两条道路的行驶方向都与
//! 各自参考线一致。原有连接随车道搬迁改写端点，必要时整条反转
//! 保持几何朝向与端点一致。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rn_foundation::ids::RoadId;
use rn_foundation::LaneUid;
use rn_model::{Lane, LaneBoundary, ObjectKind, Road, RoadNetwork, Section};

/// 新道路 id 偏移量：比全图最大道路 id 高一个数量级，且不低于 1e8
fn dummy_offset(net: &RoadNetwork) -> RoadId {
    let max_id = net.roads.iter().map(|r| r.id).max().unwrap_or(0);
    let base = max_id.max(100_000_000);
    let exp = (base as f64).log10().ceil() as u32 + 1;
    10u64.saturating_pow(exp)
}

/// 拆分全部双向道路
///
/// 返回搬迁映射（旧车道 → 新车道），供调用方改写对象等外部引用。
pub fn split_bilateral(
    net: &mut RoadNetwork,
    bound_ids: &AtomicU64,
) -> HashMap<LaneUid, LaneUid> {
    let dummy = dummy_offset(net);
    let mut replaced: HashMap<LaneUid, LaneUid> = HashMap::new();
    let mut new_roads: Vec<Road> = Vec::new();

    for road in net.roads.iter_mut().filter(|r| r.bidirectional) {
        if let Some(reversed) = split_road(road, dummy, bound_ids, &mut replaced) {
            new_roads.push(reversed);
        }
        road.bidirectional = false;
    }
    // 左侧车道搬空的道路整条消失
    net.roads
        .retain(|r| r.sections.iter().any(|s| !s.lanes.is_empty()));
    net.roads.extend(new_roads);

    remap_links(net, &replaced);
    remap_objects(net, dummy, &replaced);
    replaced
}

/// 拆出一条道路的反向部分
fn split_road(
    road: &mut Road,
    dummy: RoadId,
    bound_ids: &AtomicU64,
    replaced: &mut HashMap<LaneUid, LaneUid>,
) -> Option<Road> {
    let new_id = road.id + dummy;
    let sec_count = road.sections.len();
    let mut new_sections: Vec<Option<Section>> = (0..sec_count).map(|_| None).collect();
    let mut any = false;

    for (old_sid, sec) in road.sections.iter_mut().enumerate() {
        // 边界按空间从左到右排列，前 n_left + 1 条属于左侧车道
        let n_left = sec.lanes.iter().filter(|l| l.id > 0).count();
        if n_left == 0 {
            continue;
        }
        any = true;
        let new_sid = (sec_count - 1 - old_sid) as u64;

        // 新道路边界：左侧边界镜像排列并反转几何
        let mut boundaries: Vec<LaneBoundary> = (0..=n_left)
            .map(|i| {
                let src = &sec.boundaries[n_left - i];
                LaneBoundary {
                    id: bound_ids.fetch_add(1, Ordering::Relaxed),
                    geometry: src.geometry.reversed(),
                    mark: src.mark,
                }
            })
            .collect();
        boundaries.shrink_to_fit();

        // 新车道：+k → -k，几何与宽度反转
        let mut lanes: Vec<Lane> = Vec::new();
        for lane in sec.lanes.iter().filter(|l| l.id > 0) {
            let old_uid = LaneUid::new(road.id, old_sid as u64, lane.id);
            let new_uid = LaneUid::new(new_id, new_sid, -lane.id);
            replaced.insert(old_uid, new_uid);

            let pos = lane.id as usize; // 新道路上 -k 车道在第 k - 1 位
            let mut widths = lane.widths.clone();
            widths.reverse();
            lanes.push(Lane {
                road: new_id,
                section: new_sid,
                id: -lane.id,
                kind: lane.kind,
                speed_limit: lane.speed_limit,
                geometry: lane.geometry.reversed(),
                widths,
                left_boundary: pos - 1,
                right_boundary: pos,
                friction: lane.friction,
                material_offset: lane.material_offset,
            });
        }
        lanes.sort_by_key(|l| l.id);

        new_sections[new_sid as usize] = Some(Section {
            id: new_sid,
            start_s: road.length - (sec.start_s + sec.length),
            length: sec.length,
            boundaries,
            lanes,
            mean_slope: -sec.mean_slope,
            mean_curvature: sec.mean_curvature,
        });

        // 原道路只留右侧：去掉左侧车道与其独占边界，下标前移
        sec.lanes.retain(|l| l.id < 0);
        sec.boundaries.drain(0..n_left);
        for lane in &mut sec.lanes {
            lane.left_boundary -= n_left;
            lane.right_boundary -= n_left;
        }
    }

    if !any {
        return None;
    }

    // 曲率概要反向重排，里程从新起点累计
    let mut curvature = Vec::with_capacity(road.curvature.len());
    let mut acc = 0.0;
    for rec in road.curvature.iter().rev() {
        curvature.push(rn_model::CurveSummary::new(acc, rec.length, rec.value));
        acc += rec.length;
    }

    Some(Road {
        id: new_id,
        name: road.name.clone(),
        kind: road.kind,
        junction: road.junction,
        length: road.length,
        speed_limit: road.speed_limit,
        geometry: road.geometry.reversed(),
        sections: new_sections.into_iter().flatten().collect(),
        curvature,
        slope: road.slope.clone(),
        ele_control: road.ele_control.clone(),
        coord_frame: road.coord_frame,
        bidirectional: false,
    })
}

/// 端点搬迁后改写连接
fn remap_links(net: &mut RoadNetwork, replaced: &HashMap<LaneUid, LaneUid>) {
    let lane_endpoints: HashMap<LaneUid, (rn_geo::Point3, rn_geo::Point3)> = net
        .roads
        .iter()
        .flat_map(|r| r.sections.iter().flat_map(|s| s.lanes.iter()))
        .filter_map(|l| {
            Some((
                LaneUid::new(l.road, l.section, l.id),
                (l.geometry.start()?, l.geometry.end()?),
            ))
        })
        .collect();

    for link in &mut net.links {
        if let Some(new_uid) = replaced.get(&link.from) {
            link.from = *new_uid;
            link.from_contact = link.from_contact.flipped();
        }
        if let Some(new_uid) = replaced.get(&link.to) {
            link.to = *new_uid;
            link.to_contact = link.to_contact.flipped();
        }

        // 带几何的连接检查朝向：若反着走更贴合端点则整条反转
        if link.geometry.len() < 2 {
            continue;
        }
        let (Some(head), Some(tail)) = (link.geometry.start(), link.geometry.end()) else {
            continue;
        };
        let (Some(from_ends), Some(to_ends)) = (
            lane_endpoints.get(&link.from),
            lane_endpoints.get(&link.to),
        ) else {
            continue;
        };
        let forward = head.distance_xy(&from_ends.1) + tail.distance_xy(&to_ends.0);
        let backward = head.distance_xy(&from_ends.0) + tail.distance_xy(&to_ends.1);
        if forward > backward {
            link.reverse();
        }
    }
}

/// 改写对象的车道引用；隧道复制到拆出的新道路上
fn remap_objects(net: &mut RoadNetwork, dummy: RoadId, replaced: &HashMap<LaneUid, LaneUid>) {
    let split_roads: HashMap<RoadId, (RoadId, f64)> = replaced
        .values()
        .map(|uid| uid.road)
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .filter_map(|new_id| {
            let len = net.road(new_id)?.length;
            Some((new_id - dummy, (new_id, len)))
        })
        .collect();

    let mut duplicated = Vec::new();
    for obj in &mut net.objects {
        for uid in &mut obj.relied_lanes {
            if let Some(new_uid) = replaced.get(uid) {
                *uid = *new_uid;
            }
        }
        // 隧道覆盖两个行车方向，新道路上补一份镜像记录
        if obj.kind == ObjectKind::Tunnel {
            if let Some(&(new_road, new_len)) = split_roads.get(&obj.road) {
                let mut copy = obj.clone();
                copy.id = obj.id + dummy;
                copy.road = new_road;
                copy.s = (new_len - (obj.s + obj.length)).max(0.0);
                copy.relied_lanes.clear();
                duplicated.push(copy);
            }
        }
    }
    net.objects.extend(duplicated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_geo::{Point3, Polyline};
    use rn_model::{ContactPoint, LaneLink, LaneType, MapObject};

    fn lane(road: u64, sec: u64, id: i64, lb: usize, rb: usize, ys: [f64; 2]) -> Lane {
        Lane {
            road,
            section: sec,
            id,
            kind: LaneType::Driving,
            geometry: Polyline::from_points(vec![
                Point3::new(0.0, ys[0], 0.0),
                Point3::new(100.0, ys[1], 0.0),
            ]),
            widths: vec![3.5, 3.5],
            left_boundary: lb,
            right_boundary: rb,
            ..Lane::default()
        }
    }

    fn boundary(id: u64) -> LaneBoundary {
        LaneBoundary {
            id,
            geometry: Polyline::from_points(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(100.0, 0.0, 0.0),
            ]),
            ..LaneBoundary::default()
        }
    }

    fn two_way_net() -> RoadNetwork {
        // 道路 1：+1 / -1 各一条车道，3 条边界
        let mut net = RoadNetwork::default();
        net.roads.push(Road {
            id: 1,
            length: 100.0,
            bidirectional: true,
            sections: vec![Section {
                id: 0,
                start_s: 0.0,
                length: 100.0,
                boundaries: vec![boundary(1), boundary(2), boundary(3)],
                lanes: vec![
                    lane(1, 0, -1, 1, 2, [-1.75, -1.75]),
                    lane(1, 0, 1, 0, 1, [1.75, 1.75]),
                ],
                ..Section::default()
            }],
            geometry: Polyline::from_points(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(100.0, 0.0, 0.0),
            ]),
            ..Road::default()
        });
        net
    }

    #[test]
    fn test_split_moves_left_lanes() {
        let mut net = two_way_net();
        let ids = AtomicU64::new(100);
        let replaced = split_bilateral(&mut net, &ids);

        assert_eq!(net.roads.len(), 2);
        let old = net.road(1).unwrap();
        assert_eq!(old.sections[0].lanes.len(), 1);
        assert_eq!(old.sections[0].lanes[0].id, -1);
        assert_eq!(old.sections[0].boundaries.len(), 2);
        // 下标前移后仍指向正确边界
        assert_eq!(old.sections[0].lanes[0].left_boundary, 0);

        let new_road = net.roads.iter().find(|r| r.id != 1).unwrap();
        assert!(new_road.id > 1_000_000_000 - 1);
        let moved = &new_road.sections[0].lanes[0];
        assert_eq!(moved.id, -1);
        // 几何反转：起点在原来的终点
        assert!((moved.geometry.start().unwrap().x - 100.0).abs() < 1e-9);
        assert!((moved.geometry.start().unwrap().y - 1.75).abs() < 1e-9);

        let new_uid = replaced[&LaneUid::new(1, 0, 1)];
        assert_eq!(new_uid, LaneUid::new(new_road.id, 0, -1));
    }

    #[test]
    fn test_split_remaps_links() {
        let mut net = two_way_net();
        net.links.push(LaneLink {
            id: 1,
            from: LaneUid::new(1, 0, 1),
            to: LaneUid::new(9, 0, -1),
            from_contact: ContactPoint::Start,
            to_contact: ContactPoint::Start,
            ..LaneLink::default()
        });
        let ids = AtomicU64::new(100);
        split_bilateral(&mut net, &ids);

        let link = &net.links[0];
        // 端点搬到新道路并翻转接触端
        assert_ne!(link.from.road, 1);
        assert_eq!(link.from.lane, -1);
        assert_eq!(link.from_contact, ContactPoint::End);
    }

    #[test]
    fn test_pure_left_road_disappears() {
        let mut net = RoadNetwork::default();
        net.roads.push(Road {
            id: 5,
            length: 50.0,
            bidirectional: true,
            sections: vec![Section {
                id: 0,
                start_s: 0.0,
                length: 50.0,
                boundaries: vec![boundary(1), boundary(2)],
                lanes: vec![lane(5, 0, 1, 0, 1, [1.75, 1.75])],
                ..Section::default()
            }],
            ..Road::default()
        });
        let ids = AtomicU64::new(10);
        split_bilateral(&mut net, &ids);
        // 原道路搬空后删除，只剩新道路
        assert_eq!(net.roads.len(), 1);
        assert_ne!(net.roads[0].id, 5);
    }

    #[test]
    fn test_tunnel_duplicated() {
        let mut net = two_way_net();
        net.objects.push(MapObject {
            id: 4,
            kind: ObjectKind::Tunnel,
            road: 1,
            s: 20.0,
            length: 30.0,
            ..MapObject::default()
        });
        let ids = AtomicU64::new(100);
        split_bilateral(&mut net, &ids);

        assert_eq!(net.objects.len(), 2);
        let copy = net.objects.iter().find(|o| o.road != 1).unwrap();
        // 镜像里程：100 - (20 + 30) = 50
        assert!((copy.s - 50.0).abs() < 1e-9);
        assert!(copy.id > 4);
    }
}
