// roadnet\crates\rn_build\src/area.rs

//! 区域裁剪
//!
//! 裁剪矩形以 WGS84 经纬度声明，先变换到源平面坐标，再按参考线
//! 粗采样判断道路是否落入任一矩形。路口连接道路的前驱/后继即使
//! 不在矩形内也要保留，否则路口拓扑缺口。

use std::collections::HashSet;

use rn_foundation::ids::RoadId;
use rn_foundation::BuildTolerances;
use rn_geo::{Point2, Point3, Projection, Rect, SpatialRef};
use rn_xodr::OdrMap;
use tracing::info;

/// 经纬度矩形变换到源平面坐标
fn to_planar(rects: &[Rect], source: SpatialRef) -> Vec<Rect> {
    let proj = Projection::new(SpatialRef::LongLat, source);
    rects
        .iter()
        .map(|r| {
            let min = proj.transform(Point3::new(r.min.x, r.min.y, 0.0));
            let max = proj.transform(Point3::new(r.max.x, r.max.y, 0.0));
            Rect::from_corners(Point2::new(min.x, min.y), Point2::new(max.x, max.y))
        })
        .collect()
}

/// 选出与任一矩形相交的道路
///
/// 参考线样本点到矩形的距离小于 `area_slack` 即视为相交，富余量
/// 吸收道路横断面宽度。第二遍把选中的路口连接道路的两端道路补进
/// 选集。
pub fn select_roads(
    map: &OdrMap,
    rects: &[Rect],
    source: SpatialRef,
    origin: Point2,
    tol: &BuildTolerances,
) -> HashSet<RoadId> {
    let planar = to_planar(rects, source);
    let mut selected: HashSet<RoadId> = HashSet::new();

    for road in &map.roads {
        let stations = road.stations(tol);
        let hit = stations.iter().any(|&s| {
            let p = road.ref_point(s);
            let p = Point2::new(p.x + origin.x, p.y + origin.y);
            planar.iter().any(|r| r.distance_to(&p) < tol.area_slack)
        });
        if hit {
            selected.insert(road.id);
        }
    }

    // 路口连接道路的两端必须在场，否则连接无从挂起
    let mut extra: Vec<RoadId> = Vec::new();
    for road in &map.roads {
        if road.junction == 0 || !selected.contains(&road.id) {
            continue;
        }
        for link in [road.predecessor, road.successor].into_iter().flatten() {
            if !link.is_junction && !selected.contains(&link.id) {
                extra.push(link.id);
            }
        }
    }
    if !extra.is_empty() {
        info!(count = extra.len(), "区域外补选路口相邻道路");
        selected.extend(extra);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_geo::{Curve, CurvePose};
    use rn_model::ContactPoint;
    use rn_xodr::{OdrRoad, OdrRoadLink};

    fn straight(id: u64, x0: f64, y0: f64, len: f64) -> OdrRoad {
        OdrRoad {
            id,
            length: len,
            geometry: vec![Curve::line(CurvePose::new(0.0, x0, y0, 0.0, len))],
            ..OdrRoad::default()
        }
    }

    #[test]
    fn test_select_by_rect() {
        // 源坐标为墨卡托平面，矩形以经纬度给出
        let map = OdrMap {
            roads: vec![straight(1, 0.0, 0.0, 100.0), straight(2, 1e6, 1e6, 100.0)],
            ..OdrMap::default()
        };
        // 原点附近约 ±0.01° 的矩形
        let rects = vec![Rect::from_corners(
            Point2::new(-0.01, -0.01),
            Point2::new(0.01, 0.01),
        )];
        let tol = BuildTolerances::default();
        let sel = select_roads(&map, &rects, SpatialRef::WebMercator, Point2::ZERO, &tol);
        assert!(sel.contains(&1));
        assert!(!sel.contains(&2));
    }

    #[test]
    fn test_junction_neighbors_pulled_in() {
        let mut connector = straight(10, 0.0, 0.0, 20.0);
        connector.junction = 7;
        connector.predecessor = Some(OdrRoadLink {
            is_junction: false,
            id: 1,
            contact: ContactPoint::End,
        });
        connector.successor = Some(OdrRoadLink {
            is_junction: false,
            id: 2,
            contact: ContactPoint::Start,
        });
        let map = OdrMap {
            roads: vec![
                straight(1, 1e6, 1e6, 100.0), // 矩形外
                straight(2, 1e6, 1e6, 100.0), // 矩形外
                connector,
            ],
            ..OdrMap::default()
        };
        let rects = vec![Rect::from_corners(
            Point2::new(-0.01, -0.01),
            Point2::new(0.01, 0.01),
        )];
        let tol = BuildTolerances::default();
        let sel = select_roads(&map, &rects, SpatialRef::WebMercator, Point2::ZERO, &tol);
        // 连接道路命中，两端道路被补选
        assert!(sel.contains(&10));
        assert!(sel.contains(&1));
        assert!(sel.contains(&2));
    }
}
