// roadnet\crates\rn_build\src/reproject.rs

//! 整幅路网重投影
//!
//! 重建阶段的所有几何都在源平面坐标下，落库前统一变换到 WGS84
//! 经纬度。变换前按车道首尾点的 ENU 距离比对采样宽度做尺度修正，
//! 抵消源投影在地图所在纬度的长度形变。

use rn_foundation::RnResult;
use rn_geo::projection::web_mercator::MERCATOR_RADIUS;
use rn_geo::{Point2, Point3, Polyline, Projection, SpatialRef};
use rn_model::{CoordFrame, RoadNetwork};
use tracing::info;

/// 经纬度相对参考点的局部 ENU 坐标（等矩近似）[m]
fn lonlat_to_enu(lon: f64, lat: f64, ref_lon: f64, ref_lat: f64) -> Point2 {
    let x = (lon - ref_lon).to_radians() * ref_lat.to_radians().cos() * MERCATOR_RADIUS;
    let y = (lat - ref_lat).to_radians() * MERCATOR_RADIUS;
    Point2::new(x, y)
}

fn transform_polyline(proj: &Projection, line: &mut Polyline) {
    proj.transform_slice(line.points_mut());
}

/// 路网整体变换到 WGS84 经纬度
///
/// `source` 为重建时使用的源平面坐标系；源已是经纬度时仅改写
/// 坐标 frame 标记。
pub fn reproject_network(net: &mut RoadNetwork, source: SpatialRef) -> RnResult<()> {
    let proj = Projection::new(source, SpatialRef::LongLat);
    if proj.is_identity() {
        for road in &mut net.roads {
            road.coord_frame = CoordFrame::Wgs84;
        }
        return Ok(());
    }
    info!(roads = net.roads.len(), links = net.links.len(), "重投影到 WGS84");

    // ENU 参考点：头部原点
    let origin = proj.transform(Point3::new(net.header.west, net.header.south, 0.0));

    for road in &mut net.roads {
        for sec in &mut road.sections {
            for lane in &mut sec.lanes {
                scale_widths(&proj, origin, lane);
                transform_polyline(&proj, &mut lane.geometry);
            }
            for bdy in &mut sec.boundaries {
                transform_polyline(&proj, &mut bdy.geometry);
            }
        }
        transform_polyline(&proj, &mut road.geometry);
        road.coord_frame = CoordFrame::Wgs84;
    }
    for link in &mut net.links {
        transform_polyline(&proj, &mut link.geometry);
        for bdy in link
            .left_boundaries
            .iter_mut()
            .chain(link.right_boundaries.iter_mut())
        {
            transform_polyline(&proj, &mut bdy.geometry);
        }
        // 平面控制点的 x/y 是坐标，z 是航向，只变换坐标
        for cp in &mut link.control_points {
            let t = proj.transform(Point3::new(cp.x, cp.y, 0.0));
            cp.x = t.x;
            cp.y = t.y;
        }
    }
    for obj in &mut net.objects {
        obj.position = proj.transform(obj.position);
        for geom in &mut obj.geometries {
            transform_polyline(&proj, &mut geom.points);
        }
    }
    Ok(())
}

/// 宽度尺度修正
///
/// 车道首尾点在源平面下的距离与变换后 ENU 距离之比即为该处的
/// 投影长度形变，采样宽度整体乘回这个比例。
fn scale_widths(proj: &Projection, origin: Point3, lane: &mut rn_model::Lane) {
    let (Some(a), Some(b)) = (lane.geometry.start(), lane.geometry.end()) else {
        return;
    };
    let planar = a.distance_xy(&b);
    if planar < 1e-9 {
        return;
    }
    let ta = proj.transform(a);
    let tb = proj.transform(b);
    let ea = lonlat_to_enu(ta.x, ta.y, origin.x, origin.y);
    let eb = lonlat_to_enu(tb.x, tb.y, origin.x, origin.y);
    let scale = ea.distance(&eb) / planar;
    if !scale.is_finite() || scale <= 0.0 {
        return;
    }
    for w in &mut lane.widths {
        *w *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_model::{Header, Lane, Road, Section};

    fn planar_net() -> RoadNetwork {
        // 北纬 40° 附近的墨卡托平面坐标
        let base_x = 12_913_060.0;
        let base_y = 4_865_942.0;
        let mut net = RoadNetwork {
            header: Header {
                west: base_x,
                south: base_y,
                ..Header::default()
            },
            ..RoadNetwork::default()
        };
        let mut road = Road {
            id: 1,
            length: 100.0,
            ..Road::default()
        };
        road.geometry.push(Point3::new(base_x, base_y, 5.0));
        road.geometry.push(Point3::new(base_x + 100.0, base_y, 5.0));
        let mut sec = Section::default();
        sec.lanes.push(Lane {
            road: 1,
            id: -1,
            geometry: Polyline::from_points(vec![
                Point3::new(base_x, base_y - 1.75, 5.0),
                Point3::new(base_x + 100.0, base_y - 1.75, 5.0),
            ]),
            widths: vec![3.5, 3.5],
            ..Lane::default()
        });
        road.sections.push(sec);
        net.roads.push(road);
        net
    }

    #[test]
    fn test_reproject_to_lonlat() {
        let mut net = planar_net();
        reproject_network(&mut net, SpatialRef::WebMercator).unwrap();
        let road = &net.roads[0];
        assert_eq!(road.coord_frame, CoordFrame::Wgs84);
        let p = road.geometry.start().unwrap();
        // 经纬度量级正确，高程不变
        assert!(p.x > 115.0 && p.x < 117.0, "lon = {}", p.x);
        assert!(p.y > 39.0 && p.y < 41.0, "lat = {}", p.y);
        assert!((p.z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_scale_at_latitude() {
        let mut net = planar_net();
        reproject_network(&mut net, SpatialRef::WebMercator).unwrap();
        let lane = &net.roads[0].sections[0].lanes[0];
        // 北纬 40° 墨卡托形变约 cos(40°) ≈ 0.766
        let w = lane.widths[0];
        assert!(w > 3.5 * 0.7 && w < 3.5 * 0.82, "w = {w}");
    }

    #[test]
    fn test_identity_source_only_marks_frame() {
        let mut net = planar_net();
        let before = net.roads[0].geometry.start().unwrap();
        reproject_network(&mut net, SpatialRef::LongLat).unwrap();
        assert_eq!(net.roads[0].coord_frame, CoordFrame::Wgs84);
        assert_eq!(net.roads[0].geometry.start().unwrap(), before);
    }
}
