// roadnet\crates\rn_build\src/objects.rs

//! 路侧对象与信号的世界坐标解算
//!
//! 对象以道路坐标 (s, t) 声明位置。解算时沿原始参考线（不含
//! 车道偏移）取点并沿法向平移 t，高程取参考线高程加对象自身
//! 偏移。轮廓、重复记录与停车位矩形各自展开为附加折线。

use rn_geo::{Point2, Point3, Polyline};
use rn_model::{Header, MapObject, ObjectGeometry, ObjectKind};
use rn_foundation::LaneUid;
use rn_xodr::{OdrObject, OdrRepeat, OdrRoad};

/// 短于该值的重复记录不展开
const REPEAT_MIN_LEN: f64 = 1e-4;
/// 重复间距未声明时的展开步长 [m]
const REPEAT_DEFAULT_STEP: f64 = 0.5;

/// 解算一条道路上的全部对象
pub fn place_objects(odr: &OdrRoad, header: &Header) -> Vec<MapObject> {
    let origin = Point2::new(header.west, header.south);
    odr.objects
        .iter()
        .map(|src| place_object(odr, src, origin))
        .collect()
}

/// 道路坐标 (s, t) 的世界点，高程为参考线高程
fn road_point(odr: &OdrRoad, origin: Point2, s: f64, t: f64) -> Point3 {
    let p = odr.ref_point(s);
    let n = odr.ref_normal(s);
    Point3::new(
        p.x + n.x * t + origin.x,
        p.y + n.y * t + origin.y,
        odr.elevation(s),
    )
}

fn place_object(odr: &OdrRoad, src: &OdrObject, origin: Point2) -> MapObject {
    let heading = odr.ref_heading(src.s);
    // 信号带朝向语义，普通对象直接叠加航向
    let yaw = if src.is_signal {
        MapObject::resolve_yaw(heading, src.hdg, src.orientation)
    } else {
        heading + src.hdg
    };
    let mut position = road_point(odr, origin, src.s, src.t);
    position.z += src.z_offset;

    let mut obj = MapObject {
        id: src.id,
        name: src.name.clone(),
        kind: src.kind,
        road: odr.id,
        link: 0,
        s: src.s,
        t: src.t,
        z_offset: src.z_offset,
        hdg: src.hdg,
        pitch: src.pitch,
        roll: src.roll,
        orientation: src.orientation,
        length: src.length,
        width: src.width,
        height: src.height,
        position,
        yaw,
        geometries: Vec::new(),
        relied_lanes: relied_lanes(odr, src),
    };

    if !src.outline.is_empty() {
        obj.geometries.push(outline_geometry(odr, src, origin, yaw));
    }
    if let Some(rep) = &src.repeat {
        if rep.length > REPEAT_MIN_LEN {
            obj.geometries.push(repeat_geometry(odr, rep, origin));
        }
    }
    if src.kind == ObjectKind::ParkingSpace && src.outline.is_empty() {
        obj.geometries.push(footprint_rect(src, position, yaw));
    }
    if obj.geometries.is_empty() {
        // 无轮廓、无重复的对象退化为单点几何
        obj.geometries.push(ObjectGeometry {
            points: Polyline::from_points(vec![position]),
            closed: false,
        });
    }
    obj
}

/// 局部轮廓角点按对象偏航旋转后平移到世界坐标
fn outline_geometry(
    odr: &OdrRoad,
    src: &OdrObject,
    origin: Point2,
    yaw: f64,
) -> ObjectGeometry {
    let base = road_point(odr, origin, src.s, src.t);
    let points = src
        .outline
        .iter()
        .map(|c| {
            let local = Point2::new(c.x, c.y).rotated(yaw);
            Point3::new(
                base.x + local.x,
                base.y + local.y,
                base.z + src.z_offset + c.z,
            )
        })
        .collect();
    ObjectGeometry {
        points,
        closed: src.outline_closed,
    }
}

/// 重复记录沿参考线展开为一条采样线，t / 高程偏移线性插值
fn repeat_geometry(odr: &OdrRoad, rep: &OdrRepeat, origin: Point2) -> ObjectGeometry {
    let step = if rep.distance > REPEAT_MIN_LEN {
        rep.distance
    } else {
        REPEAT_DEFAULT_STEP
    };
    let mut points = Polyline::new();
    let mut ds = 0.0;
    while ds <= rep.length + 1e-3 {
        let frac = (ds / rep.length).clamp(0.0, 1.0);
        let t = rep.t_start + (rep.t_end - rep.t_start) * frac;
        let z_off = rep.z_offset_start + (rep.z_offset_end - rep.z_offset_start) * frac;
        let mut p = road_point(odr, origin, rep.s + ds, t);
        p.z += z_off;
        points.push(p);
        ds += step;
    }
    ObjectGeometry {
        points,
        closed: false,
    }
}

/// 无轮廓停车位的占地矩形
fn footprint_rect(src: &OdrObject, position: Point3, yaw: f64) -> ObjectGeometry {
    let half_l = src.length * 0.5;
    let half_w = src.width * 0.5;
    let corners = [
        Point2::new(half_l, half_w),
        Point2::new(half_l, -half_w),
        Point2::new(-half_l, -half_w),
        Point2::new(-half_l, half_w),
    ];
    let points = corners
        .iter()
        .map(|c| {
            let r = c.rotated(yaw);
            Point3::new(position.x + r.x, position.y + r.y, position.z)
        })
        .collect();
    ObjectGeometry {
        points,
        closed: true,
    }
}

/// 有效性声明展开为车道定位
fn relied_lanes(odr: &OdrRoad, src: &OdrObject) -> Vec<LaneUid> {
    let section = odr.section_index_at(src.s) as u64;
    let mut out = Vec::new();
    for &(from, to) in &src.validity {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        for lane in lo..=hi {
            if lane == 0 {
                continue;
            }
            out.push(LaneUid::new(odr.id, section, lane));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_geo::{Curve, CurvePose};
    use rn_model::Orientation;
    use rn_xodr::Poly3Seg;
    use std::f64::consts::FRAC_PI_2;

    fn road_with(objects: Vec<OdrObject>) -> OdrRoad {
        OdrRoad {
            id: 3,
            length: 100.0,
            geometry: vec![Curve::line(CurvePose::new(0.0, 0.0, 0.0, 0.0, 100.0))],
            elevations: vec![Poly3Seg {
                s: 0.0,
                a: 10.0,
                b: 0.0,
                c: 0.0,
                d: 0.0,
            }],
            objects,
            ..OdrRoad::default()
        }
    }

    #[test]
    fn test_position_and_yaw() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            s: 20.0,
            t: -3.0,
            z_offset: 1.5,
            hdg: 0.2,
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        let obj = &objs[0];
        // 直线沿 x 轴，法向 +y，t = -3 在右侧
        assert!((obj.position.x - 20.0).abs() < 1e-9);
        assert!((obj.position.y + 3.0).abs() < 1e-9);
        assert!((obj.position.z - 11.5).abs() < 1e-9);
        assert!((obj.yaw - 0.2).abs() < 1e-12);
        // 无轮廓对象有单点几何
        assert_eq!(obj.geometries.len(), 1);
        assert_eq!(obj.geometries[0].points.len(), 1);
    }

    #[test]
    fn test_signal_orientation_flip() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            is_signal: true,
            s: 10.0,
            hdg: 0.0,
            orientation: Orientation::Minus,
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        assert!((objs[0].yaw - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_outline_rotated() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            s: 50.0,
            t: 0.0,
            hdg: FRAC_PI_2,
            outline: vec![Point3::new(2.0, 0.0, 0.5)],
            outline_closed: true,
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        let geom = &objs[0].geometries[0];
        assert!(geom.closed);
        let p = geom.points.start().unwrap();
        // 局部 (2, 0) 旋转 90° 后指向 +y
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 2.0).abs() < 1e-9);
        assert!((p.z - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_expansion() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            s: 0.0,
            repeat: Some(OdrRepeat {
                s: 10.0,
                length: 20.0,
                distance: 5.0,
                t_start: -2.0,
                t_end: -4.0,
                ..OdrRepeat::default()
            }),
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        let pts = &objs[0].geometries[0].points;
        // 10, 15, 20, 25, 30 → 5 个采样
        assert_eq!(pts.len(), 5);
        assert!((pts.start().unwrap().y + 2.0).abs() < 1e-9);
        assert!((pts.end().unwrap().y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_parking_rect() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            kind: ObjectKind::ParkingSpace,
            s: 30.0,
            t: -5.0,
            length: 6.0,
            width: 3.0,
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        let geom = &objs[0].geometries[0];
        assert!(geom.closed);
        assert_eq!(geom.points.len(), 4);
        let p = geom.points.start().unwrap();
        assert!((p.x - 33.0).abs() < 1e-9);
        assert!((p.y + 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_validity_lanes() {
        let odr = road_with(vec![OdrObject {
            id: 1,
            s: 10.0,
            validity: vec![(-2, -1)],
            ..OdrObject::default()
        }]);
        let objs = place_objects(&odr, &Header::default());
        assert_eq!(objs[0].relied_lanes.len(), 2);
        assert!(objs[0].relied_lanes.contains(&LaneUid::new(3, 0, -1)));
    }
}
