// roadnet\crates\rn_model\src/object.rs

//! 路侧对象与信号
//!
//! 对象在重建阶段从道路坐标 (s, t) 解算为世界坐标与姿态；
//! 带轮廓/重复描述的对象展开为若干条附加几何。

use rn_foundation::ids::{LinkId, RoadId};
use rn_foundation::LaneUid;
use rn_geo::{Point3, Polyline};
use serde::{Deserialize, Serialize};

use crate::enums::{ObjectKind, Orientation};

/// 对象附加几何（轮廓线、重复展开产生的采样线）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectGeometry {
    /// 采样点
    pub points: Polyline,
    /// 是否闭合轮廓
    pub closed: bool,
}

/// 路侧对象 / 信号
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapObject {
    /// 对象 id（源数据 id，道路内唯一）
    pub id: u64,
    /// 名称
    pub name: String,
    /// 类别
    pub kind: ObjectKind,
    /// 所属道路
    pub road: RoadId,
    /// 所属车道连接，0 表示直接挂在道路上。路口内连接道路上的
    /// 对象在该道路被拼接进连接后改挂到连接上
    pub link: LinkId,
    /// 参考线里程 [m]
    pub s: f64,
    /// 横向偏移 [m]，左正右负
    pub t: f64,
    /// 相对路面的高度偏移 [m]
    pub z_offset: f64,
    /// 相对参考线航向的偏转 [rad]
    pub hdg: f64,
    /// 俯仰 [rad]
    pub pitch: f64,
    /// 滚转 [rad]
    pub roll: f64,
    /// 朝向符号
    pub orientation: Orientation,
    /// 长 [m]
    pub length: f64,
    /// 宽 [m]
    pub width: f64,
    /// 高 [m]
    pub height: f64,
    /// 解算后的世界坐标
    pub position: Point3,
    /// 解算后的世界偏航 [rad]
    pub yaw: f64,
    /// 附加几何
    pub geometries: Vec<ObjectGeometry>,
    /// 有效性声明关联到的车道
    pub relied_lanes: Vec<LaneUid>,
}

impl MapObject {
    /// 对象是否携带轮廓或展开几何
    #[inline]
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        !self.geometries.is_empty()
    }

    /// 解算世界偏航：参考线航向 + 对象偏转，逆向对象再加 π
    #[must_use]
    pub fn resolve_yaw(ref_heading: f64, hdg: f64, orientation: Orientation) -> f64 {
        let mut yaw = ref_heading + hdg;
        if orientation == Orientation::Minus {
            yaw += std::f64::consts::PI;
        }
        yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_resolve_yaw() {
        let y = MapObject::resolve_yaw(0.5, 0.1, Orientation::Plus);
        assert!((y - 0.6).abs() < 1e-12);
        let y = MapObject::resolve_yaw(0.5, 0.1, Orientation::Minus);
        assert!((y - (0.6 + PI)).abs() < 1e-12);
    }

    #[test]
    fn test_has_geometry() {
        let mut obj = MapObject::default();
        assert!(!obj.has_geometry());
        obj.geometries.push(ObjectGeometry::default());
        assert!(obj.has_geometry());
    }
}
