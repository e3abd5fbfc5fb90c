// roadnet\crates\rn_model\src/link.rs

//! 车道连接
//!
//! 车道级有向连接记录。路口内的连接由连接道路的几何拼接而来并
//! 携带自己的边界拷贝；路口外的连接只是端点相接的拓扑记录。

use rn_foundation::ids::{JunctionId, LinkId, RoadId};
use rn_foundation::LaneUid;
use rn_geo::{Point3, Polyline};
use serde::{Deserialize, Serialize};

use crate::enums::ContactPoint;
use crate::road::LaneBoundary;

/// 车道连接
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneLink {
    /// 连接 id，入库时统一分配
    pub id: LinkId,
    /// 起点车道
    pub from: LaneUid,
    /// 终点车道
    pub to: LaneUid,
    /// 连接附着在起点道路的哪一端
    pub from_contact: ContactPoint,
    /// 连接附着在终点道路的哪一端
    pub to_contact: ContactPoint,
    /// 所属路口，非路口连接为 0
    pub junction: JunctionId,
    /// 路口内连接对应的原始连接道路 id，非路口连接为 0
    pub odr_road: RoadId,
    /// 连接几何（路口内为拼接后的车道中心线）
    pub geometry: Polyline,
    /// 左侧边界拷贝，按拼接顺序排列
    pub left_boundaries: Vec<LaneBoundary>,
    /// 右侧边界拷贝
    pub right_boundaries: Vec<LaneBoundary>,
    /// 平均曲率
    pub mean_curvature: f64,
    /// 平均坡度
    pub mean_slope: f64,
    /// 高程控制点（catmull-rom），空表示无
    pub ele_control: Vec<Point3>,
    /// 平面控制点（特定数据源提供），空表示无
    pub control_points: Vec<Point3>,
}

impl LaneLink {
    /// 两条连接是否描述同一对车道
    #[inline]
    #[must_use]
    pub fn same_route(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// 去重键："fromRoad_toRoad"
    #[must_use]
    pub fn route_key(&self) -> String {
        format!("{}_{}", self.from.road, self.to.road)
    }

    /// 就地反转：交换起终点并反转全部几何
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        std::mem::swap(&mut self.from_contact, &mut self.to_contact);
        self.geometry.reverse();
        for bdy in self
            .left_boundaries
            .iter_mut()
            .chain(self.right_boundaries.iter_mut())
        {
            bdy.reverse();
        }
        std::mem::swap(&mut self.left_boundaries, &mut self.right_boundaries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(road: u64, section: u64, lane: i64) -> LaneUid {
        LaneUid::new(road, section, lane)
    }

    #[test]
    fn test_same_route() {
        let a = LaneLink {
            from: uid(1, 0, -1),
            to: uid(2, 0, -1),
            ..LaneLink::default()
        };
        let mut b = a.clone();
        assert!(a.same_route(&b));
        b.to = uid(2, 0, -2);
        assert!(!a.same_route(&b));
        assert_eq!(a.route_key(), "1_2");
    }

    #[test]
    fn test_reverse_swaps_sides() {
        let mut link = LaneLink {
            from: uid(1, 0, -1),
            to: uid(2, 1, -1),
            from_contact: ContactPoint::End,
            to_contact: ContactPoint::Start,
            ..LaneLink::default()
        };
        link.geometry.push(Point3::new(0.0, 0.0, 0.0));
        link.geometry.push(Point3::new(10.0, 0.0, 0.0));
        link.left_boundaries.push(LaneBoundary {
            id: 7,
            ..LaneBoundary::default()
        });

        link.reverse();

        assert_eq!(link.from, uid(2, 1, -1));
        assert_eq!(link.to, uid(1, 0, -1));
        assert_eq!(link.from_contact, ContactPoint::Start);
        assert_eq!(link.to_contact, ContactPoint::End);
        assert!((link.geometry.start().unwrap().x - 10.0).abs() < 1e-12);
        // 左右边界互换
        assert!(link.left_boundaries.is_empty());
        assert_eq!(link.right_boundaries[0].id, 7);
    }
}
