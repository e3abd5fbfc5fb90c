// roadnet\crates\rn_model\src/network.rs

//! 重建完成的整幅路网

use rn_foundation::ids::{LinkId, RoadId};
use serde::{Deserialize, Serialize};

use crate::header::Header;
use crate::junction::Junction;
use crate::link::LaneLink;
use crate::object::MapObject;
use crate::road::Road;

/// 一幅完整路网：道路、连接、路口与路侧对象
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadNetwork {
    /// 地图头部
    pub header: Header,
    /// 道路表
    pub roads: Vec<Road>,
    /// 车道连接表
    pub links: Vec<LaneLink>,
    /// 路口表
    pub junctions: Vec<Junction>,
    /// 路侧对象表
    pub objects: Vec<MapObject>,
}

impl RoadNetwork {
    /// 按 id 查道路
    #[must_use]
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.iter().find(|r| r.id == id)
    }

    /// 按 id 查道路（可变）
    pub fn road_mut(&mut self, id: RoadId) -> Option<&mut Road> {
        self.roads.iter_mut().find(|r| r.id == id)
    }

    /// 按 id 查连接
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&LaneLink> {
        self.links.iter().find(|l| l.id == id)
    }

    /// 车道总数
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.roads
            .iter()
            .flat_map(|r| r.sections.iter())
            .map(|s| s.lanes.len())
            .sum()
    }
}
