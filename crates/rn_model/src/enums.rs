// roadnet\crates\rn_model\src/enums.rs

//! 路网枚举类型
//!
//! 与 OpenDRIVE 文本值的互转集中在这里，解析失败一律落到
//! 各枚举的兜底变体而不是报错。

use serde::{Deserialize, Serialize};

/// 几何当前所处的坐标frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordFrame {
    /// 源平面坐标（米）
    #[default]
    Planar,
    /// WGS84 经纬度
    Wgs84,
}

/// 连接附着在目标几何的哪一端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactPoint {
    /// 起点
    #[default]
    Start,
    /// 终点
    End,
}

impl ContactPoint {
    /// 解析 contactPoint 属性，默认 Start
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "end" => Self::End,
            _ => Self::Start,
        }
    }

    /// 取反
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// 车道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaneType {
    /// 未知/不可行驶
    #[default]
    None,
    /// 机动车道
    Driving,
    /// 停车带
    Stop,
    /// 路肩
    Shoulder,
    /// 非机动车道
    Biking,
    /// 人行道
    Sidewalk,
    /// 边界隔离带
    Border,
    /// 限制车道
    Restricted,
    /// 停车位
    Parking,
    /// 双向车道
    Bidirectional,
    /// 中央隔离带
    Median,
    /// 公交专用道
    BusOnly,
    /// 匝道入口
    Entry,
    /// 匝道出口
    Exit,
    /// 上匝道
    OnRamp,
    /// 下匝道
    OffRamp,
    /// 连接匝道
    ConnectingRamp,
    /// 有轨电车道
    Tram,
    /// 铁轨
    Rail,
    /// 施工区
    RoadWorks,
}

impl LaneType {
    /// 解析 lane type 属性
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "driving" => Self::Driving,
            "stop" => Self::Stop,
            "shoulder" => Self::Shoulder,
            "biking" => Self::Biking,
            "sidewalk" => Self::Sidewalk,
            "border" => Self::Border,
            "restricted" => Self::Restricted,
            "parking" => Self::Parking,
            "bidirectional" => Self::Bidirectional,
            "median" => Self::Median,
            "busOnly" | "bus" | "taxi" => Self::BusOnly,
            "entry" => Self::Entry,
            "exit" => Self::Exit,
            "onRamp" => Self::OnRamp,
            "offRamp" => Self::OffRamp,
            "connectingRamp" => Self::ConnectingRamp,
            "tram" => Self::Tram,
            "rail" => Self::Rail,
            "roadWorks" => Self::RoadWorks,
            _ => Self::None,
        }
    }

    /// 是否参与拓扑连接的可行驶车道
    #[inline]
    #[must_use]
    pub fn is_drivable(&self) -> bool {
        matches!(
            self,
            Self::Driving | Self::Bidirectional | Self::BusOnly | Self::Entry | Self::Exit
        )
    }
}

/// 路面标线线型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkType {
    /// 无标线
    #[default]
    None,
    /// 实线
    Solid,
    /// 虚线
    Broken,
    /// 双实线
    SolidSolid,
    /// 实虚线
    SolidBroken,
    /// 虚实线
    BrokenSolid,
    /// 双虚线
    BrokenBroken,
    /// 振动标线
    BottsDots,
    /// 草地边界
    Grass,
    /// 路缘
    Curb,
}

impl MarkType {
    /// 解析 roadMark type 属性
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "solid" => Self::Solid,
            "broken" => Self::Broken,
            "solid solid" => Self::SolidSolid,
            "solid broken" => Self::SolidBroken,
            "broken solid" => Self::BrokenSolid,
            "broken broken" => Self::BrokenBroken,
            "botts dots" => Self::BottsDots,
            "grass" => Self::Grass,
            "curb" => Self::Curb,
            _ => Self::None,
        }
    }
}

/// 路面标线颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkColor {
    /// 标准（白）
    #[default]
    Standard,
    /// 白色
    White,
    /// 黄色
    Yellow,
    /// 红色
    Red,
    /// 蓝色
    Blue,
    /// 绿色
    Green,
}

impl MarkColor {
    /// 解析 roadMark color 属性
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "white" => Self::White,
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            "blue" => Self::Blue,
            "green" => Self::Green,
            _ => Self::Standard,
        }
    }
}

/// 道路类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoadType {
    /// 普通道路
    #[default]
    Normal,
    /// 乡村道路
    Rural,
    /// 高速公路
    Motorway,
    /// 城镇道路
    Town,
    /// 低速道路
    LowSpeed,
    /// 步行区
    Pedestrian,
}

impl RoadType {
    /// 解析 road type 属性
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "rural" => Self::Rural,
            "motorway" => Self::Motorway,
            "town" => Self::Town,
            "lowspeed" | "lowSpeed" => Self::LowSpeed,
            "pedestrian" => Self::Pedestrian,
            _ => Self::Normal,
        }
    }
}

/// 对象朝向符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// 未声明
    #[default]
    None,
    /// 沿行车方向
    Plus,
    /// 逆行车方向（解算姿态时偏航加 π）
    Minus,
}

impl Orientation {
    /// 解析 orientation 属性
    #[must_use]
    pub fn from_odr(s: &str) -> Self {
        match s {
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => Self::None,
        }
    }
}

/// 路侧对象/信号类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectKind {
    /// 未知
    #[default]
    Unknown,
    /// 杆状物
    Pole,
    /// 树木
    Tree,
    /// 建筑
    Building,
    /// 护栏/障碍
    Barrier,
    /// 交通标志
    TrafficSign,
    /// 交通信号灯
    TrafficLight,
    /// 人行横道
    Crosswalk,
    /// 停车位
    ParkingSpace,
    /// 隧道
    Tunnel,
    /// 桥梁
    Bridge,
    /// 减速带
    SpeedBump,
    /// 井盖
    Manhole,
    /// 地面箭头等标识
    RoadSign,
}

impl ObjectKind {
    /// 解析 object type 属性
    #[must_use]
    pub fn from_odr(type_attr: &str, name: &str) -> Self {
        match type_attr {
            "pole" => Self::Pole,
            "tree" | "vegetation" => Self::Tree,
            "building" => Self::Building,
            "barrier" | "railing" | "obstacle" => Self::Barrier,
            "crosswalk" => Self::Crosswalk,
            "parkingSpace" => Self::ParkingSpace,
            "tunnel" => Self::Tunnel,
            "bridge" => Self::Bridge,
            "speedBump" => Self::SpeedBump,
            "manhole" => Self::Manhole,
            "roadMark" | "arrow" => Self::RoadSign,
            "trafficLight" => Self::TrafficLight,
            "trafficSign" | "signal" => Self::TrafficSign,
            _ => {
                // 部分数据源仅在 name 中区分类别
                if name.contains("Tunnel") {
                    Self::Tunnel
                } else if name.contains("Crosswalk") {
                    Self::Crosswalk
                } else {
                    Self::Unknown
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_point() {
        assert_eq!(ContactPoint::from_odr("end"), ContactPoint::End);
        assert_eq!(ContactPoint::from_odr("start"), ContactPoint::Start);
        assert_eq!(ContactPoint::Start.flipped(), ContactPoint::End);
        assert_eq!(ContactPoint::default(), ContactPoint::Start);
    }

    #[test]
    fn test_lane_type_table() {
        assert_eq!(LaneType::from_odr("driving"), LaneType::Driving);
        assert_eq!(LaneType::from_odr("busOnly"), LaneType::BusOnly);
        assert_eq!(LaneType::from_odr("whatever"), LaneType::None);
        assert!(LaneType::Driving.is_drivable());
        assert!(!LaneType::Sidewalk.is_drivable());
    }

    #[test]
    fn test_mark_parsing() {
        assert_eq!(MarkType::from_odr("solid solid"), MarkType::SolidSolid);
        assert_eq!(MarkColor::from_odr("yellow"), MarkColor::Yellow);
    }

    #[test]
    fn test_road_type() {
        assert_eq!(RoadType::from_odr("motorway"), RoadType::Motorway);
        assert_eq!(RoadType::from_odr(""), RoadType::Normal);
    }

    #[test]
    fn test_object_kind_from_name_fallback() {
        assert_eq!(ObjectKind::from_odr("none", "Tunnel_01"), ObjectKind::Tunnel);
        assert_eq!(ObjectKind::from_odr("pole", ""), ObjectKind::Pole);
    }
}
