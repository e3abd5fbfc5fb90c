// roadnet\crates\rn_xodr\src/parse.rs

//! OpenDRIVE 文档解析
//!
//! 道路、车道、对象、信号、路口与控制器各有独立的解析函数，
//! 顶层 [`parse_document`] 汇总为 [`OdrMap`]。数值属性按 0 兜底；
//! 道路/路口级的结构缺失只丢弃该条目并告警，整个文档失败仅限
//! 根元素或 header 缺失。

use rn_foundation::{BuildTolerances, RnError, RnResult};
use rn_geo::Point3;
use rn_model::{
    ContactPoint, Header, LaneType, MarkColor, MarkType, ObjectKind, Orientation, RoadType,
};
use roxmltree::Node;
use tracing::warn;

use crate::ast::{
    OdrConnection, OdrController, OdrJunction, OdrLane, OdrMap, OdrMark, OdrObject, OdrRepeat,
    OdrRoad, OdrRoadLink, OdrSection, Poly3Seg,
};
use crate::geometry::{fold_degenerate, parse_plan_view};
use crate::xml::{
    attr_f64, attr_f64_or, attr_i64, attr_string, attr_u64, child, children, req_attr_u64,
};

/// 解析整个文档
pub fn parse_document(doc: &roxmltree::Document<'_>) -> RnResult<OdrMap> {
    let root = doc.root_element();
    if root.tag_name().name() != "OpenDRIVE" {
        return Err(RnError::structure(format!(
            "根元素不是 OpenDRIVE: {}",
            root.tag_name().name()
        )));
    }

    let header = child(root, "header")
        .map(parse_header)
        .ok_or_else(|| RnError::structure("文档缺少 header 节点"))?;

    // 单条道路/路口的解析失败就地吸收，丢弃该条目而不中断整个文档
    let mut roads = Vec::new();
    for node in children(root, "road") {
        match parse_road(node) {
            Ok(road) => roads.push(road),
            Err(e) => warn!("跳过无法解析的道路: {e}"),
        }
    }

    let mut junctions = Vec::new();
    for node in children(root, "junction") {
        match parse_junction(node) {
            Ok(junction) => junctions.push(junction),
            Err(e) => warn!("跳过无法解析的路口: {e}"),
        }
    }

    let controllers = children(root, "controller").map(parse_controller).collect();

    Ok(OdrMap {
        header,
        roads,
        junctions,
        controllers,
    })
}

// ============================================================================
// 头部
// ============================================================================

fn parse_header(node: Node<'_, '_>) -> Header {
    let geo_reference = child(node, "geoReference")
        .and_then(|n| n.text())
        .unwrap_or("")
        .trim()
        .to_string();
    Header {
        rev_major: attr_u64(node, "revMajor") as u32,
        rev_minor: attr_u64(node, "revMinor") as u32,
        name: attr_string(node, "name"),
        version: attr_string(node, "version"),
        date: attr_string(node, "date"),
        north: attr_f64(node, "north"),
        south: attr_f64(node, "south"),
        east: attr_f64(node, "east"),
        west: attr_f64(node, "west"),
        vendor: attr_string(node, "vendor"),
        geo_reference,
    }
}

// ============================================================================
// 道路
// ============================================================================

fn parse_road(node: Node<'_, '_>) -> RnResult<OdrRoad> {
    let id = req_attr_u64(node, "id")?;
    // junction="-1" 表示普通道路
    let junction = attr_i64(node, "junction").max(0) as u64;

    let mut road = OdrRoad {
        id,
        name: attr_string(node, "name"),
        length: attr_f64(node, "length"),
        junction,
        ..OdrRoad::default()
    };

    if let Some(type_node) = child(node, "type") {
        road.kind = RoadType::from_odr(&attr_string(type_node, "type"));
        if let Some(speed) = child(type_node, "speed") {
            road.speed_limit = parse_speed(speed);
        }
    }

    if let Some(link) = child(node, "link") {
        road.predecessor = child(link, "predecessor").and_then(parse_road_link);
        road.successor = child(link, "successor").and_then(parse_road_link);
    }

    if let Some(plan_view) = child(node, "planView") {
        road.geometry = parse_plan_view(plan_view)?;
        fold_degenerate(&mut road.geometry, &BuildTolerances::default());
    }
    if road.geometry.is_empty() {
        return Err(RnError::structure(format!("道路 {id} 没有 planView 几何")));
    }

    if let Some(profile) = child(node, "elevationProfile") {
        road.elevations = children(profile, "elevation")
            .map(|n| parse_poly_seg(n, "s"))
            .collect();
        road.elevations.sort_by(|a, b| a.s.total_cmp(&b.s));
    }

    if let Some(lanes) = child(node, "lanes") {
        road.lane_offsets = children(lanes, "laneOffset")
            .map(|n| parse_poly_seg(n, "s"))
            .collect();
        road.lane_offsets.sort_by(|a, b| a.s.total_cmp(&b.s));

        for sec_node in children(lanes, "laneSection") {
            road.sections.push(parse_section(sec_node));
        }
        road.sections.sort_by(|a, b| a.s.total_cmp(&b.s));
    }
    if road.sections.is_empty() {
        warn!(road = id, "道路没有车道段，补一个空段");
        road.sections.push(OdrSection::default());
    }

    if let Some(objects) = child(node, "objects") {
        for obj_node in children(objects, "object") {
            road.objects.push(parse_object(obj_node));
        }
        // 隧道/桥梁是 objects 下的独立元素，只有 s/length 定位
        for t_node in children(objects, "tunnel") {
            road.objects.push(parse_span_structure(t_node, ObjectKind::Tunnel));
        }
        for b_node in children(objects, "bridge") {
            road.objects.push(parse_span_structure(b_node, ObjectKind::Bridge));
        }
    }
    if let Some(signals) = child(node, "signals") {
        for sig_node in children(signals, "signal") {
            road.objects.push(parse_signal(sig_node));
        }
    }

    Ok(road)
}

fn parse_road_link(node: Node<'_, '_>) -> Option<OdrRoadLink> {
    let id = node.attribute("elementId")?.parse::<u64>().ok()?;
    Some(OdrRoadLink {
        is_junction: attr_string(node, "elementType") == "junction",
        id,
        contact: ContactPoint::from_odr(&attr_string(node, "contactPoint")),
    })
}

/// 限速统一换算为 m/s
fn parse_speed(node: Node<'_, '_>) -> f64 {
    let max = attr_f64(node, "max");
    match attr_string(node, "unit").as_str() {
        "mph" => max * 0.44704,
        "km/h" => max / 3.6,
        _ => max,
    }
}

fn parse_poly_seg(node: Node<'_, '_>, s_attr: &str) -> Poly3Seg {
    Poly3Seg {
        s: attr_f64(node, s_attr),
        a: attr_f64(node, "a"),
        b: attr_f64(node, "b"),
        c: attr_f64(node, "c"),
        d: attr_f64(node, "d"),
    }
}

// ============================================================================
// 车道段
// ============================================================================

fn parse_section(node: Node<'_, '_>) -> OdrSection {
    let mut section = OdrSection {
        s: attr_f64(node, "s"),
        ..OdrSection::default()
    };
    for group in ["left", "center", "right"] {
        let Some(group_node) = child(node, group) else {
            continue;
        };
        for lane_node in children(group_node, "lane") {
            let lane = parse_lane(lane_node);
            if lane.id == 0 {
                section.center_marks = lane.marks;
            } else {
                section.lanes.push(lane);
            }
        }
    }
    section.lanes.sort_by_key(|l| l.id);
    section
}

fn parse_lane(node: Node<'_, '_>) -> OdrLane {
    let mut lane = OdrLane {
        id: attr_i64(node, "id"),
        kind: LaneType::from_odr(&attr_string(node, "type")),
        ..OdrLane::default()
    };

    if let Some(link) = child(node, "link") {
        lane.predecessor = child(link, "predecessor").map(|n| attr_i64(n, "id"));
        lane.successor = child(link, "successor").map(|n| attr_i64(n, "id"));
    }

    lane.widths = children(node, "width")
        .map(|n| {
            let mut seg = parse_poly_seg(n, "sOffset");
            // 负宽度记录按 0 处理
            if seg.is_linear() && seg.a < 0.0 {
                seg.a = 0.0;
            }
            seg
        })
        .collect();
    lane.widths.sort_by(|a, b| a.s.total_cmp(&b.s));

    lane.marks = children(node, "roadMark")
        .map(|n| OdrMark {
            s_offset: attr_f64(n, "sOffset"),
            kind: MarkType::from_odr(&attr_string(n, "type")),
            color: MarkColor::from_odr(&attr_string(n, "color")),
            width: attr_f64(n, "width"),
        })
        .collect();
    lane.marks.sort_by(|a, b| a.s_offset.total_cmp(&b.s_offset));

    if let Some(speed) = child(node, "speed") {
        lane.speed_limit = parse_speed(speed);
    }
    if let Some(material) = child(node, "material") {
        lane.friction = attr_f64(material, "friction");
        lane.material_offset = attr_f64(material, "sOffset");
    }
    lane
}

// ============================================================================
// 对象与信号
// ============================================================================

fn parse_object(node: Node<'_, '_>) -> OdrObject {
    let name = attr_string(node, "name");
    let kind = ObjectKind::from_odr(&attr_string(node, "type"), &name);
    let mut obj = OdrObject {
        id: attr_u64(node, "id"),
        name,
        kind,
        is_signal: false,
        s: attr_f64(node, "s"),
        t: attr_f64(node, "t"),
        z_offset: attr_f64(node, "zOffset"),
        hdg: attr_f64(node, "hdg"),
        pitch: attr_f64(node, "pitch"),
        roll: attr_f64(node, "roll"),
        orientation: Orientation::from_odr(&attr_string(node, "orientation")),
        length: attr_f64(node, "length"),
        width: attr_f64(node, "width"),
        height: attr_f64(node, "height"),
        ..OdrObject::default()
    };

    if let Some(repeat) = child(node, "repeat") {
        obj.repeat = Some(parse_repeat(repeat, &obj));
    }

    // outlines/outline 两种层次都有数据源在用
    let outline = child(node, "outline").or_else(|| {
        child(node, "outlines").and_then(|outer| child(outer, "outline"))
    });
    if let Some(outline) = outline {
        obj.outline_closed = attr_string(outline, "closed") != "false";
        obj.outline = children(outline, "cornerLocal")
            .map(|c| Point3::new(attr_f64(c, "u"), attr_f64(c, "v"), attr_f64(c, "z")))
            .collect();
    }

    obj.validity = parse_validity(node);
    obj
}

/// `<tunnel>`/`<bridge>`：沿参考线展布的构筑物，按对象记录
fn parse_span_structure(node: Node<'_, '_>, kind: ObjectKind) -> OdrObject {
    OdrObject {
        id: attr_u64(node, "id"),
        name: attr_string(node, "name"),
        kind,
        s: attr_f64(node, "s"),
        length: attr_f64(node, "length"),
        ..OdrObject::default()
    }
}

fn parse_repeat(node: Node<'_, '_>, obj: &OdrObject) -> OdrRepeat {
    OdrRepeat {
        s: attr_f64_or(node, "s", obj.s),
        length: attr_f64(node, "length"),
        distance: attr_f64(node, "distance"),
        t_start: attr_f64_or(node, "tStart", obj.t),
        t_end: attr_f64_or(node, "tEnd", obj.t),
        width_start: attr_f64_or(node, "widthStart", obj.width),
        width_end: attr_f64_or(node, "widthEnd", obj.width),
        height_start: attr_f64_or(node, "heightStart", obj.height),
        height_end: attr_f64_or(node, "heightEnd", obj.height),
        z_offset_start: attr_f64_or(node, "zOffsetStart", obj.z_offset),
        z_offset_end: attr_f64_or(node, "zOffsetEnd", obj.z_offset),
    }
}

fn parse_signal(node: Node<'_, '_>) -> OdrObject {
    let name = attr_string(node, "name");
    // 动态信号是信号灯，静态的是标志牌
    let kind = if attr_string(node, "dynamic") == "yes" {
        ObjectKind::TrafficLight
    } else {
        ObjectKind::TrafficSign
    };
    OdrObject {
        id: attr_u64(node, "id"),
        name,
        kind,
        is_signal: true,
        s: attr_f64(node, "s"),
        t: attr_f64(node, "t"),
        z_offset: attr_f64(node, "zOffset"),
        hdg: attr_f64(node, "hOffset"),
        pitch: attr_f64(node, "pitch"),
        roll: attr_f64(node, "roll"),
        orientation: Orientation::from_odr(&attr_string(node, "orientation")),
        height: attr_f64(node, "height"),
        width: attr_f64(node, "width"),
        validity: parse_validity(node),
        ..OdrObject::default()
    }
}

fn parse_validity(node: Node<'_, '_>) -> Vec<(i64, i64)> {
    children(node, "validity")
        .map(|v| (attr_i64(v, "fromLane"), attr_i64(v, "toLane")))
        .collect()
}

// ============================================================================
// 路口与控制器
// ============================================================================

fn parse_junction(node: Node<'_, '_>) -> RnResult<OdrJunction> {
    let id = req_attr_u64(node, "id")?;
    let mut junction = OdrJunction {
        id,
        name: attr_string(node, "name"),
        ..OdrJunction::default()
    };
    for conn_node in children(node, "connection") {
        let lane_links = children(conn_node, "laneLink")
            .map(|l| (attr_i64(l, "from"), attr_i64(l, "to")))
            .collect();
        junction.connections.push(OdrConnection {
            id: attr_u64(conn_node, "id"),
            incoming_road: attr_u64(conn_node, "incomingRoad"),
            connecting_road: attr_u64(conn_node, "connectingRoad"),
            contact: ContactPoint::from_odr(&attr_string(conn_node, "contactPoint")),
            lane_links,
        });
    }
    junction.controller_ids = children(node, "controller")
        .map(|c| attr_u64(c, "id"))
        .collect();
    Ok(junction)
}

fn parse_controller(node: Node<'_, '_>) -> OdrController {
    OdrController {
        id: attr_u64(node, "id"),
        name: attr_string(node, "name"),
        signals: children(node, "control")
            .map(|c| attr_u64(c, "signalId"))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rn_geo::Curve;

    const MINIMAL: &str = r#"
<OpenDRIVE>
  <header revMajor="1" revMinor="5" name="demo" vendor="tadsim v2.0">
    <geoReference><![CDATA[+proj=merc +a=6378137 +b=6378137]]></geoReference>
  </header>
  <road id="1" name="r1" length="100" junction="-1">
    <type s="0" type="town">
      <speed max="36" unit="km/h"/>
    </type>
    <link>
      <successor elementType="road" elementId="2" contactPoint="start"/>
    </link>
    <planView>
      <geometry s="0" x="0" y="0" hdg="0" length="100"><line/></geometry>
    </planView>
    <elevationProfile>
      <elevation s="0" a="10" b="0.01" c="0" d="0"/>
    </elevationProfile>
    <lanes>
      <laneOffset s="0" a="0" b="0" c="0" d="0"/>
      <laneSection s="0">
        <center>
          <lane id="0" type="none">
            <roadMark sOffset="0" type="solid" color="yellow" width="0.15"/>
          </lane>
        </center>
        <right>
          <lane id="-1" type="driving">
            <link><successor id="-1"/></link>
            <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
            <roadMark sOffset="0" type="broken" color="white" width="0.15"/>
            <speed sOffset="0" max="10" unit="m/s"/>
          </lane>
          <lane id="-2" type="sidewalk">
            <width sOffset="0" a="2.0" b="0" c="0" d="0"/>
          </lane>
        </right>
      </laneSection>
    </lanes>
    <objects>
      <object id="7" name="Pole01" type="pole" s="50" t="-6" zOffset="0"
              hdg="0.1" orientation="+" length="0.3" width="0.3" height="5">
        <validity fromLane="-2" toLane="-1"/>
      </object>
    </objects>
    <signals>
      <signal id="8" name="Light" dynamic="yes" s="90" t="-7" zOffset="5.5"
              hOffset="0.2" orientation="-"/>
    </signals>
  </road>
  <junction id="100" name="J1">
    <connection id="0" incomingRoad="1" connectingRoad="5" contactPoint="start">
      <laneLink from="-1" to="-1"/>
    </connection>
    <controller id="11" type="0"/>
  </junction>
  <controller id="11" name="ctrl">
    <control signalId="8" type="0"/>
  </controller>
</OpenDRIVE>"#;

    fn parse(xml: &str) -> OdrMap {
        let doc = roxmltree::Document::parse(xml).unwrap();
        parse_document(&doc).unwrap()
    }

    #[test]
    fn test_parse_minimal_document() {
        let map = parse(MINIMAL);
        assert_eq!(map.header.rev_minor, 5);
        assert_eq!(map.header.vendor, "tadsim v2.0");
        assert!(map.header.geo_reference.contains("+proj=merc"));
        assert_eq!(map.roads.len(), 1);
        assert_eq!(map.junctions.len(), 1);
        assert_eq!(map.controllers.len(), 1);
    }

    #[test]
    fn test_parse_road_fields() {
        let map = parse(MINIMAL);
        let road = &map.roads[0];
        assert_eq!(road.id, 1);
        assert_eq!(road.junction, 0);
        assert_eq!(road.kind, rn_model::RoadType::Town);
        // 36 km/h = 10 m/s
        assert!((road.speed_limit - 10.0).abs() < 1e-9);
        assert!(road.predecessor.is_none());
        let suc = road.successor.unwrap();
        assert_eq!(suc.id, 2);
        assert_eq!(suc.contact, ContactPoint::Start);
        assert!(matches!(road.geometry[0], Curve::Line { .. }));
        assert_eq!(road.elevations.len(), 1);
    }

    #[test]
    fn test_parse_lanes_sorted_center_split() {
        let map = parse(MINIMAL);
        let sec = &map.roads[0].sections[0];
        // 中心车道不入车道表，标线单独保存
        assert_eq!(sec.lanes.len(), 2);
        assert_eq!(sec.lanes[0].id, -2);
        assert_eq!(sec.lanes[1].id, -1);
        assert_eq!(sec.center_marks.len(), 1);
        assert_eq!(sec.center_marks[0].color, MarkColor::Yellow);
        let drive = sec.lane(-1).unwrap();
        assert_eq!(drive.kind, LaneType::Driving);
        assert!((drive.width_at(0.0) - 3.5).abs() < 1e-12);
        assert!((drive.speed_limit - 10.0).abs() < 1e-12);
        assert_eq!(drive.successor, Some(-1));
    }

    #[test]
    fn test_parse_objects_and_signals() {
        let map = parse(MINIMAL);
        let objs = &map.roads[0].objects;
        assert_eq!(objs.len(), 2);
        let pole = &objs[0];
        assert_eq!(pole.kind, ObjectKind::Pole);
        assert!(!pole.is_signal);
        assert_eq!(pole.validity, vec![(-2, -1)]);
        let light = &objs[1];
        assert!(light.is_signal);
        assert_eq!(light.kind, ObjectKind::TrafficLight);
        assert_eq!(light.orientation, Orientation::Minus);
        assert!((light.hdg - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_parse_tunnel_and_bridge() {
        let doc = roxmltree::Document::parse(
            r#"<OpenDRIVE>
  <header revMajor="1" revMinor="4" name="t"/>
  <road id="1" length="200" junction="-1">
    <planView>
      <geometry s="0" x="0" y="0" hdg="0" length="200"><line/></geometry>
    </planView>
    <objects>
      <tunnel id="3" name="Tunnel_A" s="40" length="80" type="standard"/>
      <bridge id="4" name="B1" s="150" length="30" type="concrete"/>
    </objects>
  </road>
</OpenDRIVE>"#,
        )
        .unwrap();
        let map = parse_document(&doc).unwrap();
        let objs = &map.roads[0].objects;
        assert_eq!(objs.len(), 2);
        let tunnel = &objs[0];
        assert_eq!(tunnel.kind, ObjectKind::Tunnel);
        assert!((tunnel.s - 40.0).abs() < 1e-12);
        assert!((tunnel.length - 80.0).abs() < 1e-12);
        assert_eq!(objs[1].kind, ObjectKind::Bridge);
    }

    #[test]
    fn test_parse_junction_connection() {
        let map = parse(MINIMAL);
        let jc = &map.junctions[0];
        assert_eq!(jc.id, 100);
        assert_eq!(jc.connections.len(), 1);
        let conn = &jc.connections[0];
        assert_eq!(conn.incoming_road, 1);
        assert_eq!(conn.connecting_road, 5);
        assert_eq!(conn.lane_links, vec![(-1, -1)]);
        assert_eq!(jc.controller_ids, vec![11]);
        assert_eq!(map.controllers[0].signals, vec![8]);
    }

    #[test]
    fn test_road_without_geometry_dropped() {
        // 无 planView 的道路丢弃，同文档内的完好道路照常保留
        let doc = roxmltree::Document::parse(
            r#"<OpenDRIVE>
  <header revMajor="1" revMinor="4" name="t"/>
  <road id="1" length="10" junction="-1"><planView/></road>
  <road id="2" length="50" junction="-1">
    <planView>
      <geometry s="0" x="0" y="0" hdg="0" length="50"><line/></geometry>
    </planView>
  </road>
</OpenDRIVE>"#,
        )
        .unwrap();
        let map = parse_document(&doc).unwrap();
        assert_eq!(map.roads.len(), 1);
        assert_eq!(map.roads[0].id, 2);
    }

    #[test]
    fn test_degenerate_geometry_folded() {
        // 亚毫米几何元素在解析时并入邻接元素
        let doc = roxmltree::Document::parse(
            r#"<OpenDRIVE>
  <header revMajor="1" revMinor="4" name="t"/>
  <road id="1" length="100.0005" junction="-1">
    <planView>
      <geometry s="0" x="0" y="0" hdg="0" length="50"><line/></geometry>
      <geometry s="50" x="50" y="0" hdg="0" length="0.0005"><line/></geometry>
      <geometry s="50.0005" x="50.0005" y="0" hdg="0" length="50"><line/></geometry>
    </planView>
  </road>
</OpenDRIVE>"#,
        )
        .unwrap();
        let map = parse_document(&doc).unwrap();
        let geometry = &map.roads[0].geometry;
        assert_eq!(geometry.len(), 2);
        assert!((geometry[0].length() - 50.0005).abs() < 1e-12);
    }

    #[test]
    fn test_missing_header_rejected() {
        let doc = roxmltree::Document::parse(
            r#"<OpenDRIVE><road id="1" length="10" junction="-1"/></OpenDRIVE>"#,
        )
        .unwrap();
        assert!(parse_document(&doc).is_err());
    }

    #[test]
    fn test_wrong_root_rejected() {
        let doc = roxmltree::Document::parse("<NotDrive/>").unwrap();
        assert!(parse_document(&doc).is_err());
    }
}
