// roadnet\crates\rn_build\src/pipeline.rs

//! 重建管线编排
//!
//! 道路级重建相互独立，按预分配的结果槽并行展开；拓扑连接、
//! 平滑与重投影在单线程阶段顺序完成。路口连接道路在生成连接后
//! 从道路表删除，其对象改挂到对应的连接上。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::AtomicU64;

use rayon::prelude::*;
use rn_foundation::ids::RoadId;
use rn_foundation::{LaneUid, RnResult};
use rn_geo::{Point2, Point3, SpatialRef};
use rn_model::{Controller, Junction, LaneLink, MapObject, RoadNetwork};
use rn_xodr::{OdrMap, OdrRoad};
use tracing::{info, warn};

use crate::area::select_roads;
use crate::bilateral::split_bilateral;
use crate::config::BuildOptions;
use crate::linker::{dedup_and_assign, junction_links, road_links, smooth_link_transitions};
use crate::reproject::reproject_network;
use crate::section_builder::{build_road, BuiltRoad};

/// 高程记录按控制点语义处理的数据源标识
const VENDOR_CONTROL_POINTS: &str = "tadsim v2.0";

/// 从解析后的文档重建整幅路网
pub fn build_network(map: &OdrMap, opts: &BuildOptions) -> RnResult<RoadNetwork> {
    let source = SpatialRef::parse_or_fallback(&map.header.geo_reference);
    let origin = Point2::new(map.header.west, map.header.south);
    let vendor_cp = map.header.vendor == VENDOR_CONTROL_POINTS;

    // 区域裁剪：确定参与重建的道路集合
    let todo: Vec<&OdrRoad> = match &opts.area {
        Some(rects) => {
            let keep = select_roads(map, rects, source, origin, &opts.tolerances);
            map.roads.iter().filter(|r| keep.contains(&r.id)).collect()
        }
        None => map.roads.iter().collect(),
    };
    info!(total = map.roads.len(), selected = todo.len(), "开始重建");

    // 道路级重建：预分配结果槽，按槽并行
    let bound_ids = AtomicU64::new(1);
    let mut slots: Vec<Option<RnResult<BuiltRoad>>> = Vec::new();
    slots.resize_with(todo.len(), || None);
    if opts.parallel {
        slots
            .par_iter_mut()
            .zip(todo.par_iter())
            .for_each(|(slot, odr)| {
                *slot = Some(build_road(odr, &map.header, &bound_ids, &opts.tolerances));
            });
    } else {
        for (slot, odr) in slots.iter_mut().zip(todo.iter()) {
            *slot = Some(build_road(odr, &map.header, &bound_ids, &opts.tolerances));
        }
    }

    let mut roads = BTreeMap::new();
    let mut objects: Vec<MapObject> = Vec::new();
    for slot in slots {
        let Some(result) = slot else { continue };
        // 单条道路重建失败只丢弃该道路，批次继续
        match result {
            Ok(built) => {
                objects.extend(built.objects);
                roads.insert(built.road.id, built.road);
            }
            Err(e) => warn!("道路重建失败，跳过: {e}"),
        }
    }

    // 车道端点索引：端点吸附连接用
    let lane_ends: HashMap<LaneUid, (Point3, Point3)> = roads
        .values()
        .flat_map(|r| r.sections.iter().flat_map(|s| s.lanes.iter()))
        .filter_map(|l| {
            Some((
                LaneUid::new(l.road, l.section, l.id),
                (l.geometry.start()?, l.geometry.end()?),
            ))
        })
        .collect();

    // 拓扑连接
    let mut raw_links: Vec<LaneLink> = Vec::new();
    let mut erased: HashSet<RoadId> = HashSet::new();
    for odr in &todo {
        if odr.junction > 0 {
            junction_links(odr, odr.junction, &roads, vendor_cp, &opts.tolerances, &mut raw_links);
            erased.insert(odr.id);
        } else {
            raw_links.extend(road_links(odr, &roads, &lane_ends, &opts.tolerances));
        }
    }
    let links = dedup_and_assign(raw_links);
    info!(links = links.len(), erased = erased.len(), "拓扑连接完成");

    smooth_link_transitions(&links, &mut roads, &opts.tolerances);

    // 连接道路退场；其上的对象改挂到生成的连接
    for id in &erased {
        roads.remove(id);
    }
    for obj in &mut objects {
        if erased.contains(&obj.road) {
            match links.iter().find(|l| l.odr_road == obj.road) {
                Some(link) => obj.link = link.id,
                None => warn!(object = obj.id, road = obj.road, "对象所在连接道路未产生连接"),
            }
        }
    }

    let junctions = assemble_junctions(map, &links);

    let mut net = RoadNetwork {
        header: map.header.clone(),
        roads: roads.into_values().collect(),
        links,
        junctions,
        objects,
    };

    if opts.split_bilateral {
        let replaced = split_bilateral(&mut net, &bound_ids);
        info!(moved = replaced.len(), "双向道路拆分完成");
    }
    if opts.reproject {
        reproject_network(&mut net, source)?;
    }
    Ok(net)
}

/// 汇总路口：连接 id 来自生成的连接表，控制器按声明的 id 关联
fn assemble_junctions(map: &OdrMap, links: &[LaneLink]) -> Vec<Junction> {
    map.junctions
        .iter()
        .map(|src| Junction {
            id: src.id,
            name: src.name.clone(),
            link_ids: links
                .iter()
                .filter(|l| l.junction == src.id)
                .map(|l| l.id)
                .collect(),
            controllers: src
                .controller_ids
                .iter()
                .filter_map(|cid| {
                    let ctrl = map.controllers.iter().find(|c| c.id == *cid)?;
                    Some(Controller {
                        id: ctrl.id,
                        name: ctrl.name.clone(),
                        signals: ctrl.signals.clone(),
                    })
                })
                .collect(),
        })
        .collect()
}
