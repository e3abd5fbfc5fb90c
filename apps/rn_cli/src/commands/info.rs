// roadnet\apps\rn_cli\src\commands\info.rs

//! 信息显示命令
//!
//! 显示地图头部、道路与路口统计。

use anyhow::{Context, Result};
use clap::Args;
use rn_geo::SpatialRef;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// OpenDRIVE (.xodr) 文件路径
    pub input: PathBuf,

    /// 逐条道路列出车道段与车道数
    #[arg(long)]
    pub roads: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== RoadNet 地图信息 ===");

    let map = rn_xodr::parse_file(&args.input)
        .with_context(|| format!("解析 {} 失败", args.input.display()))?;

    let hdr = &map.header;
    println!("=== 头部 ===");
    println!("名称: {}", if hdr.name.is_empty() { "(未命名)" } else { &hdr.name });
    println!("OpenDRIVE 版本: {}.{}", hdr.rev_major, hdr.rev_minor);
    if !hdr.vendor.is_empty() {
        println!("数据源: {}", hdr.vendor);
    }
    if hdr.has_extent() {
        println!(
            "范围: 西 {:.3} 南 {:.3} 东 {:.3} 北 {:.3}",
            hdr.west, hdr.south, hdr.east, hdr.north
        );
    }
    match SpatialRef::parse(&hdr.geo_reference) {
        Ok(srs) => println!("坐标系: {srs:?}"),
        Err(_) => println!("坐标系: 未识别，重建时回退到球面墨卡托"),
    }

    let total_len: f64 = map.roads.iter().map(|r| r.length).sum();
    let connectors = map.roads.iter().filter(|r| r.junction > 0).count();
    let lanes: usize = map
        .roads
        .iter()
        .flat_map(|r| r.sections.iter())
        .map(|s| s.lanes.len())
        .sum();
    let objects: usize = map.roads.iter().map(|r| r.objects.len()).sum();

    println!("\n=== 统计 ===");
    println!("道路: {} 条（路口连接 {} 条）", map.roads.len(), connectors);
    println!("参考线总长: {:.1} m", total_len);
    println!("车道: {lanes}");
    println!("路口: {}", map.junctions.len());
    println!("对象/信号: {objects}");

    if args.roads {
        println!("\n=== 道路明细 ===");
        for road in &map.roads {
            println!(
                "  #{:<6} 长 {:>8.1} m  段 {}  车道 {}{}",
                road.id,
                road.length,
                road.sections.len(),
                road.sections.iter().map(|s| s.lanes.len()).sum::<usize>(),
                if road.junction > 0 {
                    format!("  路口 {}", road.junction)
                } else {
                    String::new()
                }
            );
        }
    }
    Ok(())
}
