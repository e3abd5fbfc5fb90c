// roadnet\apps\rn_cli\src\commands\build.rs

//! 重建命令
//!
//! 解析 OpenDRIVE 地图，执行完整重建管线并导出 JSON。

use anyhow::{Context, Result};
use clap::Args;
use rn_build::{build_network, BuildOptions};
use rn_foundation::BuildTolerances;
use rn_geo::{Point2, Rect};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// 重建参数
#[derive(Args)]
pub struct BuildArgs {
    /// OpenDRIVE (.xodr) 文件路径
    pub input: PathBuf,

    /// 输出 JSON 文件路径
    #[arg(short, long, default_value = "network.json")]
    pub output: PathBuf,

    /// 保持源平面坐标（不重投影到 WGS84）
    #[arg(long)]
    pub planar: bool,

    /// 把双向道路拆分为两条单向道路
    #[arg(long)]
    pub split: bool,

    /// 区域裁剪：west,south,east,north（经纬度，可多次）
    #[arg(long, value_name = "RECT")]
    pub area: Vec<String>,

    /// 单线程重建
    #[arg(long)]
    pub serial: bool,

    /// 使用宽松容差（几何噪声较大的数据源）
    #[arg(long)]
    pub relaxed: bool,
}

/// 执行重建命令
pub fn execute(args: BuildArgs) -> Result<()> {
    info!("=== RoadNet 重建 ===");
    let start = Instant::now();

    let map = rn_xodr::parse_file(&args.input)
        .with_context(|| format!("解析 {} 失败", args.input.display()))?;
    info!(
        roads = map.roads.len(),
        junctions = map.junctions.len(),
        "解析完成 ({:.2?})",
        start.elapsed()
    );

    let opts = BuildOptions {
        tolerances: if args.relaxed {
            BuildTolerances::relaxed()
        } else {
            BuildTolerances::default()
        },
        reproject: !args.planar,
        split_bilateral: args.split,
        area: parse_area(&args.area)?,
        parallel: !args.serial,
    };

    let net = build_network(&map, &opts).context("路网重建失败")?;
    info!(
        roads = net.roads.len(),
        lanes = net.lane_count(),
        links = net.links.len(),
        junctions = net.junctions.len(),
        objects = net.objects.len(),
        "重建完成 ({:.2?})",
        start.elapsed()
    );

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("创建 {} 失败", args.output.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), &net)
        .context("序列化路网失败")?;
    info!("已写出 {}", args.output.display());
    Ok(())
}

/// 解析 "west,south,east,north" 形式的裁剪矩形
fn parse_area(specs: &[String]) -> Result<Option<Vec<Rect>>> {
    if specs.is_empty() {
        return Ok(None);
    }
    let mut rects = Vec::with_capacity(specs.len());
    for spec in specs {
        let parts: Vec<f64> = spec
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("无法解析裁剪矩形: {spec}"))?;
        anyhow::ensure!(parts.len() == 4, "裁剪矩形需要 4 个数值: {spec}");
        rects.push(Rect::from_corners(
            Point2::new(parts[0], parts[1]),
            Point2::new(parts[2], parts[3]),
        ));
    }
    Ok(Some(rects))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_area() {
        let rects = parse_area(&["116.0,39.8,116.5,40.1".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(rects.len(), 1);
        assert!((rects[0].min.x - 116.0).abs() < 1e-12);
        assert!((rects[0].max.y - 40.1).abs() < 1e-12);
    }

    #[test]
    fn test_parse_area_rejects_short_spec() {
        assert!(parse_area(&["1,2,3".to_string()]).is_err());
        assert!(parse_area(&[]).unwrap().is_none());
    }
}
