// roadnet\apps\rn_cli\src\commands\validate.rs

//! 地图校验命令
//!
//! 检查地图可解析性与常见结构问题，不执行重建。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 校验参数
#[derive(Args)]
pub struct ValidateArgs {
    /// OpenDRIVE (.xodr) 文件路径
    pub input: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 校验结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行校验命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== RoadNet 地图校验 ===");

    let map = rn_xodr::parse_file(&args.input)
        .with_context(|| format!("解析 {} 失败", args.input.display()))?;

    let mut result = ValidationResult::default();
    check_roads(&map, &mut result);
    check_junctions(&map, &mut result);

    for msg in &result.warnings {
        warn!("{msg}");
    }
    for msg in &result.errors {
        error!("{msg}");
    }
    if !result.is_ok(args.strict) {
        bail!(
            "校验未通过: {} 个错误, {} 个警告",
            result.errors.len(),
            result.warnings.len()
        );
    }
    info!(
        "校验通过: {} 条道路, {} 个警告",
        map.roads.len(),
        result.warnings.len()
    );
    Ok(())
}

fn check_roads(map: &rn_xodr::OdrMap, result: &mut ValidationResult) {
    for road in &map.roads {
        if road.length <= 0.0 {
            result.add_error(format!("道路 {} 参考线长度非正", road.id));
        }
        let geom_len: f64 = road.geometry.iter().map(|g| g.length()).sum();
        if (geom_len - road.length).abs() > 1.0 {
            result.add_warning(format!(
                "道路 {} 几何总长 {:.2} 与声明长度 {:.2} 不符",
                road.id, geom_len, road.length
            ));
        }
        for (i, sec) in road.sections.iter().enumerate() {
            if sec.lanes.is_empty() {
                result.add_warning(format!("道路 {} 第 {} 段没有车道", road.id, i));
            }
        }
        // 前驱/后继指向的道路或路口必须存在
        for link in [road.predecessor, road.successor].into_iter().flatten() {
            let found = if link.is_junction {
                map.junctions.iter().any(|j| j.id == link.id)
            } else {
                map.road(link.id).is_some()
            };
            if !found {
                result.add_error(format!(
                    "道路 {} 引用了不存在的{} {}",
                    road.id,
                    if link.is_junction { "路口" } else { "道路" },
                    link.id
                ));
            }
        }
    }
}

fn check_junctions(map: &rn_xodr::OdrMap, result: &mut ValidationResult) {
    for junction in &map.junctions {
        if junction.connections.is_empty() {
            result.add_warning(format!("路口 {} 没有连接记录", junction.id));
        }
        for conn in &junction.connections {
            if map.road(conn.connecting_road).is_none() {
                result.add_error(format!(
                    "路口 {} 连接 {} 引用了不存在的连接道路 {}",
                    junction.id, conn.id, conn.connecting_road
                ));
            }
            if map.road(conn.incoming_road).is_none() {
                result.add_error(format!(
                    "路口 {} 连接 {} 引用了不存在的来路 {}",
                    junction.id, conn.id, conn.incoming_road
                ));
            }
        }
    }
}
