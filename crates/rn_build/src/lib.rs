// roadnet\crates\rn_build\src/lib.rs

//! RoadNet 重建管线
//!
//! 从解析后的 OpenDRIVE 文档重建离散路网：沿参考线采样车道
//! 几何，生成车道级拓扑连接，可选地裁剪区域、拆分双向道路并
//! 重投影到 WGS84。
//!
//! # 模块概览
//!
//! - [`config`]: 管线选项
//! - [`section_builder`]: 单条道路的车道段重建
//! - [`objects`]: 路侧对象与信号解算
//! - [`linker`]: 车道级拓扑连接与汇入/分流平滑
//! - [`area`]: 区域裁剪
//! - [`bilateral`]: 双向道路拆分
//! - [`reproject`]: 整体重投影
//! - [`pipeline`]: 编排
//!
//! # 示例
//!
//! ```no_run
//! use rn_build::{build_network, BuildOptions};
//!
//! let map = rn_xodr::parse_file("map.xodr")?;
//! let net = build_network(&map, &BuildOptions::default())?;
//! println!("{} roads, {} links", net.roads.len(), net.links.len());
//! # Ok::<(), rn_foundation::RnError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod area;
pub mod bilateral;
pub mod config;
pub mod linker;
pub mod objects;
pub mod pipeline;
pub mod reproject;
pub mod section_builder;

pub use config::BuildOptions;
pub use pipeline::build_network;
pub use section_builder::{build_road, BuiltRoad};

/// Prelude 模块，包含常用入口
pub mod prelude {
    pub use crate::config::BuildOptions;
    pub use crate::pipeline::build_network;
    pub use crate::section_builder::{build_road, BuiltRoad};
}
