// roadnet\crates\rn_model\src/header.rs

//! 地图头部记录
//!
//! 对应 OpenDRIVE `<header>` 元素，保存版本、范围框与源坐标系
//! 描述串。范围框在重建过程中可能被重新计算（取实际几何包络）。

use serde::{Deserialize, Serialize};

/// 地图头部
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    /// 主版本号
    pub rev_major: u32,
    /// 次版本号
    pub rev_minor: u32,
    /// 地图名称
    pub name: String,
    /// 数据版本
    pub version: String,
    /// 生成日期（原样保留）
    pub date: String,
    /// 北边界
    pub north: f64,
    /// 南边界
    pub south: f64,
    /// 东边界
    pub east: f64,
    /// 西边界
    pub west: f64,
    /// 供应商标识
    pub vendor: String,
    /// 源坐标系 proj 描述串
    pub geo_reference: String,
}

impl Header {
    /// 头部是否声明了任何范围框
    #[inline]
    #[must_use]
    pub fn has_extent(&self) -> bool {
        self.north != 0.0 || self.south != 0.0 || self.east != 0.0 || self.west != 0.0
    }
}
