// roadnet\crates\rn_build\src/config.rs

//! 重建管线配置

use rn_foundation::BuildTolerances;
use rn_geo::Rect;
use serde::{Deserialize, Serialize};

/// 重建选项
///
/// 区域裁剪矩形以 WGS84 经纬度给出，管线内部变换到源平面
/// 坐标后再做包含判断。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// 几何容差
    pub tolerances: BuildTolerances,
    /// 重建完成后是否整体变换到 WGS84 经纬度
    pub reproject: bool,
    /// 是否把双向道路拆分为两条单向道路
    pub split_bilateral: bool,
    /// 区域裁剪矩形（经纬度），None 表示整幅地图
    pub area: Option<Vec<Rect>>,
    /// 道路级重建是否并行
    pub parallel: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tolerances: BuildTolerances::default(),
            reproject: true,
            split_bilateral: false,
            area: None,
            parallel: true,
        }
    }
}

impl BuildOptions {
    /// 保持源平面坐标的配置（调试与单元测试用）
    #[must_use]
    pub fn planar() -> Self {
        Self {
            reproject: false,
            parallel: false,
            ..Self::default()
        }
    }
}
