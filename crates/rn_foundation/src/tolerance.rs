// crates/rn_foundation/src/tolerance.rs

//! 几何重建容差配置
//!
//! 车道拼接平滑、端点匹配与区域裁剪使用的阈值集合。
//! 这些值影响几何连续性的视觉效果，不影响拓扑正确性，
//! 因此作为可调参数而非硬编码契约。

use serde::{Deserialize, Serialize};

/// 几何重建容差配置
///
/// 默认值来自对真实地图数据的标定，`relaxed()` 适合粗糙数据源。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTolerances {
    /// 视为退化并入邻段的几何元素长度 [m]
    pub near_zero_len: f64,
    /// 车道段采样范围相对声明边界的内缩量 [m]
    pub section_inset: f64,
    /// 宽度平滑的最大修正距离 [m]
    pub width_fix_distance: f64,
    /// 相邻车道段宽度视为连续的阈值 [m]
    pub width_equal: f64,
    /// 新增/消失车道的宽度匹配阈值 [m]
    pub added_lane_equal: f64,
    /// 汇入/分流处车道几何平滑的最大修正距离 [m]
    pub link_fix_distance: f64,
    /// 端点邻近匹配的距离平方上限 [m²]
    pub endpoint_snap_sq: f64,
    /// 汇入/分流端点归并的距离上限 [m]
    pub link_snap: f64,
    /// 区域裁剪时道路起点到矩形的长度富余 [m]
    pub area_slack: f64,
    /// 曲率拟合采样窗口 [m]
    pub curvature_window: f64,
    /// 采样间隔的最小线性步长 [m]
    pub min_step: f64,
    /// 采样间隔的最小角度步长 [rad]
    pub min_angle: f64,
}

impl Default for BuildTolerances {
    fn default() -> Self {
        Self {
            near_zero_len: 1e-3,
            section_inset: 1e-3,
            width_fix_distance: 10.0,
            width_equal: 1.0,
            added_lane_equal: 0.5,
            link_fix_distance: 20.0,
            endpoint_snap_sq: 1.0,
            link_snap: 0.5,
            area_slack: 30.0,
            curvature_window: 30.0,
            min_step: 1.0,
            min_angle: 0.314159265, // 18°
        }
    }
}

impl BuildTolerances {
    /// 宽松配置：适合几何噪声较大的数据源
    pub fn relaxed() -> Self {
        Self {
            width_equal: 2.0,
            added_lane_equal: 1.0,
            endpoint_snap_sq: 4.0,
            ..Default::default()
        }
    }

    /// 判断几何元素是否退化
    #[inline]
    pub fn is_degenerate_len(&self, len: f64) -> bool {
        len < self.near_zero_len
    }

    /// 判断两个宽度采样是否连续
    #[inline]
    pub fn widths_match(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.width_equal
    }

    /// logistic 过渡权重
    ///
    /// `dis` 为距车道段边界的弧长，`fix_dis` 为修正区间长度。
    /// 返回值在边界处接近 0、在修正区间末端接近 1。
    #[inline]
    pub fn blend_alpha(&self, dis: f64, fix_dis: f64) -> f64 {
        let d = dis * 10.0 / fix_dis - 5.0;
        1.0 / (1.0 + (-d).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let tol = BuildTolerances::default();
        assert!((tol.width_fix_distance - 10.0).abs() < 1e-12);
        assert!((tol.added_lane_equal - 0.5).abs() < 1e-12);
        assert!((tol.area_slack - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_blend_alpha_monotonic() {
        let tol = BuildTolerances::default();
        // 距边界越远，保留原值的权重越大
        let a0 = tol.blend_alpha(0.0, 10.0);
        let a5 = tol.blend_alpha(5.0, 10.0);
        let a10 = tol.blend_alpha(10.0, 10.0);
        assert!(a0 < a5 && a5 < a10);
        assert!((a5 - 0.5).abs() < 1e-12);
        assert!(a0 < 0.01);
        assert!(a10 > 0.99);
    }

    #[test]
    fn test_widths_match() {
        let tol = BuildTolerances::default();
        assert!(tol.widths_match(3.5, 3.6));
        assert!(!tol.widths_match(3.5, 5.0));
    }

    #[test]
    fn test_relaxed_config() {
        let tol = BuildTolerances::relaxed();
        assert!(tol.width_equal > BuildTolerances::default().width_equal);
    }
}
