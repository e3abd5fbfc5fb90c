// crates/rn_geo/src/curvature.rs

//! 离散曲率拟合
//!
//! 对采样点序列取连续三点，用余弦/正弦定理求外接圆半径，
//! 半径倒数即该三点的曲率，最后对全部三点组取平均。
//! 共线或退化的三点组贡献 0。

use crate::geometry::Point2;

/// 三点外接圆曲率的窗口平均
///
/// 采样点少于 3 个时返回 0。
#[must_use]
pub fn fit_curvature(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in points.windows(3) {
        sum += triple_curvature(&w[0], &w[1], &w[2]);
    }
    sum / (points.len() - 2) as f64
}

/// 单个三点组的曲率，退化时为 0
fn triple_curvature(p1: &Point2, p2: &Point2, p3: &Point2) -> f64 {
    // 三点横坐标相同即共线
    if p1.x == p2.x && p2.x == p3.x {
        return 0.0;
    }
    let dis1 = p1.distance(p2);
    let dis2 = p1.distance(p3);
    let dis3 = p2.distance(p3);
    let dis = dis1 * dis1 + dis3 * dis3 - dis2 * dis2;
    if dis1 == 0.0 || dis2 == 0.0 || dis3 == 0.0 || dis == 0.0 {
        return 0.0;
    }
    // 余弦定理求夹角，正弦定理求外接圆半径
    let cos_a = dis / (2.0 * dis1 * dis3);
    if (1.0 - cos_a * cos_a).abs() < 1e-6 || dis2.abs() < 1e-6 {
        return 0.0;
    }
    let sin_a = (1.0 - cos_a * cos_a).sqrt();
    let radius = 0.5 * dis2 / sin_a;
    1.0 / radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear_points_zero() {
        let pts: Vec<Point2> = (0..10).map(|i| Point2::new(i as f64, 0.0)).collect();
        assert!(fit_curvature(&pts).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_collinear_zero() {
        let pts: Vec<Point2> = (0..5).map(|i| Point2::new(1.0, i as f64)).collect();
        assert!(fit_curvature(&pts).abs() < 1e-12);
    }

    #[test]
    fn test_circle_recovers_curvature() {
        // 半径 50 的圆上取密集采样，曲率应接近 0.02
        let r = 50.0;
        let pts: Vec<Point2> = (0..30)
            .map(|i| {
                let theta = i as f64 * 0.02;
                Point2::new(r * theta.cos(), r * theta.sin())
            })
            .collect();
        let k = fit_curvature(&pts);
        assert!((k - 1.0 / r).abs() < 1e-3, "k = {k}");
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(fit_curvature(&[]), 0.0);
        assert_eq!(fit_curvature(&[Point2::ZERO, Point2::new(1.0, 0.0)]), 0.0);
    }
}
