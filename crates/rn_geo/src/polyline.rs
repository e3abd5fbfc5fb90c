// roadnet\crates\rn_geo\src/polyline.rs

//! 折线容器
//!
//! 重建后的车道/边界/连接几何都以三维折线表示。
//! 提供弧长查询、端点访问与反转等拓扑整理所需的操作。

use crate::geometry::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// 三维折线
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point3>,
}

impl Polyline {
    /// 空折线
    #[inline]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// 由点序列构造
    #[inline]
    pub fn from_points(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// 点数
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否为空
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 追加一个点
    #[inline]
    pub fn push(&mut self, p: Point3) {
        self.points.push(p);
    }

    /// 点序列
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// 可变点序列（重投影等就地变换使用）
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point3] {
        &mut self.points
    }

    /// 首点
    #[inline]
    #[must_use]
    pub fn start(&self) -> Option<Point3> {
        self.points.first().copied()
    }

    /// 末点
    #[inline]
    #[must_use]
    pub fn end(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    /// 弦长总和
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// 各点处的累积弧长，首点为 0
    #[must_use]
    pub fn prefix_lengths(&self) -> Vec<f64> {
        let mut acc = Vec::with_capacity(self.points.len());
        let mut sum = 0.0;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                sum += self.points[i - 1].distance(p);
            }
            acc.push(sum);
        }
        acc
    }

    /// 就地反转点序
    #[inline]
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// 反转后的副本
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut pts = self.points.clone();
        pts.reverse();
        Self { points: pts }
    }

    /// 追加另一条折线的全部点
    pub fn extend_from(&mut self, other: &Polyline) {
        self.points.extend_from_slice(other.points());
    }
}

impl FromIterator<Point3> for Polyline {
    fn from_iter<T: IntoIterator<Item = Point3>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// 轴对齐矩形（区域裁剪用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// 西南角
    pub min: Point2,
    /// 东北角
    pub max: Point2,
}

impl Rect {
    /// 由任意两个对角点构造，自动归一化
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 点是否在矩形内（含边界）
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// 点到矩形的距离，点在矩形内返回 0
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> Polyline {
        Polyline::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(6.0, 8.0, 0.0),
        ])
    }

    #[test]
    fn test_length_and_prefix() {
        let pl = sample_line();
        assert!((pl.length() - 10.0).abs() < 1e-12);
        let prefix = pl.prefix_lengths();
        assert_eq!(prefix.len(), 3);
        assert!((prefix[1] - 5.0).abs() < 1e-12);
        assert!((prefix[2] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_swaps_endpoints() {
        let pl = sample_line();
        let rev = pl.reversed();
        assert_eq!(rev.start(), pl.end());
        assert_eq!(rev.end(), pl.start());
        assert!((rev.length() - pl.length()).abs() < 1e-12);
    }

    #[test]
    fn test_rect_from_unordered_corners() {
        let r = Rect::from_corners(Point2::new(5.0, 1.0), Point2::new(-1.0, 4.0));
        assert!(r.contains(&Point2::new(0.0, 2.0)));
        assert!(!r.contains(&Point2::new(6.0, 2.0)));
    }

    #[test]
    fn test_rect_distance() {
        let r = Rect::from_corners(Point2::ZERO, Point2::new(10.0, 10.0));
        assert_eq!(r.distance_to(&Point2::new(5.0, 5.0)), 0.0);
        assert!((r.distance_to(&Point2::new(13.0, 14.0)) - 5.0).abs() < 1e-12);
        assert!((r.distance_to(&Point2::new(-2.0, 5.0)) - 2.0).abs() < 1e-12);
    }
}
