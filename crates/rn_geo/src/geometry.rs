// roadnet\crates\rn_geo\src/geometry.rs

//! 基础点类型
//!
//! 提供平面与三维点的最小向量运算集合。
//! 所有运算针对 f64，不做泛型化。

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 归一化的最小长度阈值
const NORMALIZE_EPS: f64 = 1e-14;

/// 平面点 / 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// x 坐标 [m]
    pub x: f64,
    /// y 坐标 [m]
    pub y: f64,
}

impl Point2 {
    /// 原点
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建平面点
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 由方位角构造单位向量
    #[inline]
    pub fn from_angle(theta: f64) -> Self {
        Self {
            x: theta.cos(),
            y: theta.sin(),
        }
    }

    /// 点积
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 向量长度
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 到另一点的距离
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// 到另一点的距离平方
    #[inline]
    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let d = *self - *other;
        d.dot(&d)
    }

    /// 归一化，长度近零时返回 None
    #[must_use]
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < NORMALIZE_EPS {
            None
        } else {
            Some(Self {
                x: self.x / len,
                y: self.y / len,
            })
        }
    }

    /// 绕原点旋转
    #[inline]
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self {
            x: self.x * cos_a - self.y * sin_a,
            y: self.y * cos_a + self.x * sin_a,
        }
    }

    /// 升维，z = 0
    #[inline]
    #[must_use]
    pub const fn with_z(&self, z: f64) -> Point3 {
        Point3 {
            x: self.x,
            y: self.y,
            z,
        }
    }
}

impl Add for Point2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 三维点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// x 坐标（平面东向或经度）
    pub x: f64,
    /// y 坐标（平面北向或纬度）
    pub y: f64,
    /// 高程 [m]
    pub z: f64,
}

impl Point3 {
    /// 原点
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// 创建三维点
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 取平面分量
    #[inline]
    #[must_use]
    pub const fn xy(&self) -> Point2 {
        Point2 {
            x: self.x,
            y: self.y,
        }
    }

    /// 到另一点的三维距离
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// 平面投影距离
    #[inline]
    #[must_use]
    pub fn distance_xy(&self, other: &Self) -> f64 {
        self.xy().distance(&other.xy())
    }

    /// 线性插值
    #[inline]
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2_basic_ops() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.dot(&b) - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_point2_normalize() {
        let v = Point2::new(3.0, 4.0);
        let n = v.normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        // 零向量不可归一化
        assert!(Point2::ZERO.normalize().is_none());
    }

    #[test]
    fn test_point2_rotated() {
        let v = Point2::new(1.0, 0.0);
        let r = v.rotated(std::f64::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_angle() {
        let v = Point2::from_angle(std::f64::consts::PI);
        assert!((v.x + 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn test_point3_lerp() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 4.0, 6.0);
        let m = a.lerp(&b, 0.5);
        assert!((m.x - 1.0).abs() < 1e-12);
        assert!((m.y - 2.0).abs() < 1e-12);
        assert!((m.z - 3.0).abs() < 1e-12);
    }
}
