// roadnet\crates\rn_geo\src/curve.rs

//! 平面视图曲线族
//!
//! OpenDRIVE 参考线由五类几何元素顺序拼接而成：直线、圆弧、
//! 螺旋线（曲率随弧长线性变化）、航向对齐局部系下的三次多项式、
//! 以及参数化三次多项式。本模块用带标签的枚举表达这五类曲线，
//! 求值接口按标签分发，编译器保证匹配完备。
//!
//! 所有求值函数接受**绝对弧长**（含元素自身的 `s` 偏移），与
//! 道路级拼接逻辑保持一致；采样间隔则以元素起点为零返回。
//!
//! # 示例
//!
//! ```
//! use rn_geo::curve::{Curve, CurvePose};
//!
//! let line = Curve::line(CurvePose::new(0.0, 0.0, 0.0, 0.0, 100.0));
//! let p = line.point(50.0);
//! assert!((p.x - 50.0).abs() < 1e-12);
//! ```

use crate::curvature::fit_curvature;
use crate::fresnel::odr_spiral;
use crate::geometry::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// 长度低于该值的元素视为退化，求值返回起点
const DEGENERATE_LEN: f64 = 1e-6;
/// 螺旋线曲率变化率低于该值时退化为圆弧
const SPIRAL_FLAT_RATE: f64 = 1e-6;
/// 曲率拟合采样窗口 [m]
const CURVATURE_WINDOW: f64 = 30.0;

/// 几何元素的公共位姿：沿道路的偏移、起点、起始航向与长度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePose {
    /// 元素起点在道路参考线上的弧长偏移 [m]
    pub s: f64,
    /// 起点 x
    pub x: f64,
    /// 起点 y
    pub y: f64,
    /// 起始航向 [rad]
    pub hdg: f64,
    /// 元素长度 [m]，解析时取绝对值
    pub length: f64,
}

impl CurvePose {
    /// 创建位姿
    #[inline]
    pub const fn new(s: f64, x: f64, y: f64, hdg: f64, length: f64) -> Self {
        Self { s, x, y, hdg, length }
    }

    #[inline]
    fn start(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// 平面视图曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// 直线段
    Line {
        /// 公共位姿
        pose: CurvePose,
    },
    /// 等曲率圆弧
    Arc {
        /// 公共位姿
        pose: CurvePose,
        /// 常曲率 [1/m]，正值左转
        curvature: f64,
    },
    /// 螺旋线，曲率在元素内线性变化
    Spiral {
        /// 公共位姿
        pose: CurvePose,
        /// 起点曲率 [1/m]
        curv_start: f64,
        /// 终点曲率 [1/m]
        curv_end: f64,
    },
    /// 局部系三次多项式 v = a + b·u + c·u² + d·u³
    Poly3 {
        /// 公共位姿
        pose: CurvePose,
        /// 常数项
        a: f64,
        /// 一次项
        b: f64,
        /// 二次项
        c: f64,
        /// 三次项
        d: f64,
    },
    /// 参数化三次多项式，u/v 各自对参数 p 为三次式
    ParamPoly3 {
        /// 公共位姿
        pose: CurvePose,
        /// u(p) 系数
        au: f64,
        /// u(p) 一次项
        bu: f64,
        /// u(p) 二次项
        cu: f64,
        /// u(p) 三次项
        du: f64,
        /// v(p) 常数项
        av: f64,
        /// v(p) 一次项
        bv: f64,
        /// v(p) 二次项
        cv: f64,
        /// v(p) 三次项
        dv: f64,
        /// true 时 p ∈ [0,1]，false 时 p 等于弧长
        normalized: bool,
    },
}

impl Curve {
    /// 创建直线段
    #[inline]
    pub const fn line(pose: CurvePose) -> Self {
        Self::Line { pose }
    }

    /// 创建圆弧
    #[inline]
    pub const fn arc(pose: CurvePose, curvature: f64) -> Self {
        Self::Arc { pose, curvature }
    }

    /// 创建螺旋线
    #[inline]
    pub const fn spiral(pose: CurvePose, curv_start: f64, curv_end: f64) -> Self {
        Self::Spiral {
            pose,
            curv_start,
            curv_end,
        }
    }

    /// 公共位姿
    #[inline]
    pub fn pose(&self) -> &CurvePose {
        match self {
            Self::Line { pose }
            | Self::Arc { pose, .. }
            | Self::Spiral { pose, .. }
            | Self::Poly3 { pose, .. }
            | Self::ParamPoly3 { pose, .. } => pose,
        }
    }

    fn pose_mut(&mut self) -> &mut CurvePose {
        match self {
            Self::Line { pose }
            | Self::Arc { pose, .. }
            | Self::Spiral { pose, .. }
            | Self::Poly3 { pose, .. }
            | Self::ParamPoly3 { pose, .. } => pose,
        }
    }

    /// 元素起点弧长偏移
    #[inline]
    pub fn offset(&self) -> f64 {
        self.pose().s
    }

    /// 元素长度
    #[inline]
    pub fn length(&self) -> f64 {
        self.pose().length
    }

    /// 末端弧长偏移
    #[inline]
    pub fn end_offset(&self) -> f64 {
        self.pose().s + self.pose().length
    }

    /// 是否退化（长度近零）
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < DEGENERATE_LEN
    }

    /// 调整弧长偏移（退化元素折叠时使用）
    pub fn set_offset(&mut self, s: f64) {
        self.pose_mut().s = s;
    }

    /// 延长元素（吸收被折叠的退化邻段长度）
    pub fn extend_length(&mut self, extra: f64) {
        self.pose_mut().length += extra;
    }

    // =========================================================================
    // 求值
    // =========================================================================

    /// 绝对弧长 `s` 处的平面坐标
    #[must_use]
    pub fn point(&self, s: f64) -> Point2 {
        let pose = self.pose();
        if self.is_degenerate() {
            return pose.start();
        }
        let dist = s - pose.s;
        match self {
            Self::Line { pose } => along_heading(pose, dist),
            Self::Arc { pose, curvature } => arc_point(pose, dist, *curvature),
            Self::Spiral {
                pose,
                curv_start,
                curv_end,
            } => {
                let curve_dot = (curv_end - curv_start) / pose.length;
                if curve_dot.abs() < SPIRAL_FLAT_RATE {
                    arc_point(pose, dist, *curv_end)
                } else {
                    // 把元素平移到标准螺旋上：s_o 是曲率过零点的弧长
                    let s_o = curv_start / curve_dot;
                    let (x, y, _) = odr_spiral(s_o + dist, curve_dot);
                    let (x_o, y_o, t_o) = odr_spiral(s_o, curve_dot);
                    let local = Point2::new(x - x_o, y - y_o).rotated(pose.hdg - t_o);
                    local + pose.start()
                }
            }
            Self::Poly3 { pose, a, b, c, d } => {
                let u = dist;
                let v = a + b * u + c * u * u + d * u * u * u;
                Point2::new(u, v).rotated(pose.hdg) + pose.start()
            }
            Self::ParamPoly3 {
                pose,
                au,
                bu,
                cu,
                du,
                av,
                bv,
                cv,
                dv,
                normalized,
            } => {
                let p = if *normalized { dist / pose.length } else { dist };
                let u = au + bu * p + cu * p * p + du * p * p * p;
                let v = av + bv * p + cv * p * p + dv * p * p * p;
                Point2::new(u, v).rotated(pose.hdg) + pose.start()
            }
        }
    }

    /// 绝对弧长 `s` 处的航向角 [rad]
    #[must_use]
    pub fn heading(&self, s: f64) -> f64 {
        let pose = self.pose();
        if self.is_degenerate() {
            return pose.hdg;
        }
        let dist = s - pose.s;
        match self {
            Self::Line { pose } => pose.hdg,
            Self::Arc { pose, curvature } => pose.hdg + dist * curvature,
            Self::Spiral {
                pose,
                curv_start,
                curv_end,
            } => {
                let curve_dot = (curv_end - curv_start) / pose.length;
                if curve_dot.abs() < SPIRAL_FLAT_RATE {
                    pose.hdg + dist * curv_end
                } else {
                    let s_o = curv_start / curve_dot;
                    let (_, _, t) = odr_spiral(s_o + dist, curve_dot);
                    let (_, _, t_o) = odr_spiral(s_o, curve_dot);
                    pose.hdg + (t - t_o)
                }
            }
            Self::Poly3 { pose, b, c, d, .. } => {
                // 切向取解析导数 (1, v') 再旋入世界系
                let dv = b + 2.0 * c * dist + 3.0 * d * dist * dist;
                let dir = Point2::new(1.0, dv).rotated(pose.hdg);
                dir.y.atan2(dir.x)
            }
            Self::ParamPoly3 {
                pose,
                bu,
                cu,
                du,
                bv,
                cv,
                dv,
                normalized,
                ..
            } => {
                let p = if *normalized { dist / pose.length } else { dist };
                let u = bu + 2.0 * cu * p + 3.0 * du * p * p;
                let v = bv + 2.0 * cv * p + 3.0 * dv * p * p;
                let dir = Point2::new(u, v).rotated(pose.hdg);
                dir.y.atan2(dir.x)
            }
        }
    }

    /// 绝对弧长 `s` 处的外法向（航向 + π/2 方向的单位向量）
    #[inline]
    #[must_use]
    pub fn normal(&self, s: f64) -> Point2 {
        Point2::from_angle(self.heading(s) + FRAC_PI_2)
    }

    /// 绝对弧长 `s` 处的曲率 [1/m]
    ///
    /// 多项式曲线没有闭式曲率记录，在 30 m 窗口内采样后用
    /// 三点外接圆拟合估计。
    #[must_use]
    pub fn curvature(&self, s: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let dist = s - self.offset();
        match self {
            Self::Line { .. } => 0.0,
            Self::Arc { curvature, .. } => *curvature,
            Self::Spiral {
                pose,
                curv_start,
                curv_end,
            } => curv_start + (curv_end - curv_start) * dist / pose.length,
            Self::Poly3 { .. } | Self::ParamPoly3 { .. } => self.fitted_curvature(dist),
        }
    }

    /// 在包含 `dist` 的 30 m 窗口内拟合曲率
    fn fitted_curvature(&self, dist: f64) -> f64 {
        let len = self.length();
        let window_start = (dist / CURVATURE_WINDOW).floor() * CURVATURE_WINDOW;
        let window_len = CURVATURE_WINDOW.min(len - window_start);
        if window_len <= 0.0 {
            return 0.0;
        }
        let mut samples = Vec::new();
        let mut n = 0.0;
        while n < window_len {
            samples.push(self.point(self.offset() + window_start + n));
            n += 1.0;
        }
        let radius = fit_curvature(&samples);
        if radius < 5e-5 {
            0.0
        } else {
            radius
        }
    }

    // =========================================================================
    // 采样间隔
    // =========================================================================

    /// 自适应采样间隔，以元素起点为零，最后一个值为元素长度
    ///
    /// 曲率越大采样越密，步长由 `min_len`（线性上限）与
    /// `min_angle`（角度上限）共同约束。退化元素返回空表。
    #[must_use]
    pub fn intervals(&self, min_len: f64, min_angle: f64) -> Vec<f64> {
        if self.is_degenerate() {
            return Vec::new();
        }
        let len = self.length();
        match self {
            Self::Line { .. } => uniform_intervals(len, min_len),
            Self::Arc { curvature, .. } => {
                if curvature.abs() < SPIRAL_FLAT_RATE {
                    uniform_intervals(len, min_len)
                } else {
                    curved_intervals(len, *curvature, min_len, min_angle)
                }
            }
            Self::Spiral {
                pose,
                curv_start,
                curv_end,
            } => {
                let curve_dot = (curv_end - curv_start) / pose.length;
                if curve_dot.abs() < SPIRAL_FLAT_RATE {
                    if curv_end.abs() < SPIRAL_FLAT_RATE {
                        uniform_intervals(len, min_len)
                    } else {
                        curved_intervals(len, *curv_end, min_len, min_angle)
                    }
                } else {
                    let s_o = curv_start / curve_dot;
                    let mut intervals = Vec::new();
                    let mut dt = (curve_dot * s_o).abs().max(1e-4);
                    let mut s = 0.0;
                    while s < len {
                        intervals.push(s);
                        s += min_len.min((min_angle / dt).abs());
                        dt = (curve_dot * (s_o + s)).abs().max(1e-4);
                    }
                    intervals.push(len);
                    intervals
                }
            }
            Self::Poly3 { c, d, .. } => {
                let mut intervals = Vec::new();
                let mut dt = 1e-4;
                let mut s = 0.0;
                while s < len {
                    intervals.push(s);
                    s += min_len.min(min_angle / dt);
                    dt = (2.0 * c + 6.0 * d * s).abs().atan().max(1e-4);
                }
                intervals.push(len);
                intervals
            }
            Self::ParamPoly3 {
                pose,
                bu,
                cu,
                du,
                bv,
                cv,
                dv,
                normalized,
                ..
            } => {
                let mut intervals = Vec::new();
                let mut dt = 1e-4;
                let mut s = 0.0;
                while s < len {
                    intervals.push(s);
                    s += min_len.min(min_angle / dt);
                    let p = if *normalized { s / pose.length } else { s };
                    let du_ = bu + 2.0 * cu * p + 3.0 * du * p * p;
                    let dv_ = bv + 2.0 * cv * p + 3.0 * dv * p * p;
                    let duu = (2.0 * cu + 6.0 * du * p).abs();
                    let dvv = (2.0 * cv + 6.0 * dv * p).abs();
                    // 二阶导数主导的局部曲率估计
                    let k = if du_.abs() < 1e-8 {
                        1e8
                    } else {
                        (dvv * dvv * du_ - dv_ * duu * duu) / (du_ * du_ * du_)
                    };
                    dt = k.abs().atan().max(1e-4);
                }
                intervals.push(len);
                intervals
            }
        }
    }
}

/// 沿起始航向的直线推进
#[inline]
fn along_heading(pose: &CurvePose, dist: f64) -> Point2 {
    Point2::new(
        pose.x + dist * pose.hdg.cos(),
        pose.y + dist * pose.hdg.sin(),
    )
}

/// 圆弧闭式求值：圆心在起点法向 1/|κ| 处
fn arc_point(pose: &CurvePose, dist: f64, curvature: f64) -> Point2 {
    if curvature.abs() < SPIRAL_FLAT_RATE {
        return along_heading(pose, dist);
    }
    let r = 1.0 / curvature.abs();
    let tag = if curvature > 0.0 { 1.0 } else { -1.0 };
    let hdg = pose.hdg + tag * FRAC_PI_2;
    let center = Point2::new(r * hdg.cos(), r * hdg.sin());
    let alpha = hdg + PI + dist * curvature;
    Point2::new(
        center.x + r * alpha.cos() + pose.x,
        center.y + r * alpha.sin() + pose.y,
    )
}

/// 等步长采样
fn uniform_intervals(len: f64, min_len: f64) -> Vec<f64> {
    let sp = (len / min_len).ceil() as usize;
    let itv = len / sp as f64;
    (0..=sp).map(|i| itv * i as f64).collect()
}

/// 按最小角度步采样的等曲率区间
fn curved_intervals(len: f64, curvature: f64, min_len: f64, min_angle: f64) -> Vec<f64> {
    let a = (min_angle / (curvature.abs() * PI)).min(min_len);
    let step = (a / len).min(1.0);
    let mut intervals = Vec::new();
    let mut p = 0.0;
    while p < 1.001 {
        intervals.push(p * len);
        p += step;
    }
    intervals
}
