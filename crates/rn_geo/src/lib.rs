// roadnet\crates\rn_geo\src/lib.rs

//! RoadNet 几何层
//!
//! 提供道路参考线重建所需的全部几何原语。
//!
//! # 模块概览
//!
//! - [`geometry`]: 二维/三维点类型与基础向量运算
//! - [`fresnel`]: Fresnel 积分 C(x)/S(x) 的有理/渐近级数实现
//! - [`curve`]: 平面视图曲线族（直线/圆弧/螺旋线/三次多项式/参数三次多项式）
//! - [`curvature`]: 基于三点外接圆的离散曲率拟合
//! - [`polyline`]: 折线容器与矩形裁剪辅助
//! - [`projection`]: 平面坐标与大地坐标的互转
//!
//! # 设计原则
//!
//! 1. **纯函数求值**: 曲线在解析后不可变，`point(s)` / `heading(s)` 只依赖参数
//! 2. **标签分发**: 曲线族用枚举表达，编译器保证匹配完备
//! 3. **退化友好**: 长度近零的元素返回退化结果而不是 panic

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod curvature;
pub mod curve;
pub mod fresnel;
pub mod geometry;
pub mod polyline;
pub mod projection;

// 重导出常用类型
pub use curve::{Curve, CurvePose};
pub use geometry::{Point2, Point3};
pub use polyline::{Polyline, Rect};
pub use projection::{Projection, SpatialRef};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::curve::{Curve, CurvePose};
    pub use crate::geometry::{Point2, Point3};
    pub use crate::polyline::{Polyline, Rect};
    pub use crate::projection::{Projection, SpatialRef};
}
