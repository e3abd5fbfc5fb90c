// roadnet\crates\rn_geo\src\projection/mod.rs

//! 坐标参考系与投影变换
//!
//! OpenDRIVE 头部以 proj 描述串声明源坐标系，路网重建完成后
//! 整体变换到目标大地坐标系（WGS84 经纬度）。本模块识别常见的
//! 描述串并提供平面↔大地的闭式互转；无法识别的描述串由调用方
//! 回退到默认球面墨卡托串。
//!
//! # 模块
//!
//! - [`web_mercator`]: 球面墨卡托正反算

pub mod web_mercator;

use crate::geometry::Point3;
use rn_foundation::{RnError, RnResult};
use serde::{Deserialize, Serialize};

/// 目标大地坐标系描述串（WGS84 经纬度）
pub const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// 源坐标系不可识别时的默认回退描述串（球面墨卡托）
pub const MERCATOR_FALLBACK: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 \
     +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +wktext +no_defs";

/// 可识别的坐标参考系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpatialRef {
    /// WGS84 经纬度
    LongLat,
    /// 球面（Web）墨卡托平面坐标
    WebMercator,
}

impl SpatialRef {
    /// 解析 proj 描述串
    ///
    /// 识别 `+proj=longlat` / `EPSG:4326` 与 `+proj=merc` /
    /// `EPSG:3857` 两族；其余返回错误，由调用方决定回退。
    pub fn parse(definition: &str) -> RnResult<Self> {
        let def = definition.trim();
        if def.is_empty() {
            return Err(RnError::crs("空的坐标系描述串"));
        }
        if def.contains("+proj=longlat") || def.contains("4326") {
            return Ok(Self::LongLat);
        }
        if def.contains("+proj=merc") || def.contains("3857") || def.contains("900913") {
            return Ok(Self::WebMercator);
        }
        Err(RnError::crs(format!("无法识别的坐标系描述串: {def}")))
    }

    /// 解析失败时回退到球面墨卡托
    #[must_use]
    pub fn parse_or_fallback(definition: &str) -> Self {
        Self::parse(definition).unwrap_or(Self::WebMercator)
    }
}

/// 源→目标坐标变换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// 源坐标系
    pub source: SpatialRef,
    /// 目标坐标系
    pub target: SpatialRef,
}

impl Projection {
    /// 创建变换
    #[inline]
    pub const fn new(source: SpatialRef, target: SpatialRef) -> Self {
        Self { source, target }
    }

    /// 由描述串创建
    pub fn from_definitions(source: &str, target: &str) -> RnResult<Self> {
        Ok(Self {
            source: SpatialRef::parse(source)?,
            target: SpatialRef::parse(target)?,
        })
    }

    /// 源与目标相同，变换为恒等
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// 反向变换
    #[inline]
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    /// 变换单个点，高程不变
    #[must_use]
    pub fn transform(&self, p: Point3) -> Point3 {
        match (self.source, self.target) {
            (SpatialRef::LongLat, SpatialRef::LongLat)
            | (SpatialRef::WebMercator, SpatialRef::WebMercator) => p,
            (SpatialRef::WebMercator, SpatialRef::LongLat) => {
                let (lon, lat) = web_mercator::mercator_to_geographic(p.x, p.y);
                Point3::new(lon, lat, p.z)
            }
            (SpatialRef::LongLat, SpatialRef::WebMercator) => {
                let (x, y) = web_mercator::geographic_to_mercator(p.x, p.y);
                Point3::new(x, y, p.z)
            }
        }
    }

    /// 就地变换一段点序列
    pub fn transform_slice(&self, points: &mut [Point3]) {
        if self.is_identity() {
            return;
        }
        for p in points.iter_mut() {
            *p = self.transform(*p);
        }
    }
}
