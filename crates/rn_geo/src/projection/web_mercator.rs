//! 球面墨卡托正反算
//!
//! 把地球视为半径等于 WGS84 长半轴的正球体，与常见的
//! `+proj=merc +a=6378137 +b=6378137` 描述串语义一致。
//! 高纬度形变较大，但 OpenDRIVE 地图多为城市尺度局部数据，
//! 误差可以接受。

use std::f64::consts::PI;

/// 球面墨卡托使用的地球半径（WGS84 长半轴）[m]
pub const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// 球面墨卡托最大纬度 (度)
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779;

/// 世界范围 [m]，x/y 均为 ±该值
pub const MERCATOR_MAX_EXTENT: f64 = PI * MERCATOR_RADIUS;

/// 地理坐标 -> 球面墨卡托
///
/// 纬度超出有效范围时自动裁剪。
#[must_use]
pub fn geographic_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let x = MERCATOR_RADIUS * lon.to_radians();
    let lat_rad = lat.to_radians();
    let y = MERCATOR_RADIUS * ((PI / 4.0 + lat_rad / 2.0).tan()).ln();
    (x, y)
}

/// 球面墨卡托 -> 地理坐标
#[must_use]
pub fn mercator_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_roundtrip() {
        let lon = 116.0;
        let lat = 40.0;

        let (x, y) = geographic_to_mercator(lon, lat);
        let (lon2, lat2) = mercator_to_geographic(x, y);

        assert!((lon - lon2).abs() < 1e-9);
        assert!((lat - lat2).abs() < 1e-9);
    }

    #[test]
    fn test_mercator_origin() {
        let (x, y) = geographic_to_mercator(0.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_mercator_clamp_latitude() {
        // 超出范围的纬度应被裁剪
        let (_, y1) = geographic_to_mercator(0.0, 90.0);
        let (_, y2) = geographic_to_mercator(0.0, MERCATOR_MAX_LAT);
        assert!((y1 - y2).abs() < 1e-6);
    }

    #[test]
    fn test_mercator_known_values() {
        // 北京约在 116°E, 40°N
        let (x, y) = geographic_to_mercator(116.0, 40.0);
        assert!(x > 12_900_000.0 && x < 12_950_000.0, "x out of range: {x}");
        assert!(y > 4_800_000.0 && y < 4_900_000.0, "y out of range: {y}");
    }

    #[test]
    fn test_mercator_extent() {
        let (x_max, _) = geographic_to_mercator(180.0, 0.0);
        assert!((x_max - MERCATOR_MAX_EXTENT).abs() < 1.0);

        let (_, y_max) = geographic_to_mercator(0.0, MERCATOR_MAX_LAT);
        assert!((y_max - MERCATOR_MAX_EXTENT).abs() < 1.0);
    }
}
