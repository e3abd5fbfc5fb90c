// roadnet\crates\rn_geo\src/fresnel.rs

//! Fresnel 积分
//!
//! 计算 C(x) = ∫₀ˣ cos(πt²/2) dt 与 S(x) = ∫₀ˣ sin(πt²/2) dt。
//!
//! 小参数 (x² < 2.5625) 使用有理级数，大参数使用辅助函数 f/g 的
//! 渐近展开，x > 36974 时直接取极限值 0.5。系数来自 Cephes 数学库，
//! 双精度下相对误差约 1e-16。

use std::f64::consts::PI;

/// S(x) 小参数分子
const SN: [f64; 6] = [
    -2.991_819_194_010_198_5E3,
    7.088_400_452_577_386E5,
    -6.297_414_862_058_625E7,
    2.548_908_805_733_763_6E9,
    -4.429_795_180_596_978E10,
    3.180_162_978_765_678_2E11,
];
/// S(x) 小参数分母（首项系数 1 隐含）
const SD: [f64; 6] = [
    2.813_762_688_899_943_2E2,
    4.558_478_108_065_326E4,
    5.173_438_887_700_964E6,
    4.193_202_458_981_112_3E8,
    2.244_117_956_453_409_2E10,
    6.073_663_894_900_846_4E11,
];
/// C(x) 小参数分子
const CN: [f64; 6] = [
    -4.988_431_145_735_735_4E-8,
    9.504_280_628_298_596E-6,
    -6.451_914_356_839_651E-4,
    1.888_433_193_967_038_5E-2,
    -2.055_259_009_550_138_9E-1,
    9.999_999_999_999_999_9E-1,
];
/// C(x) 小参数分母
const CD: [f64; 7] = [
    3.999_829_689_724_959_8E-12,
    9.154_392_157_746_575E-10,
    1.250_018_624_795_988_2E-7,
    1.222_627_890_241_790_3E-5,
    8.680_295_429_417_843E-4,
    4.121_420_907_221_998E-2,
    1.000_000_000_000_000_001E0,
];
/// 辅助函数 f(x) 分子
const FN: [f64; 10] = [
    4.215_435_550_436_775_4E-1,
    1.434_079_197_807_588_8E-1,
    1.152_209_550_735_857_6E-2,
    3.450_179_397_825_740_3E-4,
    4.636_137_492_878_673E-6,
    3.055_689_837_902_576E-8,
    1.023_045_141_649_072_3E-10,
    1.720_107_432_681_618_3E-13,
    1.342_832_762_330_627_6E-16,
    3.763_297_112_699_879E-20,
];
/// 辅助函数 f(x) 分母（首项系数 1 隐含）
const FD: [f64; 10] = [
    7.515_863_983_533_789E-1,
    1.168_889_258_591_913_8E-1,
    6.440_515_265_088_586E-3,
    1.559_344_091_641_530_2E-4,
    1.846_275_673_489_305_4E-6,
    1.126_992_247_639_990_4E-8,
    3.601_400_295_893_713_7E-11,
    5.887_545_336_215_784E-14,
    4.520_014_340_741_297E-17,
    1.254_432_370_900_112_6E-20,
];
/// 辅助函数 g(x) 分子
const GN: [f64; 11] = [
    5.044_420_736_433_832_6E-1,
    1.971_028_335_255_234_1E-1,
    1.876_485_840_925_752_5E-2,
    6.840_793_809_153_931E-4,
    1.151_388_261_118_842_8E-5,
    9.828_524_436_884_222E-8,
    4.453_444_158_617_501_5E-10,
    1.082_680_411_390_208_7E-12,
    1.375_554_606_332_618E-15,
    8.363_544_356_306_774E-19,
    1.869_587_101_627_832_4E-22,
];
/// 辅助函数 g(x) 分母（首项系数 1 隐含）
const GD: [f64; 11] = [
    1.474_957_599_251_283_2E0,
    3.377_489_891_200_199_7E-1,
    2.536_037_414_203_388E-2,
    8.146_791_071_843_062E-4,
    1.275_450_756_677_291_2E-5,
    1.043_145_896_575_719_9E-7,
    4.606_807_281_465_204_3E-10,
    1.102_732_150_662_402_7E-12,
    1.387_965_312_595_788_7E-15,
    8.391_588_162_831_187E-19,
    1.869_587_101_627_832_4E-22,
];

/// 多项式求值（最高次项系数为 coef[0]）
#[inline]
fn polevl(x: f64, coef: &[f64]) -> f64 {
    let mut ans = coef[0];
    for &c in &coef[1..] {
        ans = ans * x + c;
    }
    ans
}

/// 多项式求值，最高次项系数隐含为 1
#[inline]
fn p1evl(x: f64, coef: &[f64]) -> f64 {
    let mut ans = x + coef[0];
    for &c in &coef[1..] {
        ans = ans * x + c;
    }
    ans
}

/// 计算 Fresnel 积分，返回 `(S(x), C(x))`
#[must_use]
pub fn fresnel(xxa: f64) -> (f64, f64) {
    let x = xxa.abs();
    let x2 = x * x;

    let (mut ss, mut cc);
    if x2 < 2.5625 {
        let t = x2 * x2;
        ss = x * x2 * polevl(t, &SN) / p1evl(t, &SD);
        cc = x * polevl(t, &CN) / polevl(t, &CD);
    } else if x > 36974.0 {
        ss = 0.5;
        cc = 0.5;
    } else {
        let t = PI * x2;
        let u = 1.0 / (t * t);
        let t_inv = 1.0 / t;
        let f = 1.0 - u * polevl(u, &FN) / p1evl(u, &FD);
        let g = t_inv * polevl(u, &GN) / p1evl(u, &GD);

        let t = PI * 0.5 * x2;
        let (s, c) = t.sin_cos();
        let t = PI * x;
        cc = 0.5 + (f * s - g * c) / t;
        ss = 0.5 - (f * c + g * s) / t;
    }

    if xxa < 0.0 {
        cc = -cc;
        ss = -ss;
    }
    (ss, cc)
}

/// 标准 Euler 螺旋求值
///
/// 曲率从 0 开始、以 `c_dot` 的速率随弧长线性增长的螺旋，
/// 返回弧长 `s` 处的坐标 `(x, y)` 与切向角 `t`。
/// `c_dot < 0` 时曲线镜像到 y 轴负侧。
#[must_use]
pub fn odr_spiral(s: f64, c_dot: f64) -> (f64, f64, f64) {
    let a = PI.sqrt() / c_dot.abs().sqrt();
    let (ss, cc) = fresnel(s / a);
    let x = cc * a;
    let mut y = ss * a;
    if c_dot < 0.0 {
        y = -y;
    }
    let t = s * s * c_dot * 0.5;
    (x, y, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresnel_zero() {
        let (s, c) = fresnel(0.0);
        assert!(s.abs() < 1e-15);
        assert!(c.abs() < 1e-15);
    }

    #[test]
    fn test_fresnel_known_values() {
        // 参考值来自 Abramowitz & Stegun 表 7.7
        let (s, c) = fresnel(1.0);
        assert!((c - 0.779_893_4).abs() < 1e-6, "C(1) = {c}");
        assert!((s - 0.438_259_1).abs() < 1e-6, "S(1) = {s}");

        let (s, c) = fresnel(2.0);
        assert!((c - 0.488_253_4).abs() < 1e-6, "C(2) = {c}");
        assert!((s - 0.343_415_7).abs() < 1e-6, "S(2) = {s}");
    }

    #[test]
    fn test_fresnel_odd_symmetry() {
        let (sp, cp) = fresnel(1.3);
        let (sn, cn) = fresnel(-1.3);
        assert!((sp + sn).abs() < 1e-15);
        assert!((cp + cn).abs() < 1e-15);
    }

    #[test]
    fn test_fresnel_limit() {
        let (s, c) = fresnel(40000.0);
        assert!((s - 0.5).abs() < 1e-12);
        assert!((c - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_spiral_heading_quadratic() {
        // 切向角 = s²·cDot/2
        let (_, _, t) = odr_spiral(2.0, 0.1);
        assert!((t - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_spiral_mirror() {
        let (x1, y1, _) = odr_spiral(1.5, 0.05);
        let (x2, y2, _) = odr_spiral(1.5, -0.05);
        assert!((x1 - x2).abs() < 1e-12);
        assert!((y1 + y2).abs() < 1e-12);
    }

    #[test]
    fn test_spiral_near_origin_follows_x_axis() {
        // 起点处曲率为零，曲线应贴合 x 轴
        let (x, y, _) = odr_spiral(0.01, 0.1);
        assert!((x - 0.01).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }
}
