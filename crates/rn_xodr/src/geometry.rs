// roadnet\crates\rn_xodr\src/geometry.rs

//! planView 几何解析
//!
//! `<geometry>` 的具体形状由唯一的子元素决定。先把子元素名收敛
//! 成 [`GeometryKind`]，再按枚举分派到对应构造，未知形状直接
//! 报结构错误而不是悄悄跳过。

use rn_foundation::{BuildTolerances, RnError, RnResult};
use rn_geo::{Curve, CurvePose};
use roxmltree::Node;

use crate::xml::{attr_f64, attr_string, children, req_attr_f64};

/// planView 支持的几何形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// 直线
    Line,
    /// 圆弧
    Arc,
    /// 回旋线
    Spiral,
    /// 三次多项式
    Poly3,
    /// 参数化三次多项式
    ParamPoly3,
}

impl GeometryKind {
    /// 由子元素标签名识别形状
    pub fn from_tag(tag: &str) -> RnResult<Self> {
        match tag {
            "line" => Ok(Self::Line),
            "arc" => Ok(Self::Arc),
            "spiral" => Ok(Self::Spiral),
            "poly3" => Ok(Self::Poly3),
            "paramPoly3" => Ok(Self::ParamPoly3),
            other => Err(RnError::structure(format!("未知几何形状: {other}"))),
        }
    }

    /// 按形状构造曲线
    fn build(self, pose: CurvePose, shape: Node<'_, '_>) -> Curve {
        match self {
            Self::Line => Curve::line(pose),
            Self::Arc => Curve::arc(pose, attr_f64(shape, "curvature")),
            Self::Spiral => Curve::spiral(
                pose,
                attr_f64(shape, "curvStart"),
                attr_f64(shape, "curvEnd"),
            ),
            Self::Poly3 => Curve::Poly3 {
                pose,
                a: attr_f64(shape, "a"),
                b: attr_f64(shape, "b"),
                c: attr_f64(shape, "c"),
                d: attr_f64(shape, "d"),
            },
            Self::ParamPoly3 => Curve::ParamPoly3 {
                pose,
                au: attr_f64(shape, "aU"),
                bu: attr_f64(shape, "bU"),
                cu: attr_f64(shape, "cU"),
                du: attr_f64(shape, "dU"),
                av: attr_f64(shape, "aV"),
                bv: attr_f64(shape, "bV"),
                cv: attr_f64(shape, "cV"),
                dv: attr_f64(shape, "dV"),
                // pRange 缺省按归一化处理
                normalized: attr_string(shape, "pRange") != "arcLength",
            },
        }
    }
}

/// 解析单个 `<geometry>` 元素
pub fn parse_geometry(node: Node<'_, '_>) -> RnResult<Curve> {
    let pose = CurvePose {
        s: req_attr_f64(node, "s")?,
        x: req_attr_f64(node, "x")?,
        y: req_attr_f64(node, "y")?,
        hdg: req_attr_f64(node, "hdg")?,
        length: req_attr_f64(node, "length")?,
    };
    let shape = node
        .children()
        .find(|c| c.is_element())
        .ok_or_else(|| RnError::structure("geometry 元素缺少形状子元素"))?;
    let kind = GeometryKind::from_tag(shape.tag_name().name())?;
    Ok(kind.build(pose, shape))
}

/// 解析整个 `<planView>`，几何按里程排序
pub fn parse_plan_view(node: Node<'_, '_>) -> RnResult<Vec<Curve>> {
    let mut curves = Vec::new();
    for geom in children(node, "geometry") {
        curves.push(parse_geometry(geom)?);
    }
    curves.sort_by(|a, b| a.offset().total_cmp(&b.offset()));
    Ok(curves)
}

/// 折叠近零长度的几何元素
///
/// 退化元素删除后其弧长并入前一元素；打头的退化元素由后继元素
/// 把里程起点前移接管。只剩一个元素时不折叠，弧长覆盖保持连续。
pub fn fold_degenerate(curves: &mut Vec<Curve>, tol: &BuildTolerances) {
    let mut i = 0;
    while i < curves.len() {
        if curves.len() > 1 && tol.is_degenerate_len(curves[i].length()) {
            let offset = curves[i].offset();
            let length = curves[i].length();
            curves.remove(i);
            if i > 0 {
                curves[i - 1].extend_length(length);
            } else {
                curves[i].set_offset(offset);
                curves[i].extend_length(length);
            }
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(xml: &str) -> RnResult<Curve> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        parse_geometry(doc.root_element())
    }

    #[test]
    fn test_parse_line() {
        let c = parse_one(r#"<geometry s="0" x="1" y="2" hdg="0.5" length="10"><line/></geometry>"#)
            .unwrap();
        assert!(matches!(c, Curve::Line { .. }));
        assert!((c.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_arc() {
        let c = parse_one(
            r#"<geometry s="0" x="0" y="0" hdg="0" length="10"><arc curvature="0.01"/></geometry>"#,
        )
        .unwrap();
        match c {
            Curve::Arc { curvature, .. } => assert!((curvature - 0.01).abs() < 1e-12),
            _ => panic!("期望 Arc"),
        }
    }

    #[test]
    fn test_parse_spiral() {
        let c = parse_one(
            r#"<geometry s="5" x="0" y="0" hdg="0" length="20">
                 <spiral curvStart="0.0" curvEnd="0.02"/></geometry>"#,
        )
        .unwrap();
        match c {
            Curve::Spiral {
                curv_start,
                curv_end,
                ..
            } => {
                assert_eq!(curv_start, 0.0);
                assert!((curv_end - 0.02).abs() < 1e-12);
            }
            _ => panic!("期望 Spiral"),
        }
    }

    #[test]
    fn test_parse_param_poly3_p_range() {
        let c = parse_one(
            r#"<geometry s="0" x="0" y="0" hdg="0" length="30">
                 <paramPoly3 aU="0" bU="1" cU="0" dU="0" aV="0" bV="0" cV="0.001" dV="0"
                             pRange="arcLength"/></geometry>"#,
        )
        .unwrap();
        match c {
            Curve::ParamPoly3 { normalized, bu, .. } => {
                assert!(!normalized);
                assert!((bu - 1.0).abs() < 1e-12);
            }
            _ => panic!("期望 ParamPoly3"),
        }
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let res =
            parse_one(r#"<geometry s="0" x="0" y="0" hdg="0" length="1"><bezier/></geometry>"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_pose_attr_rejected() {
        let res = parse_one(r#"<geometry s="0" y="0" hdg="0" length="1"><line/></geometry>"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_fold_degenerate_mid_element() {
        let tol = BuildTolerances::default();
        let mut curves = vec![
            Curve::line(CurvePose::new(0.0, 0.0, 0.0, 0.0, 50.0)),
            Curve::line(CurvePose::new(50.0, 50.0, 0.0, 0.0, 5e-4)),
            Curve::line(CurvePose::new(50.0005, 50.0005, 0.0, 0.0, 50.0)),
        ];
        fold_degenerate(&mut curves, &tol);
        assert_eq!(curves.len(), 2);
        // 退化段的弧长并入前一元素，覆盖无缝
        assert!((curves[0].length() - 50.0005).abs() < 1e-12);
        assert!((curves[0].end_offset() - curves[1].offset()).abs() < 1e-12);
    }

    #[test]
    fn test_fold_degenerate_leading_element() {
        let tol = BuildTolerances::default();
        let mut curves = vec![
            Curve::line(CurvePose::new(0.0, 0.0, 0.0, 0.0, 5e-4)),
            Curve::line(CurvePose::new(5e-4, 5e-4, 0.0, 0.0, 50.0)),
        ];
        fold_degenerate(&mut curves, &tol);
        assert_eq!(curves.len(), 1);
        // 后继元素把里程起点接管到 0
        assert!(curves[0].offset().abs() < 1e-12);
        assert!((curves[0].length() - 50.0005).abs() < 1e-12);
    }

    #[test]
    fn test_fold_degenerate_keeps_sole_element() {
        let tol = BuildTolerances::default();
        let mut curves = vec![Curve::line(CurvePose::new(0.0, 0.0, 0.0, 0.0, 1e-4))];
        fold_degenerate(&mut curves, &tol);
        assert_eq!(curves.len(), 1);
    }

    #[test]
    fn test_plan_view_sorted() {
        let doc = roxmltree::Document::parse(
            r#"<planView>
                 <geometry s="10" x="10" y="0" hdg="0" length="5"><line/></geometry>
                 <geometry s="0" x="0" y="0" hdg="0" length="10"><line/></geometry>
               </planView>"#,
        )
        .unwrap();
        let curves = parse_plan_view(doc.root_element()).unwrap();
        assert_eq!(curves.len(), 2);
        assert!(curves[0].offset() < curves[1].offset());
    }
}
