// roadnet\crates\rn_xodr\src/xml.rs

//! roxmltree 属性读取辅助
//!
//! OpenDRIVE 数值属性缺失按 0 处理，NaN/∞ 一律清洗为 0；
//! 只有结构性属性（id 等）缺失才报错。

use rn_foundation::{RnError, RnResult};
use roxmltree::Node;

/// 清洗非有限浮点
#[inline]
pub(crate) fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 读浮点属性，缺失或非法为 0
pub(crate) fn attr_f64(node: Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .map(sanitize)
        .unwrap_or(0.0)
}

/// 读浮点属性，缺失时取默认值
pub(crate) fn attr_f64_or(node: Node<'_, '_>, name: &str, default: f64) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .map(sanitize)
        .unwrap_or(default)
}

/// 读无符号整数属性，缺失为 0
pub(crate) fn attr_u64(node: Node<'_, '_>, name: &str) -> u64 {
    node.attribute(name)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// 读有符号整数属性，缺失为 0
pub(crate) fn attr_i64(node: Node<'_, '_>, name: &str) -> i64 {
    node.attribute(name)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}

/// 读字符串属性，缺失为空串
pub(crate) fn attr_string(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or("").to_string()
}

/// 必填浮点属性
pub(crate) fn req_attr_f64(node: Node<'_, '_>, name: &str) -> RnResult<f64> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| RnError::missing_attribute(node.tag_name().name(), name))?;
    raw.parse::<f64>()
        .map(sanitize)
        .map_err(|_| RnError::xml(format!("属性 {name} 不是数值: {raw}")))
}

/// 必填整数属性
pub(crate) fn req_attr_u64(node: Node<'_, '_>, name: &str) -> RnResult<u64> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| RnError::missing_attribute(node.tag_name().name(), name))?;
    raw.parse::<u64>()
        .map_err(|_| RnError::xml(format!("属性 {name} 不是整数: {raw}")))
}

/// 第一个指定名字的子元素
pub(crate) fn child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// 指定名字的全部子元素
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_defaults() {
        let doc = roxmltree::Document::parse(r#"<a x="1.5" bad="nan" n="-3"/>"#).unwrap();
        let node = doc.root_element();
        assert!((attr_f64(node, "x") - 1.5).abs() < 1e-12);
        // NaN 清洗为 0
        assert_eq!(attr_f64(node, "bad"), 0.0);
        assert_eq!(attr_f64(node, "missing"), 0.0);
        assert!((attr_f64_or(node, "missing", 7.0) - 7.0).abs() < 1e-12);
        assert_eq!(attr_i64(node, "n"), -3);
    }

    #[test]
    fn test_req_attr() {
        let doc = roxmltree::Document::parse(r#"<geometry s="0.0"/>"#).unwrap();
        let node = doc.root_element();
        assert!(req_attr_f64(node, "s").is_ok());
        assert!(req_attr_f64(node, "x").is_err());
    }

    #[test]
    fn test_children_by_name() {
        let doc =
            roxmltree::Document::parse(r#"<r><lane id="1"/><mark/><lane id="2"/></r>"#).unwrap();
        let node = doc.root_element();
        assert_eq!(children(node, "lane").count(), 2);
        assert!(child(node, "mark").is_some());
        assert!(child(node, "nope").is_none());
    }
}
