// roadnet\crates\rn_xodr\src/lib.rs

//! OpenDRIVE (.xodr) 文档解析
//!
//! 把 OpenDRIVE XML 读成贴近源结构的 [`ast::OdrMap`]，并在原始
//! 记录上提供参考线采样、分段多项式求值、车道链提取等重建管线
//! 需要的求值接口。
//!
//! # 模块概览
//!
//! - [`xml`]: roxmltree 属性读取辅助
//! - [`geometry`]: planView 几何解析
//! - [`ast`]: 文档模型与求值
//! - [`parse`]: 各级元素的解析函数
//!
//! # 示例
//!
//! ```
//! use rn_xodr::parse_str;
//!
//! let xml = r#"<OpenDRIVE>
//!   <header revMajor="1" revMinor="4" name="t"/>
//!   <road id="1" length="50" junction="-1">
//!     <planView>
//!       <geometry s="0" x="0" y="0" hdg="0" length="50"><line/></geometry>
//!     </planView>
//!   </road>
//! </OpenDRIVE>"#;
//! let map = parse_str(xml).unwrap();
//! assert_eq!(map.roads.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod geometry;
pub mod parse;
mod xml;

use std::path::Path;

use rn_foundation::{RnError, RnResult};

pub use ast::{
    OdrConnection, OdrController, OdrJunction, OdrLane, OdrMap, OdrMark, OdrObject, OdrRepeat,
    OdrRoad, OdrRoadLink, OdrSection, Poly3Seg,
};
pub use geometry::GeometryKind;
pub use parse::parse_document;

/// 解析 XML 字符串
pub fn parse_str(content: &str) -> RnResult<OdrMap> {
    let doc = roxmltree::Document::parse(content)
        .map_err(|e| RnError::xml(format!("XML 解析失败: {e}")))?;
    parse_document(&doc)
}

/// 解析 .xodr 文件
pub fn parse_file(path: impl AsRef<Path>) -> RnResult<OdrMap> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RnError::file_not_found(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| RnError::io_with_source(format!("读取 {} 失败", path.display()), e))?;
    parse_str(&content)
}
