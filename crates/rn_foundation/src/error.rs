// roadnet\crates\rn_foundation\src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `RnError` 枚举和 `RnResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，构建阶段的局部错误在各模块内吸收
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **非致命优先**: 单条道路/连接的错误被记录并丢弃实体，只有结构性
//!    失败（根节点/头部缺失）向调用者传播
//!
//! # 示例
//!
//! ```
//! use rn_foundation::error::{RnError, RnResult};
//!
//! fn read_header() -> RnResult<()> {
//!     Err(RnError::structure("缺少 header 节点"))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type RnResult<T> = Result<T, RnError>;

/// RoadNet 错误类型
///
/// 核心错误类型，用于整个项目。构建过程中可吸收的局部错误
/// 不应通过该类型向上传播。
#[derive(Error, Debug)]
pub enum RnError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    // ========================================================================
    // 解析相关错误
    // ========================================================================

    /// XML 文档无法解析
    #[error("XML解析错误: {message}")]
    Xml {
        /// 底层解析器给出的信息
        message: String,
    },

    /// 结构性解析失败（根节点或 header 缺失）
    #[error("文档结构错误: {0}")]
    Structure(String),

    /// 元素缺少必需属性
    #[error("元素 <{element}> 缺少属性: {attribute}")]
    MissingAttribute {
        /// 元素标签名
        element: String,
        /// 缺失的属性名
        attribute: String,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    // ========================================================================
    // 几何与坐标系错误
    // ========================================================================

    /// 退化几何（长度近零、缺边界对等）
    #[error("退化几何: {message}")]
    DegenerateGeometry {
        /// 具体错误信息
        message: String,
    },

    /// 投影错误
    #[error("投影错误: {0}")]
    Projection(String),

    /// 坐标系错误
    #[error("坐标系错误: {0}")]
    Crs(String),

    // ========================================================================
    // 其它
    // ========================================================================

    /// 资源未找到
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源名称
        resource: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl RnError {
    /// 从IO错误创建
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// XML 解析错误
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// 结构性解析失败
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    /// 缺少属性
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 退化几何
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// 投影错误
    pub fn projection(message: impl Into<String>) -> Self {
        Self::Projection(message.into())
    }

    /// 坐标系错误
    pub fn crs(message: impl Into<String>) -> Self {
        Self::Crs(message.into())
    }

    /// 资源未找到
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl RnError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> RnResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> RnResult<()> {
        if value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> RnResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for RnError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// 条件不满足时提前返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// 解包 `Option`，为 `None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr) => {
        match $opt {
            Some(v) => v,
            None => return Err($err),
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RnError::structure("缺少根节点");
        assert!(err.to_string().contains("文档结构错误"));
    }

    #[test]
    fn test_io_error() {
        let err = RnError::io("读取失败");
        assert!(err.to_string().contains("IO错误"));
    }

    #[test]
    fn test_missing_attribute() {
        let err = RnError::missing_attribute("geometry", "hdg");
        assert!(err.to_string().contains("geometry"));
        assert!(err.to_string().contains("hdg"));
    }

    #[test]
    fn test_missing_attribute_borrowed_names() {
        // 标签名通常借自解析中的文档，构造错误时必须能拿走所有权
        let tag = String::from("laneSection");
        let err = RnError::missing_attribute(tag.as_str(), "s");
        drop(tag);
        assert!(err.to_string().contains("laneSection"));
    }

    #[test]
    fn test_check_size() {
        assert!(RnError::check_size("test", 10, 10).is_ok());
        assert!(RnError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(RnError::check_range("value", 5.0, 0.0, 10.0).is_ok());
        assert!(RnError::check_range("value", -1.0, 0.0, 10.0).is_err());
        assert!(RnError::check_range("value", 11.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_check_index() {
        assert!(RnError::check_index("Section", 5, 10).is_ok());
        assert!(RnError::check_index("Section", 10, 10).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let rn_err: RnError = io_err.into();
        assert!(matches!(rn_err, RnError::Io { .. }));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> RnResult<()> {
            ensure!(value > 0, RnError::invalid_input("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> RnResult<i32> {
            let v = require!(opt, RnError::not_found("value"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
