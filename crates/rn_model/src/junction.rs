// roadnet\crates\rn_model\src/junction.rs

//! 路口与信号控制器

use rn_foundation::ids::{JunctionId, LinkId};
use serde::{Deserialize, Serialize};

/// 信号控制器：路口内受同一相位控制的一组信号
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Controller {
    /// 控制器 id
    pub id: u64,
    /// 名称
    pub name: String,
    /// 受控信号 id 列表
    pub signals: Vec<u64>,
}

/// 路口：一组车道连接加可选的信号控制器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Junction {
    /// 路口 id
    pub id: JunctionId,
    /// 名称
    pub name: String,
    /// 路口内车道连接 id 列表
    pub link_ids: Vec<LinkId>,
    /// 信号控制器
    pub controllers: Vec<Controller>,
}

impl Junction {
    /// 路口是否没有任何连接
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link_ids.is_empty()
    }
}
