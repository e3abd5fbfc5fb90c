// roadnet\apps\rn_cli\src\commands/mod.rs

//! 子命令实现

pub mod build;
pub mod info;
pub mod validate;
