//! # list 子命令 CLI 定义
//!
//! 只解析规格，不读写任何源文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/list.rs`

use super::common::ResolveArgs;
use clap::Args;

/// list 子命令参数
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Also print every file of each package
    #[arg(long, default_value_t = false)]
    pub files: bool,
}
