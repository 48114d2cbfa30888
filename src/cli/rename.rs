//! # rename 子命令 CLI 定义
//!
//! 重命名整段文本匹配正则的符号
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`

use super::common::RewriteArgs;
use clap::Args;

/// rename 子命令参数
#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Regular expression matched against the whole symbol
    #[arg(long)]
    pub from: String,

    /// Replacement text; `$1`, `${name}` refer to capture groups
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub rewrite: RewriteArgs,
}
