//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑：构造访问器并交给批处理引擎。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `resolve/`, `walk.rs`, `utils/`
//! - 子模块: rewrite, fmt, rename, strip, list

pub mod fmt;
pub mod list;
pub mod rename;
pub mod rewrite;
pub mod strip;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Fmt(args) => fmt::execute(args),
        Commands::Rename(args) => rename::execute(args),
        Commands::StripComments(args) => strip::execute(args),
        Commands::List(args) => list::execute(args),
    }
}
