//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。命令行只是批处理引擎的一个前端：
//! 它提供规格列表并构造访问器。
//!
//! ## 命令结构
//! - `fmt`: 只格式化（不做修改的访问器）
//! - `rename`: 按正则重命名符号
//! - `strip-comments`: 删除注释
//! - `list`: 只解析规格并列出包
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, rename, list

pub mod common;
pub mod list;
pub mod rename;

use clap::{ArgAction, Parser, Subcommand};

/// refactor - 批量源文件重写工具
#[derive(Parser)]
#[command(name = "refactor")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch source rewriting for one-off, repo-wide refactors", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite files in canonical form without other changes
    Fmt(common::RewriteArgs),

    /// Rename symbols whose whole text matches a regular expression
    Rename(rename::RenameArgs),

    /// Remove every comment
    StripComments(common::RewriteArgs),

    /// Resolve specifications and list the packages they expand to
    List(list::ListArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fmt_args() {
        let cli = Cli::try_parse_from([
            "refactor", "-vv", "fmt", "core", "./lib/...", "--root", "src:vendor", "--ext",
            "sexp,sx", "-j", "4", "--check", "--width", "100",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Fmt(args) => {
                assert_eq!(args.resolve.specs, vec!["core", "./lib/..."]);
                assert_eq!(args.resolve.roots.len(), 2);
                assert_eq!(args.resolve.extensions, vec!["sexp", "sx"]);
                assert_eq!(args.jobs, 4);
                assert!(args.check);
                assert_eq!(args.width, 100);
                assert_eq!(args.indent, 2);
            }
            _ => panic!("expected fmt"),
        }
    }

    #[test]
    fn test_extensions_default_to_engine() {
        let cli = Cli::try_parse_from(["refactor", "list", "core"]).unwrap();
        match cli.command {
            Commands::List(args) => {
                assert!(args.resolve.extensions.is_empty());
                let resolver = args.resolve.resolver(&crate::syntax::SexpEngine::default());
                assert_eq!(resolver.extensions(), &["sexp".to_string()]);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_specs_are_required() {
        assert!(Cli::try_parse_from(["refactor", "fmt"]).is_err());
    }
}
