//! # 通用参数定义
//!
//! 各重写子命令共享的解析参数与写回参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/rename.rs`, `cli/list.rs` 使用
//! - 参数传递给 `commands/rewrite.rs`

use crate::error::{RefactorError, Result};
use crate::resolve::SearchPathResolver;
use crate::syntax::{PrintConfig, SexpEngine, SyntaxEngine};

use clap::Args;
use std::path::PathBuf;

/// 规格解析参数
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Package specifications: name, ./path, dir/..., glob, or a single file
    #[arg(required = true)]
    pub specs: Vec<String>,

    /// Search roots for package names, in priority order
    #[arg(
        short = 'r',
        long = "root",
        env = "REFACTOR_PATH",
        value_delimiter = ':',
        default_value = "."
    )]
    pub roots: Vec<PathBuf>,

    /// Source file extensions (comma separated; default: the engine's own)
    #[arg(short, long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,
}

impl ResolveArgs {
    /// 构造解析器（以当前目录为基准目录，未指定 `--ext` 时使用引擎的扩展名）
    pub fn resolver<E: SyntaxEngine + ?Sized>(&self, engine: &E) -> SearchPathResolver {
        SearchPathResolver::for_engine(".", engine)
            .with_roots(self.roots.clone())
            .with_extensions(&self.extensions)
    }
}

/// 重写参数
#[derive(Args, Debug, Clone)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Only report files whose canonical form differs; never write
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Write a per-file CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Indentation width in columns
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Indent with tabs instead of spaces
    #[arg(long, default_value_t = false)]
    pub tabs: bool,

    /// Maximum line width for single-line lists
    #[arg(long, default_value_t = 80)]
    pub width: usize,
}

impl RewriteArgs {
    /// 根据格式参数构造语法引擎
    pub fn engine(&self) -> Result<SexpEngine> {
        if self.indent == 0 {
            return Err(RefactorError::InvalidArgument(
                "--indent must be at least 1".to_string(),
            ));
        }
        if self.width == 0 {
            return Err(RefactorError::InvalidArgument(
                "--width must be at least 1".to_string(),
            ));
        }

        Ok(SexpEngine::new(PrintConfig {
            indent_width: self.indent,
            use_tabs: self.tabs,
            max_width: self.width,
        }))
    }
}
