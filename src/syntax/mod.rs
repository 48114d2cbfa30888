//! # 语法引擎模块
//!
//! 定义语法引擎接口（解析字节为可变语法树、把语法树打印回规范字节），
//! 并提供 S 表达式语言的内置实现 `SexpEngine`。
//!
//! ## 依赖关系
//! - 被 `batch/rewriter.rs`, `walk.rs`, `commands/` 使用
//! - 子模块: tree, parser, printer

pub mod parser;
pub mod printer;
pub mod tree;

pub use printer::PrintConfig;
pub use tree::{Node, NodeKind, Tree};

use thiserror::Error;

/// 语法引擎错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// 源文件不是合法的语法树，行列号从 1 开始
    #[error("{line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// 语法树被修改成了无法序列化的形状
    #[error("{0}")]
    Print(String),
}

/// 语法引擎接口
///
/// 实现必须可以在多个线程间共享：批处理会在每个文件任务中并发调用
/// `parse` 和 `print`。打印配置由引擎自身持有，同一个引擎对同一棵树
/// 总是输出相同的字节。
pub trait SyntaxEngine: Send + Sync {
    /// 源文件扩展名（不含 `.`），解析器据此挑选文件
    fn extensions(&self) -> &[&str];

    fn parse(&self, source: &[u8]) -> Result<Tree, SyntaxError>;

    fn print(&self, tree: &Tree) -> Result<Vec<u8>, SyntaxError>;
}

/// S 表达式语法引擎
#[derive(Debug, Clone, Default)]
pub struct SexpEngine {
    config: PrintConfig,
}

impl SexpEngine {
    pub fn new(config: PrintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }
}

impl SyntaxEngine for SexpEngine {
    fn extensions(&self) -> &[&str] {
        &["sexp"]
    }

    fn parse(&self, source: &[u8]) -> Result<Tree, SyntaxError> {
        parser::parse_source(source)
    }

    fn print(&self, tree: &Tree) -> Result<Vec<u8>, SyntaxError> {
        printer::print_tree(tree, &self.config)
    }
}
