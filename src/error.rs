//! # 统一错误处理模块
//!
//! 定义 refactor 的顶层错误类型，使用 `thiserror` 派生。
//!
//! - `RewriteError`: 批处理中单个任务（规格解析 / 单文件重写）的失败，
//!   汇总进 `ErrorSet`，永远带有归属（规格字符串或文件路径）
//! - `RefactorError`: 命令行层面的错误，决定进程退出码
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 引用 `resolve::ResolveError` 与 `syntax::SyntaxError`

use crate::resolve::ResolveError;
use crate::syntax::SyntaxError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 批处理任务错误（ErrorSet 的元素）
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("cannot resolve '{spec}': {source}")]
    Resolve {
        spec: String,
        #[source]
        source: ResolveError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("cannot print {}: {source}", path.display())]
    Print {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RewriteError {
    /// 出错的文件路径（解析规格失败时为 None）
    pub fn path(&self) -> Option<&Path> {
        match self {
            RewriteError::Resolve { .. } => None,
            RewriteError::Read { path, .. }
            | RewriteError::Parse { path, .. }
            | RewriteError::Print { path, .. }
            | RewriteError::Write { path, .. } => Some(path),
        }
    }

    /// 出错的规格字符串
    pub fn spec(&self) -> Option<&str> {
        match self {
            RewriteError::Resolve { spec, .. } => Some(spec),
            _ => None,
        }
    }

    /// 简短的分类名，用于报告
    pub fn kind(&self) -> &'static str {
        match self {
            RewriteError::Resolve { .. } => "resolve",
            RewriteError::Read { .. } => "read",
            RewriteError::Parse { .. } => "parse",
            RewriteError::Print { .. } => "print",
            RewriteError::Write { .. } => "write",
        }
    }
}

/// 命令行层面的错误类型
#[derive(Error, Debug)]
pub enum RefactorError {
    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 报告输出
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 批处理结果
    // ─────────────────────────────────────────────────────────────
    #[error("{failed} of {total} task(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("{count} file(s) are not in canonical form")]
    CheckFailed { count: usize },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RefactorError>;
