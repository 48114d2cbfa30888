//! # 包解析模块
//!
//! 把调用方给出的规格字符串展开为零个或多个包（目录 + 源文件列表）。
//!
//! ## 功能
//! - `PackageResolver` 接口，批处理只依赖这个接口
//! - `SearchPathResolver`: 基于显式搜索路径的内置实现
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/` 使用
//! - 子模块: search_path

pub mod search_path;

pub use search_path::SearchPathResolver;

use std::path::PathBuf;
use thiserror::Error;

/// 解析得到的包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// 产生该包的规格字符串
    pub spec: String,
    /// 包所在目录
    pub dir: PathBuf,
    /// 源文件路径（有序）
    pub files: Vec<PathBuf>,
}

/// 规格解析错误
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("empty package specification")]
    EmptySpec,

    #[error("package not found (searched {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("no source files in {}", .dir.display())]
    NoSourceFiles { dir: PathBuf },

    #[error("'...' must stand alone or follow '/' in '{spec}'")]
    MisplacedWildcard { spec: String },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no search roots".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 包解析接口
///
/// 同一文件可以被多个规格解析到，批处理不会去重。
pub trait PackageResolver: Sync {
    fn resolve(&self, spec: &str) -> Result<Vec<ResolvedPackage>, ResolveError>;
}
