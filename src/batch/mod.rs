//! # 批量处理模块
//!
//! 解析 → 并行重写 → 错误汇总的完整流水线。
//!
//! ## 功能
//! - `run_batch`: 调用方入口，返回全部错误，空集合表示完全成功
//! - `BatchRunner`: 可配置并行度、写回方式与进度条，返回完整统计
//! - `process_package` / `rewrite_file`: 包级与文件级处理
//! - CSV 报告导出
//!
//! ## 依赖关系
//! - 被 `commands/` 和库调用方使用
//! - 使用 `resolve/`, `syntax/`, `walk.rs`
//! - 使用 `rayon` 进行并行处理，`indicatif` 显示进度

pub mod errors;
pub mod package;
pub mod report;
pub mod rewriter;
pub mod runner;

pub use errors::ErrorSet;
pub use package::{process_package, ProcessResult};
pub use rewriter::{rewrite_file, FileStatus, WriteMode};
pub use runner::{BatchResult, BatchRunner, FileRecord};

use crate::resolve::PackageResolver;
use crate::syntax::SyntaxEngine;
use crate::walk::Visitor;

/// 对所有规格执行重写，返回全部错误
///
/// 使用全部 CPU、覆盖写回、不显示进度。任何单个规格或文件的失败都不会
/// 中断其他任务；函数总是在所有任务结束后返回。
pub fn run_batch<R, E, V, S>(resolver: &R, engine: &E, specs: &[S], visitor: &V) -> ErrorSet
where
    R: PackageResolver + ?Sized,
    E: SyntaxEngine + ?Sized,
    V: Visitor + ?Sized,
    S: AsRef<str>,
{
    BatchRunner::new(0)
        .run(resolver, engine, specs, visitor)
        .into_errors()
}
