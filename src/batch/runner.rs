//! # 批量执行器
//!
//! 解析全部规格，再对所有包并行执行包处理。
//!
//! ## 功能
//! - 规格按输入顺序依次解析，解析失败只记录错误，不影响其他规格
//! - 基于 rayon 的两级并行（包 × 文件），线程池大小由 `jobs` 决定
//! - 等待所有任务结束后汇总结果与错误
//! - 进度条显示
//!
//! ## 依赖关系
//! - 被 `batch/mod.rs`, `commands/` 调用
//! - 使用 `batch/package.rs`, `utils/progress.rs`
//! - 使用 `rayon` 进行并行计算

use super::errors::ErrorSet;
use super::package::{rewrite_package, ProcessResult};
use super::rewriter::{FileStatus, WriteMode};
use crate::error::RewriteError;
use crate::resolve::{PackageResolver, ResolvedPackage};
use crate::syntax::SyntaxEngine;
use crate::utils::progress;
use crate::walk::Visitor;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// 报告中的一行（每个文件一次尝试，或一个解析失败的规格）
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub spec: String,
    pub path: String,
    pub status: &'static str,
    pub changed: bool,
    pub error: String,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 解析得到的包数量
    pub packages: usize,
    /// 成功数量
    pub success: usize,
    /// 成功且内容发生变化的数量
    pub changed: usize,
    /// 跳过数量（访问器中止）
    pub skipped: usize,
    /// 文件失败数量
    pub failed: usize,
    /// 规格解析失败数量
    pub unresolved: usize,
    /// 全部错误
    pub errors: ErrorSet,
    /// 逐文件记录
    pub records: Vec<FileRecord>,
}

impl BatchResult {
    /// 合并单个文件的处理结果
    pub fn merge(&mut self, spec: &str, result: ProcessResult) {
        match result {
            ProcessResult::Success { path, status } => {
                self.success += 1;
                if status.changed() {
                    self.changed += 1;
                }
                self.records.push(FileRecord {
                    spec: spec.to_string(),
                    path: path.display().to_string(),
                    status: match status {
                        FileStatus::Checked { .. } => "checked",
                        _ => "rewritten",
                    },
                    changed: status.changed(),
                    error: String::new(),
                });
            }
            ProcessResult::Skipped(path) => {
                self.skipped += 1;
                self.records.push(FileRecord {
                    spec: spec.to_string(),
                    path: path.display().to_string(),
                    status: "skipped",
                    changed: false,
                    error: String::new(),
                });
            }
            ProcessResult::Failed(error) => {
                self.failed += 1;
                self.records.push(FileRecord {
                    spec: spec.to_string(),
                    path: error
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    status: error.kind(),
                    changed: false,
                    error: error.to_string(),
                });
                self.errors.push(error);
            }
        }
    }

    /// 记录规格解析失败
    pub fn merge_unresolved(&mut self, error: RewriteError) {
        self.unresolved += 1;
        self.records.push(FileRecord {
            spec: error.spec().unwrap_or_default().to_string(),
            path: String::new(),
            status: error.kind(),
            changed: false,
            error: error.to_string(),
        });
        self.errors.push(error);
    }

    /// 文件处理总数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> ErrorSet {
        self.errors
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    mode: WriteMode,
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器（`jobs == 0` 时使用全部 CPU）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            mode: WriteMode::Overwrite,
            show_progress: false,
        }
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// 是否显示进度条
    pub fn progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 解析规格并重写所有文件，所有任务结束后才返回
    pub fn run<R, E, V, S>(&self, resolver: &R, engine: &E, specs: &[S], visitor: &V) -> BatchResult
    where
        R: PackageResolver + ?Sized,
        E: SyntaxEngine + ?Sized,
        V: Visitor + ?Sized,
        S: AsRef<str>,
    {
        let mut batch_result = BatchResult::default();

        // 解析规格
        let mut packages: Vec<ResolvedPackage> = Vec::new();
        for spec in specs {
            let spec = spec.as_ref();
            match resolver.resolve(spec) {
                Ok(resolved) => packages.extend(resolved),
                Err(source) => {
                    warn!(spec, error = %source, "cannot resolve specification");
                    batch_result.merge_unresolved(RewriteError::Resolve {
                        spec: spec.to_string(),
                        source,
                    });
                }
            }
        }

        let total: usize = packages.iter().map(|p| p.files.len()).sum();
        batch_result.packages = packages.len();
        info!(packages = packages.len(), files = total, jobs = self.jobs, "starting batch");

        let pb = if self.show_progress {
            progress::create_progress_bar(total as u64, "Rewriting")
        } else {
            ProgressBar::hidden()
        };

        let mode = self.mode;
        let process_all = || -> Vec<Vec<ProcessResult>> {
            packages
                .par_iter()
                .map(|pkg| rewrite_package(pkg, engine, visitor, mode, &pb))
                .collect()
        };

        // 配置 rayon 线程池
        let outcomes = match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            Ok(pool) => pool.install(process_all),
            Err(e) => {
                warn!(error = %e, "cannot build thread pool, using the global pool");
                process_all()
            }
        };

        pb.finish_and_clear();

        // 汇总结果
        for (pkg, results) in packages.iter().zip(outcomes) {
            for result in results {
                batch_result.merge(&pkg.spec, result);
            }
        }

        info!(
            success = batch_result.success,
            changed = batch_result.changed,
            skipped = batch_result.skipped,
            failed = batch_result.failed,
            unresolved = batch_result.unresolved,
            "batch finished"
        );
        batch_result
    }
}
