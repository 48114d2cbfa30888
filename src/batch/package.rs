//! # 包处理
//!
//! 对一个已解析的包中的所有文件并行执行单文件重写。
//! 文件之间没有顺序要求，一个文件失败不影响其他文件。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `batch/rewriter.rs`
//! - 使用 `rayon` 并行处理，`indicatif` 汇报进度

use super::errors::ErrorSet;
use super::rewriter::{rewrite_file, FileStatus, WriteMode};
use crate::error::RewriteError;
use crate::resolve::ResolvedPackage;
use crate::syntax::SyntaxEngine;
use crate::walk::Visitor;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// 单个文件处理结果
#[derive(Debug)]
pub enum ProcessResult {
    /// 处理成功（已写回或已检查）
    Success { path: PathBuf, status: FileStatus },
    /// 访问器中止，文件未改动
    Skipped(PathBuf),
    /// 处理失败
    Failed(RewriteError),
}

impl ProcessResult {
    fn from_outcome(path: &std::path::Path, outcome: Result<FileStatus, RewriteError>) -> Self {
        match outcome {
            Ok(FileStatus::Aborted) => ProcessResult::Skipped(path.to_path_buf()),
            Ok(status) => ProcessResult::Success {
                path: path.to_path_buf(),
                status,
            },
            Err(e) => ProcessResult::Failed(e),
        }
    }
}

/// 处理一个包，返回其中所有文件的错误
pub fn process_package<E, V>(pkg: &ResolvedPackage, engine: &E, visitor: &V, mode: WriteMode) -> ErrorSet
where
    E: SyntaxEngine + ?Sized,
    V: Visitor + ?Sized,
{
    rewrite_package(pkg, engine, visitor, mode, &ProgressBar::hidden())
        .into_iter()
        .filter_map(|r| match r {
            ProcessResult::Failed(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// 处理一个包，返回每个文件的结果（与 `pkg.files` 顺序一致）
pub fn rewrite_package<E, V>(
    pkg: &ResolvedPackage,
    engine: &E,
    visitor: &V,
    mode: WriteMode,
    pb: &ProgressBar,
) -> Vec<ProcessResult>
where
    E: SyntaxEngine + ?Sized,
    V: Visitor + ?Sized,
{
    info!(dir = %pkg.dir.display(), files = pkg.files.len(), "processing package");

    pkg.files
        .par_iter()
        .map(|path| {
            let result = ProcessResult::from_outcome(path, rewrite_file(path, engine, visitor, mode));
            pb.inc(1);
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Node, SexpEngine};
    use crate::walk::{each, noop};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_one_bad_file_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..8 {
            let path = dir.path().join(format!("f{}.sexp", i));
            let content = if i == 3 { "(broken" } else { "(ok   file)" };
            fs::write(&path, content).unwrap();
            files.push(path);
        }
        let pkg = ResolvedPackage {
            spec: "pkg".to_string(),
            dir: dir.path().to_path_buf(),
            files: files.clone(),
        };

        let errors = process_package(&pkg, &SexpEngine::default(), &noop(), WriteMode::Overwrite);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().path(), Some(files[3].as_path()));
        for (i, path) in files.iter().enumerate() {
            let content = fs::read_to_string(path).unwrap();
            if i == 3 {
                assert_eq!(content, "(broken");
            } else {
                assert_eq!(content, "(ok file)\n");
            }
        }
    }

    #[test]
    fn test_write_error_collected_while_siblings_succeed() {
        let dir = TempDir::new().unwrap();
        let kept = dir.path().join("kept");
        let gone = dir.path().join("gone");
        fs::create_dir(&kept).unwrap();
        fs::create_dir(&gone).unwrap();
        let ok_file = kept.join("a.sexp");
        let doomed_file = gone.join("b.sexp");
        fs::write(&ok_file, "(stay   here)").unwrap();
        fs::write(&doomed_file, "(vanish)").unwrap();

        let pkg = ResolvedPackage {
            spec: "pkg".to_string(),
            dir: dir.path().to_path_buf(),
            files: vec![ok_file.clone(), doomed_file.clone()],
        };
        let visitor = each(|node: &mut Node| {
            if node.is_symbol("vanish") {
                let _ = fs::remove_dir_all(&gone);
            }
        });

        let errors = process_package(&pkg, &SexpEngine::default(), &visitor, WriteMode::Overwrite);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.count_kind("write"), 1);
        let error = errors.iter().next().unwrap();
        assert!(matches!(error, RewriteError::Write { .. }));
        assert_eq!(error.path(), Some(doomed_file.as_path()));
        assert_eq!(fs::read_to_string(&ok_file).unwrap(), "(stay here)\n");
    }

    #[test]
    fn test_results_follow_file_order() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("{}.sexp", i));
                fs::write(&path, "(x)\n").unwrap();
                path
            })
            .collect();
        let pkg = ResolvedPackage {
            spec: "pkg".to_string(),
            dir: dir.path().to_path_buf(),
            files: files.clone(),
        };

        let results = rewrite_package(
            &pkg,
            &SexpEngine::default(),
            &noop(),
            WriteMode::Check,
            &ProgressBar::hidden(),
        );

        let paths: Vec<PathBuf> = results
            .into_iter()
            .map(|r| match r {
                ProcessResult::Success { path, status } => {
                    assert_eq!(status, FileStatus::Checked { changed: false });
                    path
                }
                other => panic!("unexpected result: {:?}", other),
            })
            .collect();
        assert_eq!(paths, files);
    }
}
