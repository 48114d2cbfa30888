//! # 单文件重写
//!
//! 读取 → 解析 → 前序遍历 → 打印 → 写回，严格按顺序执行。
//!
//! ## 失败策略
//! - 读取、解析、打印失败：只放弃当前文件，磁盘上的文件保持原样
//! - 访问器返回 `Flow::Abort`：不写回，视为跳过
//! - 写回：先写同目录下的临时文件并 fsync，再原子地替换原文件；
//!   任何一步失败都会删除临时文件，原文件不受影响
//!
//! ## 依赖关系
//! - 被 `batch/package.rs` 调用
//! - 使用 `syntax/`, `walk.rs`
//! - 使用 `tempfile` 完成原子替换

use crate::error::RewriteError;
use crate::syntax::SyntaxEngine;
use crate::walk::{walk, Visitor};

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// 写回方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// 总是用打印结果覆盖原文件
    #[default]
    Overwrite,
    /// 只比较打印结果与原文件，不写盘
    Check,
}

/// 单个文件的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// 已写回；`changed` 表示内容与原文件不同
    Rewritten { changed: bool },
    /// 检查模式下的结果
    Checked { changed: bool },
    /// 访问器中止了遍历，文件未写回
    Aborted,
}

impl FileStatus {
    pub fn changed(&self) -> bool {
        matches!(
            self,
            FileStatus::Rewritten { changed: true } | FileStatus::Checked { changed: true }
        )
    }
}

/// 重写单个文件
pub fn rewrite_file<E, V>(
    path: &Path,
    engine: &E,
    visitor: &V,
    mode: WriteMode,
) -> Result<FileStatus, RewriteError>
where
    E: SyntaxEngine + ?Sized,
    V: Visitor + ?Sized,
{
    let source = fs::read(path).map_err(|e| RewriteError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut tree = engine.parse(&source).map_err(|e| RewriteError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let summary = walk(tree.root_mut(), visitor);
    if summary.aborted {
        debug!(path = %path.display(), visited = summary.visited, "walk aborted, file left untouched");
        return Ok(FileStatus::Aborted);
    }

    let printed = engine.print(&tree).map_err(|e| RewriteError::Print {
        path: path.to_path_buf(),
        source: e,
    })?;
    drop(tree);

    let changed = printed != source;
    let status = match mode {
        WriteMode::Check => FileStatus::Checked { changed },
        WriteMode::Overwrite => {
            write_atomic(path, &printed).map_err(|e| RewriteError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            FileStatus::Rewritten { changed }
        }
    };

    debug!(path = %path.display(), visited = summary.visited, changed, "file processed");
    Ok(status)
}

/// 原子地替换文件内容，并保留原文件权限
///
/// `path` 是符号链接时替换的是链接指向的文件，链接本身保持不变。
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(real) => real,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    // 失败时 PersistError 携带的临时文件随之删除
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
