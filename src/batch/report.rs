//! # 批处理报告导出
//!
//! 把逐文件记录导出为 CSV：`spec, path, status, changed, error`。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `batch/runner.rs` 的 `BatchResult`
//! - 使用 `csv` + `serde` 写入

use super::runner::BatchResult;
use crate::error::{RefactorError, Result};

use std::path::Path;

/// 导出报告为 CSV 格式
pub fn to_csv(result: &BatchResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(RefactorError::CsvError)?;

    for record in &result.records {
        wtr.serialize(record).map_err(RefactorError::CsvError)?;
    }

    wtr.flush().map_err(|e| RefactorError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
