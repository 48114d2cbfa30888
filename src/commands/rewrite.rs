//! # 重写命令公共流程
//!
//! 所有重写类子命令共用：解析参数 → 批处理 → 输出错误与统计 → 可选 CSV 报告。
//!
//! ## 依赖关系
//! - 被 `commands/fmt.rs`, `commands/rename.rs`, `commands/strip.rs` 调用
//! - 使用 `cli/common.rs` 定义的参数
//! - 使用 `batch/`, `utils/output.rs`, `utils/progress.rs`

use crate::batch::{report, BatchResult, BatchRunner, WriteMode};
use crate::cli::common::RewriteArgs;
use crate::error::{RefactorError, Result};
use crate::utils::{output, progress};
use crate::walk::Visitor;

/// 执行一次批量重写
pub fn execute<V: Visitor + ?Sized>(args: &RewriteArgs, visitor: &V) -> Result<BatchResult> {
    let engine = args.engine()?;
    let resolver = args.resolve.resolver(&engine);
    let mode = if args.check {
        WriteMode::Check
    } else {
        WriteMode::Overwrite
    };

    let runner = BatchRunner::new(args.jobs)
        .mode(mode)
        .progress(progress::is_interactive());

    output::print_info(&format!(
        "Processing {} specification(s) with {} job(s)",
        args.resolve.specs.len(),
        runner.jobs()
    ));

    let result = runner.run(&resolver, &engine, &args.resolve.specs, visitor);

    for error in &result.errors {
        output::print_error(&error.to_string());
    }
    for record in &result.records {
        match record.status {
            "skipped" => output::print_skip(&record.path),
            "checked" if record.changed => output::print_changed(&record.path),
            _ => {}
        }
    }

    // 保存 CSV 报告
    if let Some(ref path) = args.report {
        report::to_csv(&result, path)?;
        output::print_success(&format!("Report saved to '{}'", path.display()));
    }

    Ok(result)
}

/// 把批处理结果转换为退出状态，并打印汇总
pub fn finish(result: &BatchResult, check: bool) -> Result<()> {
    let verb = if check { "Checked" } else { "Rewrote" };
    output::print_done(&format!(
        "{} {} file(s) in {} package(s): {} changed, {} skipped, {} failed",
        verb,
        result.success,
        result.packages,
        result.changed,
        result.skipped,
        result.failed + result.unresolved
    ));

    if !result.is_success() {
        return Err(RefactorError::BatchFailed {
            failed: result.errors.len(),
            total: result.total() + result.unresolved,
        });
    }
    if check && result.changed > 0 {
        return Err(RefactorError::CheckFailed {
            count: result.changed,
        });
    }
    Ok(())
}
