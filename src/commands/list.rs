//! # list 命令实现
//!
//! 只解析规格，用表格列出得到的包；解析失败的规格逐条报告。
//!
//! ## 依赖关系
//! - 使用 `cli/list.rs` 定义的参数
//! - 使用 `resolve/`, `utils/output.rs`
//! - 使用 `tabled` 输出表格

use crate::cli::list::ListArgs;
use crate::error::{RefactorError, Result};
use crate::resolve::{PackageResolver, ResolvedPackage};
use crate::syntax::SexpEngine;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 表格中的一行
#[derive(Debug, Clone, Tabled)]
struct PackageRow {
    #[tabled(rename = "Spec")]
    spec: String,
    #[tabled(rename = "Directory")]
    dir: String,
    #[tabled(rename = "Files")]
    files: usize,
}

/// 执行 list 命令
pub fn execute(args: ListArgs) -> Result<()> {
    output::print_header("Resolving packages");

    let resolver = args.resolve.resolver(&SexpEngine::default());
    let mut packages: Vec<ResolvedPackage> = Vec::new();
    let mut failed = 0;

    for spec in &args.resolve.specs {
        match resolver.resolve(spec) {
            Ok(resolved) => {
                if resolved.is_empty() {
                    output::print_warning(&format!("'{}' matched no packages", spec));
                }
                packages.extend(resolved);
            }
            Err(e) => {
                failed += 1;
                output::print_error(&format!("cannot resolve '{}': {}", spec, e));
            }
        }
    }

    if !packages.is_empty() {
        let rows: Vec<PackageRow> = packages
            .iter()
            .map(|p| PackageRow {
                spec: p.spec.clone(),
                dir: p.dir.display().to_string(),
                files: p.files.len(),
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    if args.files {
        for pkg in &packages {
            for file in &pkg.files {
                println!("{}", file.display());
            }
        }
    }

    let total_files: usize = packages.iter().map(|p| p.files.len()).sum();
    output::print_done(&format!(
        "{} package(s), {} file(s)",
        packages.len(),
        total_files
    ));

    if failed > 0 {
        return Err(RefactorError::BatchFailed {
            failed,
            total: args.resolve.specs.len(),
        });
    }
    Ok(())
}
