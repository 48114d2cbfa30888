//! # fmt 命令实现
//!
//! 用不做任何修改的访问器跑一遍流水线，把文件统一成规范格式。

use super::rewrite;
use crate::cli::common::RewriteArgs;
use crate::error::Result;
use crate::utils::output;
use crate::walk;

/// 执行 fmt 命令
pub fn execute(args: RewriteArgs) -> Result<()> {
    output::print_header("Formatting");

    let result = rewrite::execute(&args, &walk::noop())?;
    rewrite::finish(&result, args.check)
}
