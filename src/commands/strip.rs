//! # strip-comments 命令实现
//!
//! 从每个列表（以及文件根）中删除注释子节点。

use super::rewrite;
use crate::cli::common::RewriteArgs;
use crate::error::Result;
use crate::syntax::{Node, NodeKind};
use crate::utils::output;
use crate::walk::{each, Each};

use std::sync::atomic::{AtomicUsize, Ordering};

/// 删除注释的访问器，`removed` 累计删除数量
pub fn strip_comments(removed: &AtomicUsize) -> Each<impl Fn(&mut Node) + Sync + '_> {
    each(move |node: &mut Node| {
        let before = node.children.len();
        node.children.retain(|c| c.kind != NodeKind::Comment);
        removed.fetch_add(before - node.children.len(), Ordering::Relaxed);
    })
}

/// 执行 strip-comments 命令
pub fn execute(args: RewriteArgs) -> Result<()> {
    output::print_header("Stripping comments");

    let removed = AtomicUsize::new(0);
    let result = rewrite::execute(&args, &strip_comments(&removed))?;

    output::print_info(&format!(
        "Removed {} comment(s)",
        removed.load(Ordering::Relaxed)
    ));
    rewrite::finish(&result, args.check)
}
