//! # rename 命令实现
//!
//! 把整段文本匹配正则的符号替换为新名字，字符串与注释不受影响。
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 使用 `regex` 匹配符号
//! - 使用 `commands/rewrite.rs` 驱动批处理

use super::rewrite;
use crate::cli::rename::RenameArgs;
use crate::error::{RefactorError, Result};
use crate::syntax::{Node, NodeKind};
use crate::utils::output;
use crate::walk::{each, Each};

use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 符号重命名规则
#[derive(Debug, Clone)]
pub struct Renamer {
    pattern: Regex,
    replacement: String,
}

impl Renamer {
    /// 编译规则，`from` 需要匹配整个符号
    pub fn new(from: &str, to: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{})$", from)).map_err(|e| {
            RefactorError::InvalidRegex {
                pattern: from.to_string(),
                source: e,
            }
        })?;
        Ok(Self {
            pattern,
            replacement: to.to_string(),
        })
    }

    /// 对单个节点应用规则，返回是否发生了替换
    pub fn apply(&self, node: &mut Node) -> bool {
        if node.kind != NodeKind::Symbol || !self.pattern.is_match(&node.text) {
            return false;
        }
        let renamed = self
            .pattern
            .replace(&node.text, self.replacement.as_str())
            .into_owned();
        if renamed == node.text {
            return false;
        }
        node.text = renamed;
        true
    }

    /// 构造访问器，`renamed` 累计替换次数
    pub fn visitor<'a>(&'a self, renamed: &'a AtomicUsize) -> Each<impl Fn(&mut Node) + Sync + 'a> {
        each(move |node: &mut Node| {
            if self.apply(node) {
                renamed.fetch_add(1, Ordering::Relaxed);
            }
        })
    }
}

/// 执行 rename 命令
pub fn execute(args: RenameArgs) -> Result<()> {
    output::print_header(&format!("Renaming '{}' -> '{}'", args.from, args.to));

    let renamer = Renamer::new(&args.from, &args.to)?;
    let renamed = AtomicUsize::new(0);
    let result = rewrite::execute(&args.rewrite, &renamer.visitor(&renamed))?;

    output::print_info(&format!(
        "Renamed {} symbol occurrence(s)",
        renamed.load(Ordering::Relaxed)
    ));
    rewrite::finish(&result, args.rewrite.check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{SexpEngine, SyntaxEngine, SyntaxError};
    use crate::walk::walk;

    #[test]
    fn test_rename_whole_symbols_only() {
        let engine = SexpEngine::default();
        let mut tree = engine
            .parse(b"(get-user id) (get-user-name \"get-user\") ; get-user\n")
            .unwrap();

        let renamer = Renamer::new("get-user", "fetch-user").unwrap();
        let renamed = AtomicUsize::new(0);
        walk(tree.root_mut(), &renamer.visitor(&renamed));

        assert_eq!(renamed.load(Ordering::Relaxed), 1);
        assert_eq!(
            String::from_utf8(engine.print(&tree).unwrap()).unwrap(),
            "(fetch-user id)\n\n(get-user-name \"get-user\")\n\n; get-user\n"
        );
    }

    #[test]
    fn test_rename_with_captures() {
        let renamer = Renamer::new(r"old-(\w+)", "new-$1").unwrap();
        let mut node = Node::symbol("old-thing");
        assert!(renamer.apply(&mut node));
        assert_eq!(node.text, "new-thing");

        let mut number = Node::number("42");
        assert!(!renamer.apply(&mut number));
    }

    #[test]
    fn test_rename_to_numeric_text_fails_to_print() {
        let engine = SexpEngine::default();
        let mut tree = engine.parse(b"(f x)").unwrap();
        let renamer = Renamer::new("x", "42").unwrap();
        let renamed = AtomicUsize::new(0);

        walk(tree.root_mut(), &renamer.visitor(&renamed));

        assert_eq!(renamed.load(Ordering::Relaxed), 1);
        assert!(matches!(engine.print(&tree), Err(SyntaxError::Print(_))));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            Renamer::new("(", "x"),
            Err(RefactorError::InvalidRegex { .. })
        ));
    }
}
