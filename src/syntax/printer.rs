//! # 规范格式打印器
//!
//! 把（可能已被修改的）`Tree` 序列化为规范格式。输出只取决于树本身
//! 和 `PrintConfig`，并且 `parse(print(t)) == t`，因此打印是幂等的。
//!
//! ## 规则
//! - 顶层条目各占一行，条目之间空一行（注释后紧跟的条目除外）
//! - 不含注释且能在行宽内放下的列表打印为单行
//! - 否则折行：`(` + 首个子节点，其余子节点每个一行、缩进加一级
//! - 列表以注释结尾时，`)` 单独成行
//!
//! ## 依赖关系
//! - 被 `syntax/mod.rs` 使用
//! - 使用 `syntax/tree.rs`, `syntax/parser.rs`（原子字符规则）

use super::parser::{classify_atom, is_delimiter};
use super::tree::{Node, NodeKind, Tree};
use super::SyntaxError;

/// 打印格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    /// 每级缩进宽度（列数）
    pub indent_width: usize,
    /// 用制表符缩进（每级一个 `\t`）而不是空格
    pub use_tabs: bool,
    /// 单行列表的最大行宽
    pub max_width: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            indent_width: 2,
            use_tabs: false,
            max_width: 80,
        }
    }
}

impl PrintConfig {
    fn indent(&self, depth: usize) -> String {
        if self.use_tabs {
            "\t".repeat(depth)
        } else {
            " ".repeat(depth * self.indent_width)
        }
    }
}

/// 打印整棵树
pub fn print_tree(tree: &Tree, config: &PrintConfig) -> Result<Vec<u8>, SyntaxError> {
    let root = tree.root();
    if root.kind != NodeKind::File {
        return Err(SyntaxError::Print(format!(
            "root must be a file node, found {}",
            root.kind
        )));
    }
    for item in &root.children {
        validate(item)?;
    }

    let mut out = String::new();
    for (i, item) in root.children.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            if root.children[i - 1].kind != NodeKind::Comment {
                out.push('\n');
            }
        }
        print_node(item, 0, 0, config, &mut out);
    }
    if !root.children.is_empty() {
        out.push('\n');
    }

    Ok(out.into_bytes())
}

/// 检查子树能否被无损序列化
fn validate(node: &Node) -> Result<(), SyntaxError> {
    if node.kind.is_leaf() && !node.children.is_empty() {
        return Err(SyntaxError::Print(format!(
            "{} node {:?} cannot have children",
            node.kind, node.text
        )));
    }

    match node.kind {
        NodeKind::File => {
            return Err(SyntaxError::Print(
                "file node nested inside the tree".to_string(),
            ))
        }
        NodeKind::List => {}
        NodeKind::Symbol | NodeKind::Number => {
            if node.text.is_empty() || node.text.chars().any(is_delimiter) {
                return Err(SyntaxError::Print(format!(
                    "invalid {} text {:?}",
                    node.kind, node.text
                )));
            }
            // 重新解析时会被归为另一种原子
            if classify_atom(&node.text) != node.kind {
                return Err(SyntaxError::Print(format!(
                    "{} node {:?} would be read back as {}",
                    node.kind,
                    node.text,
                    classify_atom(&node.text)
                )));
            }
        }
        NodeKind::Str => {
            if !is_valid_string_body(&node.text) {
                return Err(SyntaxError::Print(format!(
                    "invalid string body {:?}",
                    node.text
                )));
            }
        }
        NodeKind::Comment => {
            if !node.text.starts_with(';') || node.text.contains('\n') {
                return Err(SyntaxError::Print(format!(
                    "invalid comment {:?}",
                    node.text
                )));
            }
        }
    }

    node.children.iter().try_for_each(validate)
}

/// 字符串内容中不能有未转义的 `"`，也不能以单独的 `\` 结尾
fn is_valid_string_body(body: &str) -> bool {
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            '"' => return false,
            _ => {}
        }
    }
    true
}

fn print_node(node: &Node, depth: usize, column: usize, config: &PrintConfig, out: &mut String) {
    match node.kind {
        NodeKind::Symbol | NodeKind::Number => out.push_str(&node.text),
        NodeKind::Str => {
            out.push('"');
            out.push_str(&node.text);
            out.push('"');
        }
        NodeKind::Comment => out.push_str(node.text.trim_end()),
        NodeKind::List | NodeKind::File => print_list(node, depth, column, config, out),
    }
}

fn print_list(node: &Node, depth: usize, column: usize, config: &PrintConfig, out: &mut String) {
    if !node.contains_comment() {
        let flat = flat(node);
        if column + flat.chars().count() <= config.max_width {
            out.push_str(&flat);
            return;
        }
    }

    let inner_column = (depth + 1) * config.indent_width;
    out.push('(');
    for (i, child) in node.children.iter().enumerate() {
        if i == 0 {
            print_node(child, depth + 1, column + 1, config, out);
        } else {
            out.push('\n');
            out.push_str(&config.indent(depth + 1));
            print_node(child, depth + 1, inner_column, config, out);
        }
    }

    if node.children.last().map(|c| c.kind) == Some(NodeKind::Comment) {
        out.push('\n');
        out.push_str(&config.indent(depth));
    }
    out.push(')');
}

/// 单行形式（调用方保证子树不含注释）
fn flat(node: &Node) -> String {
    match node.kind {
        NodeKind::Str => format!("\"{}\"", node.text),
        NodeKind::List | NodeKind::File => {
            let parts: Vec<String> = node.children.iter().map(flat).collect();
            format!("({})", parts.join(" "))
        }
        _ => node.text.clone(),
    }
}
