//! # 语法树数据模型
//!
//! 单个源文件的可变语法树。语法引擎解析得到 `Tree`，访问器通过
//! `&mut Node` 原地修改，打印器再把它序列化回规范格式。
//!
//! ## 依赖关系
//! - 被 `syntax/parser.rs`, `syntax/printer.rs`, `walk.rs` 使用
//! - 无外部模块依赖

use std::fmt;

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// 文件根节点，子节点为顶层条目
    File,
    /// 括号列表 `( ... )`
    List,
    /// 符号
    Symbol,
    /// 数字字面量
    Number,
    /// 字符串字面量，`text` 为引号内的原始内容（转义保持原样）
    Str,
    /// 注释，`text` 包含开头的 `;`
    Comment,
}

impl NodeKind {
    /// 是否为叶子（不允许有子节点）
    pub fn is_leaf(self) -> bool {
        !matches!(self, NodeKind::File | NodeKind::List)
    }

    /// 是否为原子（符号、数字、字符串）
    pub fn is_atom(self) -> bool {
        matches!(self, NodeKind::Symbol | NodeKind::Number | NodeKind::Str)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::List => write!(f, "list"),
            NodeKind::Symbol => write!(f, "symbol"),
            NodeKind::Number => write!(f, "number"),
            NodeKind::Str => write!(f, "string"),
            NodeKind::Comment => write!(f, "comment"),
        }
    }
}

/// 语法树节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// 叶子节点的源文本；容器节点为空
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn list(children: Vec<Node>) -> Self {
        Node {
            kind: NodeKind::List,
            text: String::new(),
            children,
        }
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Symbol, text)
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Number, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Str, text)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Comment, text)
    }

    fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Node {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// 是否为指定文本的符号
    pub fn is_symbol(&self, name: &str) -> bool {
        self.kind == NodeKind::Symbol && self.text == name
    }

    /// 列表的首个子节点（Lisp 中的 head）
    pub fn head(&self) -> Option<&Node> {
        self.children.first()
    }

    /// 子树中的节点总数（包含自身）
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// 子树中是否含有注释
    pub fn contains_comment(&self) -> bool {
        self.kind == NodeKind::Comment || self.children.iter().any(Node::contains_comment)
    }
}

/// 单个源文件的语法树
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// 由顶层条目构造
    pub fn new(items: Vec<Node>) -> Self {
        Tree {
            root: Node {
                kind: NodeKind::File,
                text: String::new(),
                children: items,
            },
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// 树中节点总数（包含根）
    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_includes_root() {
        let tree = Tree::new(vec![
            Node::list(vec![Node::symbol("define"), Node::symbol("x"), Node::number("1")]),
            Node::comment(";; done"),
        ]);
        // root + list + 3 atoms + comment
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_contains_comment_is_deep() {
        let inner = Node::list(vec![Node::symbol("a"), Node::comment("; x")]);
        let outer = Node::list(vec![Node::symbol("b"), inner]);
        assert!(outer.contains_comment());
        assert!(!Node::list(vec![Node::symbol("c")]).contains_comment());
    }

    #[test]
    fn test_kind_classes() {
        assert!(NodeKind::Str.is_atom());
        assert!(NodeKind::Comment.is_leaf());
        assert!(!NodeKind::Comment.is_atom());
        assert!(!NodeKind::List.is_leaf());
    }
}
