//! # 语法树遍历
//!
//! 前序遍历：先访问节点本身，再依次递归访问它的子节点，根节点也会被访问。
//! 子节点列表在访问器返回之后才读取，所以访问器对当前节点子树的修改
//! （增删子节点）会被后续遍历看到。
//!
//! 访问器通过返回 `Flow` 控制遍历：
//! - `Continue`: 继续进入子节点
//! - `SkipChildren`: 不进入该节点的子节点，继续处理兄弟节点
//! - `Abort`: 立即停止遍历，该文件不会被写回
//!
//! 不关心控制流的访问器用 `each` 包装，每个节点都会被访问。
//!
//! ## 依赖关系
//! - 被 `batch/rewriter.rs` 和 `commands/` 使用
//! - 使用 `syntax/tree.rs`

use crate::syntax::Node;

/// 访问器对遍历的控制信号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    SkipChildren,
    Abort,
}

/// 节点访问器
///
/// 同一个访问器会被所有文件任务并发调用，因此要求 `Sync`。
/// 访问器内部如果有共享的可变状态，需要自行使用原子量或锁。
pub trait Visitor: Sync {
    fn visit(&self, node: &mut Node) -> Flow;
}

impl<F> Visitor for F
where
    F: Fn(&mut Node) -> Flow + Sync,
{
    fn visit(&self, node: &mut Node) -> Flow {
        self(node)
    }
}

/// 总是继续遍历的访问器
pub struct Each<F>(F);

impl<F> Visitor for Each<F>
where
    F: Fn(&mut Node) + Sync,
{
    fn visit(&self, node: &mut Node) -> Flow {
        (self.0)(node);
        Flow::Continue
    }
}

/// 把普通闭包包装为访问每一个节点的访问器
pub fn each<F>(f: F) -> Each<F>
where
    F: Fn(&mut Node) + Sync,
{
    Each(f)
}

/// 不做任何修改的访问器，用于只格式化
pub fn noop() -> Each<fn(&mut Node)> {
    fn ignore(_: &mut Node) {}
    Each(ignore)
}

/// 一次遍历的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkSummary {
    /// 访问器被调用的次数
    pub visited: usize,
    /// 访问器是否返回了 `Abort`
    pub aborted: bool,
}

/// 从 `root` 开始前序遍历
pub fn walk<V: Visitor + ?Sized>(root: &mut Node, visitor: &V) -> WalkSummary {
    let mut summary = WalkSummary::default();
    walk_node(root, visitor, &mut summary);
    summary
}

/// 返回 false 表示遍历已中止
fn walk_node<V: Visitor + ?Sized>(node: &mut Node, visitor: &V, summary: &mut WalkSummary) -> bool {
    summary.visited += 1;

    match visitor.visit(node) {
        Flow::Continue => {}
        Flow::SkipChildren => return true,
        Flow::Abort => {
            summary.aborted = true;
            return false;
        }
    }

    for child in node.children.iter_mut() {
        if !walk_node(child, visitor, summary) {
            return false;
        }
    }
    true
}
