//! # refactor - 批量源文件重写引擎
//!
//! 为一次性的全仓库重构脚本提供基础设施：调用方只需要提供节点访问逻辑，
//! 引擎负责规格解析、并发 I/O、解析、遍历、规范格式打印以及错误汇总。
//!
//! ```no_run
//! use refactor::batch::run_batch;
//! use refactor::resolve::SearchPathResolver;
//! use refactor::syntax::{Node, SexpEngine};
//! use refactor::walk::each;
//!
//! let resolver = SearchPathResolver::new(".").with_roots(vec!["src".into()]);
//! let visitor = each(|node: &mut Node| {
//!     if node.is_symbol("old-name") {
//!         node.text = "new-name".to_string();
//!     }
//! });
//!
//! let errors = run_batch(&resolver, &SexpEngine::default(), &["core/..."], &visitor);
//! for error in &errors {
//!     eprintln!("{}", error);
//! }
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── batch/     (批处理：协调 → 包 → 单文件，错误汇总与报告)
//!   │     ├── resolve/  (规格 → 包)
//!   │     ├── syntax/   (解析与规范打印)
//!   │     └── walk.rs   (访问器与前序遍历)
//!   ├── cli/ + commands/ (命令行前端)
//!   ├── utils/     (输出与进度条)
//!   └── error.rs   (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod resolve;
pub mod syntax;
pub mod utils;
pub mod walk;

pub use batch::{run_batch, ErrorSet};
pub use error::{RefactorError, RewriteError};
