//! # 错误汇总
//!
//! `ErrorSet` 收集一次批处理中所有相互独立的失败（每个失败任务最多一条）。
//! 各任务把错误作为返回值交出，再由并行归约合并，因此不需要共享的可变列表。
//! 集合内的顺序没有意义。
//!
//! ## 依赖关系
//! - 被 `batch/package.rs`, `batch/runner.rs` 使用
//! - 使用 `error::RewriteError`

use crate::error::RewriteError;

use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelIterator};
use std::fmt;

/// 批处理错误集合
#[derive(Debug, Default)]
pub struct ErrorSet {
    errors: Vec<RewriteError>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: RewriteError) {
        self.errors.push(error);
    }

    /// 合并另一个集合
    pub fn merge(&mut self, other: ErrorSet) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// 空集合表示全部成功
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RewriteError> {
        self.errors.iter()
    }

    /// 指定类别的错误数量（见 `RewriteError::kind`）
    pub fn count_kind(&self, kind: &str) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn into_vec(self) -> Vec<RewriteError> {
        self.errors
    }

    /// 空集合转为 `Ok(())`
    pub fn into_result(self) -> Result<(), ErrorSet> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => write!(f, "no errors"),
            1 => write!(f, "{}", self.errors[0]),
            n => {
                write!(f, "{} errors:", n)?;
                for error in &self.errors {
                    write!(f, "\n  {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ErrorSet {}

impl Extend<RewriteError> for ErrorSet {
    fn extend<I: IntoIterator<Item = RewriteError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl FromIterator<RewriteError> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = RewriteError>>(iter: I) -> Self {
        ErrorSet {
            errors: iter.into_iter().collect(),
        }
    }
}

impl FromParallelIterator<RewriteError> for ErrorSet {
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = RewriteError>,
    {
        ErrorSet {
            errors: par_iter.into_par_iter().collect(),
        }
    }
}

impl IntoIterator for ErrorSet {
    type Item = RewriteError;
    type IntoIter = std::vec::IntoIter<RewriteError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = &'a RewriteError;
    type IntoIter = std::slice::Iter<'a, RewriteError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
