//! # 搜索路径解析器
//!
//! 在显式给出的搜索根目录中查找规格对应的包。
//!
//! ## 规格形式
//! - `name`、`a/b`: 在各搜索根中按顺序查找第一个同名目录
//! - `./x`、`../x`、`.`、绝对路径: 相对于基准目录
//! - `x/...`、`...`: 递归匹配，`x` 之下每个含源文件的目录都是一个包；
//!   `...` 只能单独出现或紧跟在 `/` 之后，`a/b...` 这样的前缀匹配会被拒绝
//! - 含 `*`、`?`、`[` 的规格: glob 匹配目录
//! - 指向单个源文件的规格: 该文件单独成包
//!
//! 以 `.` 或 `_` 开头的文件和目录（以及 `testdata` 目录）会被忽略。
//!
//! ## 依赖关系
//! - 被 `resolve/mod.rs` 导出
//! - 使用 `walkdir` 递归遍历目录，`glob` 做模式匹配

use super::{PackageResolver, ResolveError, ResolvedPackage};
use crate::syntax::{SexpEngine, SyntaxEngine};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const RECURSIVE_SUFFIX: &str = "...";

/// 基于搜索路径的包解析器
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    /// 基准目录，相对路径形式的规格和搜索根都以它为起点
    base_dir: PathBuf,
    /// 搜索根（按优先级）
    roots: Vec<PathBuf>,
    /// 源文件扩展名（小写，不含 `.`）
    extensions: Vec<String>,
}

impl SearchPathResolver {
    /// 创建新的解析器，默认以基准目录为唯一搜索根，
    /// 扩展名取自默认的 S 表达式引擎
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::for_engine(base_dir, &SexpEngine::default())
    }

    /// 创建只收集 `engine` 能处理的源文件的解析器
    pub fn for_engine<E>(base_dir: impl Into<PathBuf>, engine: &E) -> Self
    where
        E: SyntaxEngine + ?Sized,
    {
        Self {
            base_dir: base_dir.into(),
            roots: vec![PathBuf::from(".")],
            extensions: Vec::new(),
        }
        .with_extensions(engine.extensions())
    }

    /// 设置搜索根（空列表时保持默认）
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.roots = roots;
        }
        self
    }

    /// 设置源文件扩展名（空列表时保持默认）
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    /// 搜索根的实际位置
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|r| {
                if r.as_os_str() == "." {
                    self.base_dir.clone()
                } else {
                    self.base_dir.join(r)
                }
            })
            .collect()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// 列出目录中直接包含的源文件（已排序）
    pub fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let io_error = |source| ResolveError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() && self.is_source_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// 检查文件名是否为源文件
    fn is_source_file(&self, path: &Path) -> bool {
        let visible = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| !is_ignored_name(n));

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        visible && self.extensions.iter().any(|e| *e == ext)
    }

    /// 规格对应的候选位置
    fn candidates(&self, spec: &str) -> Vec<PathBuf> {
        if is_path_like(spec) {
            vec![self.base_dir.join(spec)]
        } else {
            self.roots().into_iter().map(|r| r.join(spec)).collect()
        }
    }

    /// 把目录变成包（没有源文件时返回 None）
    fn package_in(&self, spec: &str, dir: &Path) -> Result<Option<ResolvedPackage>, ResolveError> {
        let files = self.source_files(dir)?;
        if files.is_empty() {
            return Ok(None);
        }
        Ok(Some(ResolvedPackage {
            spec: spec.to_string(),
            dir: dir.to_path_buf(),
            files,
        }))
    }

    /// `x/...` 递归展开
    fn resolve_recursive(&self, spec: &str, prefix: &str) -> Result<Vec<ResolvedPackage>, ResolveError> {
        let prefix = prefix.trim_end_matches('/');
        let bases: Vec<PathBuf> = if prefix.is_empty() {
            self.roots()
        } else {
            self.candidates(prefix)
        };

        let existing: Vec<&PathBuf> = bases.iter().filter(|b| b.is_dir()).collect();
        if existing.is_empty() {
            return Err(ResolveError::NotFound { searched: bases });
        }

        let mut packages = Vec::new();
        for base in existing {
            let walker = WalkDir::new(base)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_pruned_dir(e));

            for entry in walker {
                let entry = entry.map_err(|e| ResolveError::Io {
                    path: e.path().unwrap_or(base.as_path()).to_path_buf(),
                    source: e.into(),
                })?;
                if entry.file_type().is_dir() {
                    if let Some(pkg) = self.package_in(spec, entry.path())? {
                        packages.push(pkg);
                    }
                }
            }
        }

        if packages.is_empty() {
            warn!(spec, "pattern matched no packages");
        }
        Ok(packages)
    }

    /// glob 模式展开
    fn resolve_glob(&self, spec: &str) -> Result<Vec<ResolvedPackage>, ResolveError> {
        // 先校验模式本身
        glob::Pattern::new(spec)?;

        let patterns: Vec<String> = if Path::new(spec).is_absolute() {
            vec![spec.to_string()]
        } else if is_path_like(spec) {
            vec![join_pattern(&self.base_dir, spec)]
        } else {
            self.roots().iter().map(|r| join_pattern(r, spec)).collect()
        };

        let mut packages = Vec::new();
        for pattern in patterns {
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| ResolveError::Io {
                    path: e.path().to_path_buf(),
                    source: std::io::Error::from(e),
                })?;
                if path.is_dir() {
                    if let Some(pkg) = self.package_in(spec, &path)? {
                        packages.push(pkg);
                    }
                } else if path.is_file() && self.is_source_file(&path) {
                    packages.push(single_file_package(spec, path));
                }
            }
        }

        if packages.is_empty() {
            warn!(spec, "pattern matched no packages");
        }
        Ok(packages)
    }

    /// 普通规格：第一个存在的候选位置
    fn resolve_plain(&self, spec: &str) -> Result<Vec<ResolvedPackage>, ResolveError> {
        let searched = self.candidates(spec);

        let Some(index) = searched.iter().position(|c| c.exists()) else {
            return Err(ResolveError::NotFound { searched });
        };
        let found = searched[index].clone();

        if found.is_file() {
            if self.is_source_file(&found) {
                return Ok(vec![single_file_package(spec, found)]);
            }
            return Err(ResolveError::NoSourceFiles { dir: found });
        }

        match self.package_in(spec, &found)? {
            Some(pkg) => Ok(vec![pkg]),
            None => Err(ResolveError::NoSourceFiles { dir: found }),
        }
    }
}

impl PackageResolver for SearchPathResolver {
    fn resolve(&self, spec: &str) -> Result<Vec<ResolvedPackage>, ResolveError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ResolveError::EmptySpec);
        }

        let packages = if let Some(prefix) = spec.strip_suffix(RECURSIVE_SUFFIX) {
            if !prefix.is_empty() && !prefix.ends_with('/') {
                return Err(ResolveError::MisplacedWildcard {
                    spec: spec.to_string(),
                });
            }
            self.resolve_recursive(spec, prefix)?
        } else if spec.contains(['*', '?', '[']) {
            self.resolve_glob(spec)?
        } else {
            self.resolve_plain(spec)?
        };

        debug!(spec, packages = packages.len(), "resolved");
        Ok(packages)
    }
}

/// 把基准目录转义后与模式拼接
fn join_pattern(base: &Path, spec: &str) -> String {
    format!(
        "{}/{}",
        glob::Pattern::escape(&base.to_string_lossy()),
        spec.trim_start_matches("./")
    )
}

fn single_file_package(spec: &str, file: PathBuf) -> ResolvedPackage {
    ResolvedPackage {
        spec: spec.to_string(),
        dir: file.parent().map(Path::to_path_buf).unwrap_or_default(),
        files: vec![file],
    }
}

/// 规格是否为相对基准目录的路径
fn is_path_like(spec: &str) -> bool {
    Path::new(spec).is_absolute()
        || spec == "."
        || spec == ".."
        || spec.starts_with("./")
        || spec.starts_with("../")
}

fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

fn is_pruned_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(true, |n| is_ignored_name(n) || n == "testdata")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "(x)\n").unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "src/core/a.sexp");
        touch(root, "src/core/b.sexp");
        touch(root, "src/core/notes.txt");
        touch(root, "src/core/.hidden.sexp");
        touch(root, "src/core/_draft.sexp");
        touch(root, "src/util/u.SEXP");
        touch(root, "src/util/deep/d.sexp");
        touch(root, "src/.cache/c.sexp");
        touch(root, "src/testdata/t.sexp");
        touch(root, "lib/core/other.sexp");
        fs::create_dir_all(root.join("empty")).unwrap();
        tmp
    }

    fn names(pkg: &ResolvedPackage) -> Vec<String> {
        pkg.files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_resolve_plain_uses_first_root() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path())
            .with_roots(vec![PathBuf::from("src"), PathBuf::from("lib")]);

        let pkgs = resolver.resolve("core").unwrap();
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].dir, tmp.path().join("src").join("core"));
        assert_eq!(names(&pkgs[0]), vec!["a.sexp", "b.sexp"]);
        assert_eq!(pkgs[0].spec, "core");
    }

    #[test]
    fn test_resolve_extension_is_case_insensitive() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path()).with_roots(vec![PathBuf::from("src")]);
        let pkgs = resolver.resolve("util").unwrap();
        assert_eq!(names(&pkgs[0]), vec!["u.SEXP"]);
    }

    #[test]
    fn test_resolve_path_like_ignores_roots() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path()).with_roots(vec![PathBuf::from("src")]);
        let pkgs = resolver.resolve("./lib/core").unwrap();
        assert_eq!(names(&pkgs[0]), vec!["other.sexp"]);
    }

    #[test]
    fn test_resolve_single_file() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path());
        let pkgs = resolver.resolve("./src/core/b.sexp").unwrap();
        assert_eq!(pkgs[0].files, vec![tmp.path().join("./src/core/b.sexp")]);
    }

    #[test]
    fn test_resolve_recursive() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path());
        let pkgs = resolver.resolve("./src/...").unwrap();

        let dirs: Vec<PathBuf> = pkgs
            .iter()
            .map(|p| p.dir.strip_prefix(tmp.path().join("./src")).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("core"),
                PathBuf::from("util"),
                PathBuf::from("util/deep"),
            ]
        );
        assert!(pkgs.iter().all(|p| p.spec == "./src/..."));
    }

    #[test]
    fn test_resolve_recursive_without_packages() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path());
        assert!(resolver.resolve("./empty/...").unwrap().is_empty());
        assert!(matches!(
            resolver.resolve("./missing/..."),
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_prefix_wildcard() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path());

        let err = resolver.resolve("./src/co...").unwrap_err();
        assert!(matches!(err, ResolveError::MisplacedWildcard { ref spec } if spec == "./src/co..."));
        assert!(matches!(
            resolver.resolve("src/core..."),
            Err(ResolveError::MisplacedWildcard { .. })
        ));
        assert_eq!(resolver.resolve("...").unwrap().len(), 4);
    }

    #[test]
    fn test_resolve_glob() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path())
            .with_roots(vec![PathBuf::from("src"), PathBuf::from("lib")]);
        let pkgs = resolver.resolve("c*").unwrap();
        // src/core 与 lib/core 都会匹配
        assert_eq!(pkgs.len(), 2);
        assert!(matches!(
            resolver.resolve("[oops"),
            Err(ResolveError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_resolve_errors() {
        let tmp = fixture();
        let resolver = SearchPathResolver::new(tmp.path());

        assert!(matches!(resolver.resolve("  "), Err(ResolveError::EmptySpec)));
        assert!(matches!(
            resolver.resolve("nope"),
            Err(ResolveError::NotFound { .. })
        ));
        assert!(matches!(
            resolver.resolve("empty"),
            Err(ResolveError::NoSourceFiles { .. })
        ));
        assert!(matches!(
            resolver.resolve("./src/core/notes.txt"),
            Err(ResolveError::NoSourceFiles { .. })
        ));
    }

    /// 只认 `.sx` 文件的引擎
    struct ShortExtEngine;

    impl SyntaxEngine for ShortExtEngine {
        fn extensions(&self) -> &[&str] {
            &["sx"]
        }

        fn parse(&self, source: &[u8]) -> Result<crate::syntax::Tree, crate::syntax::SyntaxError> {
            SexpEngine::default().parse(source)
        }

        fn print(&self, tree: &crate::syntax::Tree) -> Result<Vec<u8>, crate::syntax::SyntaxError> {
            SexpEngine::default().print(tree)
        }
    }

    #[test]
    fn test_extensions_come_from_engine() {
        let tmp = fixture();
        touch(tmp.path(), "src/core/extra.sx");

        let default = SearchPathResolver::new(tmp.path());
        assert_eq!(default.extensions(), &["sexp".to_string()]);

        let resolver = SearchPathResolver::for_engine(tmp.path(), &ShortExtEngine)
            .with_roots(vec![PathBuf::from("src")]);
        assert_eq!(resolver.extensions(), &["sx".to_string()]);
        let pkgs = resolver.resolve("core").unwrap();
        assert_eq!(names(&pkgs[0]), vec!["extra.sx"]);
    }

    #[test]
    fn test_with_extensions_normalizes() {
        let resolver = SearchPathResolver::new(".").with_extensions([".SX", " sexp ", ""]);
        assert_eq!(resolver.extensions(), &["sx".to_string(), "sexp".to_string()]);
    }
}
