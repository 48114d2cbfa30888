//! # S 表达式解析器
//!
//! 把源文件字节解析为 `Tree`，注释作为节点保留。
//!
//! ## 格式说明
//! ```text
//! ; 行注释，直到行尾
//! (define (square x)
//!   (* x x))
//! (print "hello\n" 42 -1.5e3)
//! ```
//!
//! ## 依赖关系
//! - 被 `syntax/mod.rs` 使用
//! - 使用 `syntax/tree.rs`

use super::tree::{Node, NodeKind, Tree};
use super::SyntaxError;

/// 列表最大嵌套深度
pub const MAX_DEPTH: usize = 256;

/// 解析源文件字节
pub fn parse_source(source: &[u8]) -> Result<Tree, SyntaxError> {
    let text = std::str::from_utf8(source).map_err(|e| {
        // 有效前缀必然是合法 UTF-8
        let prefix = std::str::from_utf8(&source[..e.valid_up_to()]).unwrap_or_default();
        let (line, column) = end_position(prefix);
        SyntaxError::Parse {
            line,
            column,
            message: "invalid UTF-8".to_string(),
        }
    })?;

    let mut parser = Parser::new(text);
    let items = parser.parse_items(None, 0)?;
    Ok(Tree::new(items))
}

/// 根据原子文本判断是数字还是符号
pub fn classify_atom(text: &str) -> NodeKind {
    let mut chars = text.chars();
    let starts_numeric = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') | Some('.') => {
            let rest = &text[1..];
            rest.starts_with(|c: char| c.is_ascii_digit())
                || (rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
        }
        _ => false,
    };

    if starts_numeric && text.parse::<f64>().is_ok() {
        NodeKind::Number
    } else {
        NodeKind::Symbol
    }
}

/// 原子中不允许出现的字符
pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')
}

/// 文本末尾的行列号（1 起始）
fn end_position(text: &str) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in text.chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn error_at(&self, (line, column): (usize, usize), message: &str) -> SyntaxError {
        SyntaxError::Parse {
            line,
            column,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// 解析条目序列，直到文件结束（顶层）或匹配的 `)`（列表内）
    fn parse_items(
        &mut self,
        open: Option<(usize, usize)>,
        depth: usize,
    ) -> Result<Vec<Node>, SyntaxError> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.here();

            match self.peek() {
                None => {
                    return match open {
                        Some(at) => Err(self.error_at(at, "unclosed '('")),
                        None => Ok(items),
                    };
                }
                Some(')') => {
                    if open.is_none() {
                        return Err(self.error_at(start, "unexpected ')'"));
                    }
                    self.bump();
                    return Ok(items);
                }
                Some('(') => {
                    if depth >= MAX_DEPTH {
                        return Err(self.error_at(start, "lists nested too deeply"));
                    }
                    self.bump();
                    let children = self.parse_items(Some(start), depth + 1)?;
                    items.push(Node::list(children));
                }
                Some(';') => items.push(self.parse_comment()),
                Some('"') => items.push(self.parse_string(start)?),
                Some(_) => items.push(self.parse_atom()),
            }
        }
    }

    fn parse_comment(&mut self) -> Node {
        let begin = self.pos;
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.bump();
        }
        Node::comment(self.src[begin..self.pos].trim_end())
    }

    fn parse_string(&mut self, start: (usize, usize)) -> Result<Node, SyntaxError> {
        self.bump();
        let begin = self.pos;

        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "unterminated string")),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(self.error_at(start, "unterminated string"));
                    }
                }
                Some('"') => break,
                Some(_) => {}
            }
        }

        // 去掉结尾的引号
        Ok(Node::string(&self.src[begin..self.pos - 1]))
    }

    fn parse_atom(&mut self) -> Node {
        let begin = self.pos;
        while matches!(self.peek(), Some(c) if !is_delimiter(c)) {
            self.bump();
        }
        let text = &self.src[begin..self.pos];
        match classify_atom(text) {
            NodeKind::Number => Node::number(text),
            _ => Node::symbol(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Result<Tree, SyntaxError> {
        parse_source(s.as_bytes())
    }

    #[test]
    fn test_parse_nested_lists() {
        let tree = parse_str("(define (square x) (* x x))").unwrap();
        let items = &tree.root().children;
        assert_eq!(items.len(), 1);

        let define = &items[0];
        assert_eq!(define.kind, NodeKind::List);
        assert!(define.children[0].is_symbol("define"));
        assert_eq!(define.children[1].children.len(), 2);
        assert_eq!(define.children[2].children[0].text, "*");
    }

    #[test]
    fn test_parse_atoms() {
        let tree = parse_str(r#"(f 42 -1.5e3 .5 - +x "a \"q\" b" 1.2.3)"#).unwrap();
        let kinds: Vec<NodeKind> = tree.root().children[0]
            .children
            .iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Symbol,
                NodeKind::Number,
                NodeKind::Number,
                NodeKind::Number,
                NodeKind::Symbol,
                NodeKind::Symbol,
                NodeKind::Str,
                NodeKind::Symbol,
            ]
        );
        assert_eq!(tree.root().children[0].children[6].text, r#"a \"q\" b"#);
    }

    #[test]
    fn test_parse_comments_are_nodes() {
        let tree = parse_str("; header   \r\n(a ; trailing\n b)\n").unwrap();
        let items = &tree.root().children;
        assert_eq!(items[0].kind, NodeKind::Comment);
        assert_eq!(items[0].text, "; header");
        assert_eq!(items[1].children[1].text, "; trailing");
        assert!(items[1].children[2].is_symbol("b"));
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse_str("  \n\t ").unwrap();
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn test_parse_unexpected_close() {
        let err = parse_str("(a)\n  )").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Parse {
                line: 2,
                column: 3,
                message: "unexpected ')'".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unclosed_reports_open_position() {
        let err = parse_str("(a\n  (b c)").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Parse {
                line: 1,
                column: 1,
                message: "unclosed '('".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unterminated_string() {
        assert!(matches!(
            parse_str("(a \"oops)"),
            Err(SyntaxError::Parse { line: 1, column: 4, .. })
        ));
        assert!(parse_str("\"dangling \\").is_err());
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let err = parse_source(b"(a)\n(\xff)").unwrap_err();
        assert!(matches!(err, SyntaxError::Parse { line: 2, column: 2, .. }));
    }

    #[test]
    fn test_parse_depth_limit() {
        let deep = "(".repeat(MAX_DEPTH + 1) + &")".repeat(MAX_DEPTH + 1);
        assert!(parse_str(&deep).is_err());

        let ok = "(".repeat(MAX_DEPTH) + &")".repeat(MAX_DEPTH);
        assert!(parse_str(&ok).is_ok());
    }
}
