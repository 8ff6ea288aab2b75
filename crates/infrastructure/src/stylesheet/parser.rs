//! Lossless stylesheet scanner.
//!
//! Reads rules, at-rules, declarations and comments into a [`Stylesheet`],
//! keeping the whitespace around every node so that [`super::stringify`]
//! can write an unchanged tree back as it was read.

use dollop_domain::{Declaration, DeclarationRaws, SourcePosition};

use super::node::{AtRule, Comment, ContainerRaws, Node, Rule, Stylesheet};

/// Error produced when stylesheet text cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct StylesheetError {
    /// What went wrong.
    pub message: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column of the offending token.
    pub column: usize,
}

/// How a statement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    OpenBrace,
    CloseBrace,
    Eof,
}

/// Parses stylesheet text.
///
/// # Errors
///
/// Returns a [`StylesheetError`] for an unclosed block, comment or string,
/// an unexpected `}`, or a statement that is neither a block nor a
/// `prop: value` declaration.
///
/// # Examples
///
/// ```
/// use dollop_infrastructure::stylesheet::{parse, stringify};
///
/// let text = "a {\n  color: red;\n}\n";
/// let sheet = parse(text).unwrap();
/// assert_eq!(sheet.declarations()[0].value, "red");
/// assert_eq!(stringify(&sheet), text);
/// ```
pub fn parse(text: &str) -> Result<Stylesheet, StylesheetError> {
    let mut parser = Parser::new(text);
    let (nodes, raws) = parser.parse_body(None)?;
    Ok(Stylesheet { nodes, raws })
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_starts: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            line_starts,
        }
    }

    fn position(&self, offset: usize) -> SourcePosition {
        let line_index = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_index];
        let column = self.text[line_start..offset].chars().count() + 1;
        SourcePosition::new(line_index + 1, column, offset)
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> StylesheetError {
        let position = self.position(offset);
        StylesheetError {
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }

    /// Parses nodes until `}` (for a block opened at `opened_at`) or the end
    /// of input (for the root).
    fn parse_body(
        &mut self,
        opened_at: Option<usize>,
    ) -> Result<(Vec<Node>, ContainerRaws), StylesheetError> {
        let mut nodes = Vec::new();
        let mut semicolon = false;

        loop {
            let before = self.take_spacing();

            let Some(&byte) = self.bytes.get(self.pos) else {
                if let Some(start) = opened_at {
                    return Err(self.error("Unclosed block", start));
                }
                return Ok((nodes, ContainerRaws { after: before, semicolon }));
            };

            if byte == b'}' {
                if opened_at.is_none() {
                    return Err(self.error("Unexpected }", self.pos));
                }
                self.pos += 1;
                return Ok((nodes, ContainerRaws { after: before, semicolon }));
            }

            if self.text[self.pos..].starts_with("/*") {
                nodes.push(self.parse_comment(before)?);
                continue;
            }

            let (node, terminator) = self.parse_statement(before)?;
            if node.takes_semicolon() {
                semicolon = terminator == Terminator::Semicolon;
            }
            nodes.push(node);
        }
    }

    /// Collects whitespace and stray semicolons in front of a node.
    fn take_spacing(&mut self) -> String {
        let start = self.pos;
        while let Some(&byte) = self.bytes.get(self.pos) {
            if byte.is_ascii_whitespace() || byte == b';' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.text[start..self.pos].to_string()
    }

    fn parse_comment(&mut self, before: String) -> Result<Node, StylesheetError> {
        let start = self.pos;
        let end = self.skip_comment(start)?;
        self.pos = end;
        Ok(Node::Comment(Comment {
            text: self.text[start + 2..end - 2].to_string(),
            before,
            source: self.position(start),
        }))
    }

    /// Returns the offset just past the comment opened at `start`.
    fn skip_comment(&self, start: usize) -> Result<usize, StylesheetError> {
        self.text[start + 2..]
            .find("*/")
            .map(|found| start + 2 + found + 2)
            .ok_or_else(|| self.error("Unclosed comment", start))
    }

    /// Returns the offset just past the string opened at `start`.
    fn skip_string(&self, start: usize) -> Result<usize, StylesheetError> {
        let quote = self.bytes[start];
        let mut index = start + 1;
        while let Some(&byte) = self.bytes.get(index) {
            if byte == b'\\' {
                index += 2;
            } else if byte == quote {
                return Ok(index + 1);
            } else {
                index += 1;
            }
        }
        Err(self.error("Unclosed string", start))
    }

    /// Finds the end of the statement starting at `start`, skipping over
    /// strings, comments and parenthesized groups.
    fn scan_statement(&self, start: usize) -> Result<(usize, Terminator), StylesheetError> {
        let mut index = start;
        let mut parens = 0usize;

        while let Some(&byte) = self.bytes.get(index) {
            match byte {
                b'"' | b'\'' => index = self.skip_string(index)?,
                b'/' if self.bytes.get(index + 1) == Some(&b'*') => {
                    index = self.skip_comment(index)?;
                }
                b'\\' => index += 2,
                b'(' => {
                    parens += 1;
                    index += 1;
                }
                b')' => {
                    parens = parens.saturating_sub(1);
                    index += 1;
                }
                b';' if parens == 0 => return Ok((index, Terminator::Semicolon)),
                b'{' if parens == 0 => return Ok((index, Terminator::OpenBrace)),
                b'}' if parens == 0 => return Ok((index, Terminator::CloseBrace)),
                _ => index += 1,
            }
        }

        Ok((self.bytes.len(), Terminator::Eof))
    }

    fn parse_statement(
        &mut self,
        before: String,
    ) -> Result<(Node, Terminator), StylesheetError> {
        let start = self.pos;
        let (end, terminator) = self.scan_statement(start)?;
        let text = self.text;
        let statement = &text[start..end];
        let trimmed = statement.trim_end();
        let trailing = statement[trimmed.len()..].to_string();
        let source = self.position(start);

        let node = match terminator {
            Terminator::OpenBrace => {
                self.pos = end + 1;
                let (nodes, raws) = self.parse_body(Some(start))?;
                if let Some(at_rule) = trimmed.strip_prefix('@') {
                    let (name, after_name, params) = split_at_rule(at_rule);
                    Node::AtRule(AtRule {
                        name,
                        params,
                        nodes: Some(nodes),
                        before,
                        after_name,
                        between: trailing,
                        raws,
                        source,
                    })
                } else {
                    Node::Rule(Rule {
                        selector: trimmed.to_string(),
                        nodes,
                        before,
                        between: trailing,
                        raws,
                        source,
                    })
                }
            }
            Terminator::Semicolon | Terminator::CloseBrace | Terminator::Eof => {
                // Trailing whitespace before `}` or the end of input belongs to
                // the container; before `;` it is dropped.
                self.pos = if terminator == Terminator::Semicolon {
                    end + 1
                } else {
                    start + trimmed.len()
                };

                if let Some(at_rule) = trimmed.strip_prefix('@') {
                    let (name, after_name, params) = split_at_rule(at_rule);
                    return Ok((
                        Node::AtRule(AtRule {
                            name,
                            params,
                            nodes: None,
                            before,
                            after_name,
                            between: String::new(),
                            raws: ContainerRaws::default(),
                            source,
                        }),
                        terminator,
                    ));
                }

                let Some(colon) = trimmed.find(':') else {
                    let word = trimmed.split_whitespace().next().unwrap_or(trimmed);
                    return Err(self.error(format!("Unknown word {word}"), start));
                };

                let prop = trimmed[..colon].trim_end();
                let rest = &trimmed[colon + 1..];
                let value = rest.trim_start();
                let between = format!(
                    "{}:{}",
                    &trimmed[prop.len()..colon],
                    &rest[..rest.len() - value.len()]
                );

                tracing::trace!(prop, line = source.line, "declaration");

                Node::Declaration(Declaration {
                    prop: prop.to_string(),
                    value: value.to_string(),
                    raws: DeclarationRaws { before, between },
                    source,
                })
            }
        };

        Ok((node, terminator))
    }
}

/// Splits `name params` (without the `@`) into name, spacing and params.
fn split_at_rule(text: &str) -> (String, String, String) {
    let name_end = text
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | '"' | '\''))
        .unwrap_or(text.len());
    let rest = &text[name_end..];
    let params = rest.trim_start();
    (
        text[..name_end].to_string(),
        rest[..rest.len() - params.len()].to_string(),
        params.to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn only_declaration(sheet: &Stylesheet) -> &Declaration {
        let decls = sheet.declarations();
        assert_eq!(decls.len(), 1);
        decls[0]
    }

    #[test]
    fn test_parse_root_declaration() {
        let sheet = parse("$color: red;").unwrap();
        let decl = only_declaration(&sheet);

        assert_eq!(decl.prop, "$color");
        assert_eq!(decl.value, "red");
        assert_eq!(decl.raws.between, ": ");
        assert!(sheet.raws.semicolon);
    }

    #[test]
    fn test_parse_rule_positions() {
        let sheet = parse("a {\n  color: $color;\n}").unwrap();
        let decl = only_declaration(&sheet);

        assert_eq!(decl.source, SourcePosition::new(2, 3, 6));
        assert_eq!(decl.raws.before, "\n  ");

        let Node::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selector, "a");
        assert_eq!(rule.between, " ");
        assert_eq!(rule.raws.after, "\n");
        assert!(rule.raws.semicolon);
    }

    #[test]
    fn test_parse_last_declaration_without_semicolon() {
        let sheet = parse("a { color: red }").unwrap();
        let Node::Rule(rule) = &sheet.nodes[0] else {
            panic!("expected rule");
        };

        assert!(!rule.raws.semicolon);
        assert_eq!(rule.raws.after, " ");
        assert_eq!(only_declaration(&sheet).value, "red");
    }

    #[test]
    fn test_parse_tight_between() {
        let sheet = parse("a{color :red}").unwrap();
        let decl = only_declaration(&sheet);

        assert_eq!(decl.prop, "color");
        assert_eq!(decl.raws.between, " :");
        assert_eq!(decl.value, "red");
    }

    #[test]
    fn test_parse_skips_semicolons_in_strings_and_parens() {
        let sheet =
            parse(r#"a { content: "a;b"; background: url(data:image/png;base64,AA) }"#).unwrap();
        let decls = sheet.declarations();

        assert_eq!(decls[0].value, r#""a;b""#);
        assert_eq!(decls[1].value, "url(data:image/png;base64,AA)");
    }

    #[test]
    fn test_parse_at_rules() {
        let sheet = parse("@import \"a.css\";\n@media (min-width: 10px) {\n  a { color: red; }\n}")
            .unwrap();

        let Node::AtRule(import) = &sheet.nodes[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(import.name, "import");
        assert_eq!(import.params, "\"a.css\"");
        assert!(import.nodes.is_none());

        let Node::AtRule(media) = &sheet.nodes[1] else {
            panic!("expected at-rule");
        };
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(min-width: 10px)");
        assert_eq!(media.nodes.as_ref().map(Vec::len), Some(1));
        assert_eq!(only_declaration(&sheet).value, "red");
    }

    #[test]
    fn test_parse_comments() {
        let sheet = parse("/* top */\na { /* inner */ color: red; }").unwrap();

        let Node::Comment(comment) = &sheet.nodes[0] else {
            panic!("expected comment");
        };
        assert_eq!(comment.text, " top ");

        let Node::Rule(rule) = &sheet.nodes[1] else {
            panic!("expected rule");
        };
        assert!(matches!(rule.nodes[0], Node::Comment(_)));
        assert_eq!(rule.before, "\n");
    }

    #[test]
    fn test_unclosed_block() {
        let error = parse("a {\n  color: red;").unwrap_err();
        assert_eq!(error.message, "Unclosed block");
        assert_eq!((error.line, error.column), (1, 1));
    }

    #[test]
    fn test_unclosed_comment() {
        let error = parse("a { /* color: red; }").unwrap_err();
        assert_eq!(error.message, "Unclosed comment");
        assert_eq!((error.line, error.column), (1, 5));
    }

    #[test]
    fn test_unclosed_string() {
        let error = parse("a { content: \"oops; }").unwrap_err();
        assert_eq!(error.message, "Unclosed string");
        assert_eq!(error.column, 14);
    }

    #[test]
    fn test_unexpected_close() {
        let error = parse("a { color: red; }\n}").unwrap_err();
        assert_eq!(error.message, "Unexpected }");
        assert_eq!((error.line, error.column), (2, 1));
    }

    #[test]
    fn test_unknown_word() {
        let error = parse("a { color red; }").unwrap_err();
        assert_eq!(error.to_string(), "Unknown word color at line 1, column 5");
    }

    #[test]
    fn test_columns_count_characters() {
        let sheet = parse("/* é */ a { color: red; }").unwrap();
        assert_eq!(only_declaration(&sheet).source.column, 13);
    }
}
