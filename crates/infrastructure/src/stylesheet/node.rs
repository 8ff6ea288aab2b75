//! Stylesheet tree types.

use dollop_domain::{Declaration, SourcePosition};

/// Raw formatting of a container's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRaws {
    /// Text between the last child and the end of the container.
    pub after: String,
    /// Whether the last declaration-like child was followed by `;`.
    pub semicolon: bool,
}

/// A `selector { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The selector, trailing whitespace excluded.
    pub selector: String,
    /// Child nodes.
    pub nodes: Vec<Node>,
    /// Text before the rule.
    pub before: String,
    /// Text between the selector and `{`.
    pub between: String,
    /// Formatting of the body.
    pub raws: ContainerRaws,
    /// Start of the rule in the source text.
    pub source: SourcePosition,
}

/// An `@name params;` or `@name params { ... }` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// The at-rule name without `@`.
    pub name: String,
    /// Everything after the name, trailing whitespace excluded.
    pub params: String,
    /// Child nodes, `None` for statements without a body.
    pub nodes: Option<Vec<Node>>,
    /// Text before the at-rule.
    pub before: String,
    /// Whitespace between the name and the params.
    pub after_name: String,
    /// Text between the params and `{` or `;`.
    pub between: String,
    /// Formatting of the body.
    pub raws: ContainerRaws,
    /// Start of the at-rule in the source text.
    pub source: SourcePosition,
}

/// A `/* ... */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment body without delimiters.
    pub text: String,
    /// Text before the comment.
    pub before: String,
    /// Start of the comment in the source text.
    pub source: SourcePosition,
}

/// A node in a stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A `prop: value` declaration.
    Declaration(Declaration),
    /// A rule block.
    Rule(Rule),
    /// An at-rule.
    AtRule(AtRule),
    /// A comment.
    Comment(Comment),
}

impl Node {
    /// Text written before the node.
    #[must_use]
    pub fn before(&self) -> &str {
        match self {
            Self::Declaration(decl) => &decl.raws.before,
            Self::Rule(rule) => &rule.before,
            Self::AtRule(at_rule) => &at_rule.before,
            Self::Comment(comment) => &comment.before,
        }
    }

    /// Replaces the text written before the node.
    pub fn set_before(&mut self, before: String) {
        match self {
            Self::Declaration(decl) => decl.raws.before = before,
            Self::Rule(rule) => rule.before = before,
            Self::AtRule(at_rule) => at_rule.before = before,
            Self::Comment(comment) => comment.before = before,
        }
    }

    /// Whether the writer may terminate this node with `;`.
    #[must_use]
    pub const fn takes_semicolon(&self) -> bool {
        match self {
            Self::Declaration(_) => true,
            Self::AtRule(at_rule) => at_rule.nodes.is_none(),
            Self::Rule(_) | Self::Comment(_) => false,
        }
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level nodes.
    pub nodes: Vec<Node>,
    /// Formatting of the top level.
    pub raws: ContainerRaws,
}

impl Stylesheet {
    /// Returns every declaration in document order, nested ones included.
    #[must_use]
    pub fn declarations(&self) -> Vec<&Declaration> {
        let mut found = Vec::new();
        collect_declarations(&self.nodes, &mut found);
        found
    }
}

fn collect_declarations<'a>(nodes: &'a [Node], found: &mut Vec<&'a Declaration>) {
    for node in nodes {
        match node {
            Node::Declaration(decl) => found.push(decl),
            Node::Rule(rule) => collect_declarations(&rule.nodes, found),
            Node::AtRule(at_rule) => {
                if let Some(children) = &at_rule.nodes {
                    collect_declarations(children, found);
                }
            }
            Node::Comment(_) => {}
        }
    }
}
