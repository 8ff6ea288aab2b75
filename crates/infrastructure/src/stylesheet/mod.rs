//! Stylesheet host: parse, walk and write stylesheet text.

mod node;
mod parser;
mod writer;

pub use node::{AtRule, Comment, ContainerRaws, Node, Rule, Stylesheet};
pub use parser::{StylesheetError, parse};
pub use writer::stringify;

use dollop_application::ports::{DeclarationTree, StylesheetCodec, WalkAction};
use dollop_domain::Declaration;

impl DeclarationTree for Stylesheet {
    fn walk_declarations<E, F>(&mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&mut Declaration) -> Result<WalkAction, E>,
    {
        walk_nodes(&mut self.nodes, &mut visit, true)
    }
}

/// Depth-first walk over `nodes`. Removing the first root node hands its
/// leading raws to the node that takes its place.
fn walk_nodes<E, F>(nodes: &mut Vec<Node>, visit: &mut F, is_root: bool) -> Result<(), E>
where
    F: FnMut(&mut Declaration) -> Result<WalkAction, E>,
{
    let mut index = 0;
    while index < nodes.len() {
        let action = match &mut nodes[index] {
            Node::Declaration(decl) => visit(decl)?,
            Node::Rule(rule) => {
                walk_nodes(&mut rule.nodes, visit, false)?;
                WalkAction::Keep
            }
            Node::AtRule(at_rule) => {
                if let Some(children) = &mut at_rule.nodes {
                    walk_nodes(children, visit, false)?;
                }
                WalkAction::Keep
            }
            Node::Comment(_) => WalkAction::Keep,
        };

        match action {
            WalkAction::Keep => index += 1,
            WalkAction::Remove => {
                let removed = nodes.remove(index);
                if is_root
                    && index == 0
                    && let Some(next) = nodes.first_mut()
                {
                    next.set_before(removed.before().to_string());
                }
            }
        }
    }
    Ok(())
}

/// [`StylesheetCodec`] backed by [`parse`] and [`stringify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CssCodec;

impl CssCodec {
    /// Creates a new `CssCodec`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StylesheetCodec for CssCodec {
    type Document = Stylesheet;
    type Error = StylesheetError;

    fn parse(&self, text: &str) -> Result<Self::Document, Self::Error> {
        parse(text)
    }

    fn stringify(&self, document: &Self::Document) -> String {
        stringify(document)
    }
}
