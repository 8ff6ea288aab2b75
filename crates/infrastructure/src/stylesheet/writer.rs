//! Stylesheet writer.

use super::node::{ContainerRaws, Node, Stylesheet};

/// Writes a stylesheet back to text using the raws kept by the parser.
#[must_use]
pub fn stringify(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_body(&sheet.nodes, &sheet.raws, &mut out);
    out.push_str(&sheet.raws.after);
    out
}

fn write_body(nodes: &[Node], raws: &ContainerRaws, out: &mut String) {
    let last = nodes
        .iter()
        .rposition(|node| !matches!(node, Node::Comment(_)));

    for (index, node) in nodes.iter().enumerate() {
        write_node(node, out);
        if node.takes_semicolon() && (Some(index) != last || raws.semicolon) {
            out.push(';');
        }
    }
}

fn write_node(node: &Node, out: &mut String) {
    out.push_str(node.before());
    match node {
        Node::Declaration(decl) => {
            out.push_str(&decl.prop);
            out.push_str(&decl.raws.between);
            out.push_str(&decl.value);
        }
        Node::Rule(rule) => {
            out.push_str(&rule.selector);
            out.push_str(&rule.between);
            write_block(&rule.nodes, &rule.raws, out);
        }
        Node::AtRule(at_rule) => {
            out.push('@');
            out.push_str(&at_rule.name);
            out.push_str(&at_rule.after_name);
            out.push_str(&at_rule.params);
            out.push_str(&at_rule.between);
            if let Some(children) = &at_rule.nodes {
                write_block(children, &at_rule.raws, out);
            }
        }
        Node::Comment(comment) => {
            out.push_str("/*");
            out.push_str(&comment.text);
            out.push_str("*/");
        }
    }
}

fn write_block(nodes: &[Node], raws: &ContainerRaws, out: &mut String) {
    out.push('{');
    write_body(nodes, raws, out);
    out.push_str(&raws.after);
    out.push('}');
}
