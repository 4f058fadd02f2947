//! Helpers shared by the tree-sitter front ends.

use super::ParserClient;
use crate::error::{Result, TrailscopeError};
use trailscope_api::ParseLocation;
use tree_sitter::{Language, Node, Parser, Point, Tree};

/// Converts a tree-sitter range (0-based rows, end-exclusive byte columns)
/// into an inclusive, 1-based location.
pub fn location_from_ts(range: tree_sitter::Range) -> ParseLocation {
    let start = range.start_point;
    let end = range.end_point;
    if start == end {
        return ParseLocation::point(start.row + 1, start.column + 1);
    }
    if end.column == 0 && end.row > start.row {
        // Ends right after a line break: close on the previous line.
        return ParseLocation::new(start.row + 1, start.column + 1, end.row, start.column + 1);
    }
    ParseLocation::new(start.row + 1, start.column + 1, end.row + 1, end.column)
}

pub fn location_of(node: Node) -> ParseLocation {
    location_from_ts(node.range())
}

pub fn point_location(point: Point) -> ParseLocation {
    ParseLocation::point(point.row + 1, point.column + 1)
}

pub fn start_of(node: Node) -> ParseLocation {
    point_location(node.start_position())
}

/// Location of the last character of `node`.
pub fn end_of(node: Node) -> ParseLocation {
    let location = location_of(node);
    ParseLocation::point(location.end_line, location.end_col)
}

pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

pub fn new_parser(language: &Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    Ok(parser)
}

pub fn parse_text(parser: &mut Parser, text: &str) -> Result<Tree> {
    parser
        .parse(text, None)
        .ok_or_else(|| TrailscopeError::Parsing("parser returned no tree".to_string()))
}

pub fn first_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn has_child_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == token)
}

/// Pre-order traversal. `visit` returns whether to descend into the node.
pub fn walk_preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut cursor = root.walk();
    loop {
        let descend = visit(cursor.node());
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Reports every comment node of the given kinds.
pub fn record_comments(root: Node, kinds: &[&str], client: &mut dyn ParserClient) {
    walk_preorder(root, |node| {
        if kinds.contains(&node.kind()) {
            client.record_comment(location_of(node));
            return false;
        }
        true
    });
}

/// Reports tree-sitter error and missing nodes as non-fatal errors.
pub fn record_syntax_errors(root: Node, source: &str, client: &mut dyn ParserClient) -> usize {
    let mut count = 0;
    walk_preorder(root, |node| {
        if node.is_missing() {
            client.record_error(
                &format!("Syntax error, missing \"{}\"", node.kind()),
                false,
                start_of(node),
            );
            count += 1;
            return false;
        }
        if node.is_error() {
            let token = node_text(node, source)
                .split_whitespace()
                .next()
                .unwrap_or_default();
            let token: String = token.chars().take(40).collect();
            client.record_error(
                &format!("Syntax error on token \"{}\"", token),
                false,
                location_of(node),
            );
            count += 1;
            return false;
        }
        node.has_error()
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserClientImpl;
    use crate::storage::FactDigest;
    use std::path::Path;
    use tokio_util::sync::CancellationToken;
    use trailscope_api::LanguageType;

    fn java_tree(source: &str) -> Tree {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let mut parser = new_parser(&language).unwrap();
        parse_text(&mut parser, source).unwrap()
    }

    #[test]
    fn locations_are_one_based_and_inclusive() {
        let source = "package foo;\n";
        let tree = java_tree(source);
        let package = tree.root_node().child(0).unwrap();
        let name = first_child_of_kind(package, "identifier").unwrap();
        assert_eq!(location_of(name), ParseLocation::new(1, 9, 1, 11));
        assert_eq!(start_of(package), ParseLocation::point(1, 1));
        assert_eq!(end_of(package), ParseLocation::point(1, 12));
    }

    #[test]
    fn comments_and_errors_are_recorded() {
        let source = "// this is a line comment\npackage foo\n";
        let tree = java_tree(source);

        let mut client = ParserClientImpl::new(CancellationToken::new());
        client.record_file(Path::new("input.java"), LanguageType::Java);
        record_comments(tree.root_node(), &["line_comment", "block_comment"], &mut client);
        let errors = record_syntax_errors(tree.root_node(), source, &mut client);

        let storage = client.into_storage();
        assert_eq!(FactDigest::new(&storage).comments(), vec!["comment <1:1 1:25>"]);
        assert!(errors >= 1);
    }
}
