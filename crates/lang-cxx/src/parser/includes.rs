//! `#include` following. Headers are indexed after the file that includes
//! them when they lie under an indexed path and no exclude filter matches.

use super::flags::absolute_in;
use std::path::{Path, PathBuf};
use tracing::warn;
use trailscope_core::parser::utils::{named_children, node_text};
use trailscope_core::settings::FilePathFilter;
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub target: String,
    /// `"..."` includes search the including file's directory first.
    pub quoted: bool,
}

/// Every `#include` of the file, conditional branches included.
pub fn include_directives(root: Node, source: &str) -> Vec<Include> {
    let mut found = Vec::new();
    collect(root, source, &mut found);
    found
}

fn collect(node: Node, source: &str, found: &mut Vec<Include>) {
    for child in named_children(node) {
        match child.kind() {
            "preproc_include" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                let target = node_text(path, source).trim_matches(['"', '<', '>']);
                if !target.is_empty() {
                    found.push(Include {
                        target: target.to_string(),
                        quoted: path.kind() == "string_literal",
                    });
                }
            }
            kind if kind.starts_with("preproc_") || kind == "linkage_specification" => {
                collect(child, source, found)
            }
            "declaration_list" => collect(child, source, found),
            _ => {}
        }
    }
}

/// Which headers a translation unit may pull in.
pub struct IncludeScope {
    indexed_paths: Vec<PathBuf>,
    exclude_filters: Vec<FilePathFilter>,
    search_dirs: Vec<PathBuf>,
}

impl IncludeScope {
    pub fn new(
        working_directory: &Path,
        indexed_paths: &[PathBuf],
        exclude_filters: &[String],
        include_dirs: &[PathBuf],
    ) -> Self {
        let exclude_filters = exclude_filters
            .iter()
            .map(|pattern| anchored(working_directory, pattern))
            .filter_map(|pattern| match FilePathFilter::new(&pattern) {
                Ok(filter) => Some(filter),
                Err(e) => {
                    warn!("Skipping exclude filter '{}': {}", pattern, e);
                    None
                }
            })
            .collect();
        let mut search_dirs = include_dirs.to_vec();
        search_dirs.push(absolute_in(working_directory, Path::new("")));
        Self {
            indexed_paths: indexed_paths
                .iter()
                .map(|p| absolute_in(working_directory, p))
                .collect(),
            exclude_filters,
            search_dirs,
        }
    }

    /// The file `include` names, looked up the way a compiler does.
    pub fn resolve(&self, include: &Include, including_dir: &Path) -> Option<PathBuf> {
        let local = include.quoted.then_some(including_dir);
        local
            .into_iter()
            .chain(self.search_dirs.iter().map(PathBuf::as_path))
            .map(|dir| absolute_in(dir, Path::new(&include.target)))
            .find(|candidate| candidate.is_file())
    }

    pub fn admits(&self, header: &Path) -> bool {
        self.indexed_paths.iter().any(|p| header.starts_with(p))
            && !self.exclude_filters.iter().any(|f| f.is_matching(header))
    }
}

/// Relative filters are taken relative to the working directory, except
/// those starting with a wildcard, which already match anywhere.
fn anchored(working_directory: &Path, pattern: &str) -> String {
    let pattern = pattern.trim();
    if pattern.is_empty() || pattern.starts_with('*') || Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        working_directory.join(pattern).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::parser::utils::{new_parser, parse_text};

    fn directives(source: &str) -> Vec<Include> {
        let language: tree_sitter::Language = tree_sitter_cpp::LANGUAGE.into();
        let mut parser = new_parser(&language).expect("cpp grammar loads");
        let tree = parse_text(&mut parser, source).expect("parses");
        include_directives(tree.root_node(), source)
    }

    #[test]
    fn quoted_and_system_includes_are_told_apart() {
        let found = directives("#include \"shape.h\"\n#include <vector>\n");
        assert_eq!(
            found,
            vec![
                Include { target: "shape.h".into(), quoted: true },
                Include { target: "vector".into(), quoted: false },
            ]
        );
    }

    #[test]
    fn includes_inside_guards_are_found() {
        let found = directives("#ifndef A_H\n#define A_H\n#include \"b.h\"\n#endif\n");
        assert_eq!(found, vec![Include { target: "b.h".into(), quoted: true }]);
    }

    #[test]
    fn only_indexed_and_unexcluded_headers_are_admitted() {
        let scope = IncludeScope::new(
            Path::new("/work"),
            &[PathBuf::from("src")],
            &["src/generated/**".to_string(), "".to_string(), "**/*.inc".to_string()],
            &[],
        );
        assert!(scope.admits(Path::new("/work/src/shape.h")));
        assert!(!scope.admits(Path::new("/work/src/generated/table.h")));
        assert!(!scope.admits(Path::new("/work/src/tables.inc")));
        assert!(!scope.admits(Path::new("/usr/include/stdio.h")));
    }
}
