//! `lore nav` command implementation.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use lore_config::{CliSettings, Config};
use lore_site::{ExpansionState, NavNode, StructureStore, WikiTree, navigation_html, render_navigation};
use lore_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover lore.toml).
    #[arg(short, long, env = "LORE_CONFIG")]
    config: Option<PathBuf>,

    /// Structure document (overrides config).
    #[arg(long)]
    structure_file: Option<PathBuf>,

    /// Expand a category path. May be repeated.
    #[arg(short, long = "expand", value_name = "PATH")]
    expand: Vec<String>,

    /// Expand every category.
    #[arg(long, conflicts_with = "expand")]
    all: bool,

    /// Print the navigation HTML instead of a text tree.
    #[arg(long)]
    html: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the structure document
    /// cannot be read or parsed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            structure_file: self.structure_file,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let wiki = &config.wiki_resolved;
        let storage = FsStorage::new(wiki.source_dir.clone(), wiki.structure_file.clone())
            .with_suffix(wiki.content_suffix.clone());
        let tree = StructureStore::read(&storage)?;
        tracing::debug!(
            structure_file = %wiki.structure_file.display(),
            categories = tree.category_count(),
            nodes = tree.len(),
            "Structure loaded"
        );

        let mut expansion = ExpansionState::new();
        if self.all {
            expand_all(&tree, &mut expansion);
        }
        for path in &self.expand {
            if tree.is_category(path) {
                expansion.set(path, true);
            } else {
                tracing::debug!(path = %path, "Ignoring --expand for non-category path");
                output.warning(&format!("Not a category: {path}"));
            }
        }

        let nodes = render_navigation(&tree, &expansion);
        let text = if self.html {
            navigation_html(&nodes)
        } else {
            format_tree(&nodes)
        };

        output.emit(&text)?;
        Ok(())
    }
}

fn expand_all(tree: &WikiTree, expansion: &mut ExpansionState) {
    for (_, node) in tree.iter() {
        if node.is_category() {
            expansion.set(node.path(), true);
        }
    }
}

/// Format visible nodes as an indented text tree.
fn format_tree(nodes: &[NavNode]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[NavNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            NavNode::Category {
                label,
                expanded,
                children,
                ..
            } => {
                let marker = if *expanded { 'v' } else { '>' };
                let _ = writeln!(out, "{indent}{marker} {label}");
                if *expanded {
                    write_nodes(out, children, depth + 1);
                }
            }
            NavNode::Item { label, .. } => {
                let _ = writeln!(out, "{indent}  {label}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const STRUCTURE: &str = r#"{
        "Skills": {"items": ["Mining", "Fishing"]},
        "Items": {"subcategories": {"Resources": {"items": ["Troll Leather"]}}}
    }"#;

    #[test]
    fn test_format_tree_collapsed() {
        let tree = WikiTree::from_json(STRUCTURE).unwrap();

        let text = format_tree(&render_navigation(&tree, &ExpansionState::new()));

        assert_eq!(text, "> Skills\n> Items\n");
    }

    #[test]
    fn test_format_tree_expanded_category() {
        let tree = WikiTree::from_json(STRUCTURE).unwrap();
        let mut expansion = ExpansionState::new();
        expansion.set("Skills", true);

        let text = format_tree(&render_navigation(&tree, &expansion));

        assert_eq!(text, "v Skills\n    Mining\n    Fishing\n> Items\n");
    }

    #[test]
    fn test_expand_all() {
        let tree = WikiTree::from_json(STRUCTURE).unwrap();
        let mut expansion = ExpansionState::new();

        expand_all(&tree, &mut expansion);

        assert_eq!(
            format_tree(&render_navigation(&tree, &expansion)),
            "v Skills\n    Mining\n    Fishing\nv Items\n  v Resources\n      Troll Leather\n"
        );
    }
}
