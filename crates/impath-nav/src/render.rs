//! Text and JSON rendering of a merged forest.

use crate::merge::{Anchor, Forest, TreeNode};
use console::Style;
use impath_core::graph::ImportGraph;
use serde::Serialize;
use std::io::{self, Write};

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Highlight terminal (matched) packages with ANSI color.
    pub color: bool,
}

/// Render every tree of `forest`, one label per line.
///
/// ```text
/// example.com
/// └── example.com/app
///     ├── example.com/app/db
///     │   └── github.com/lib/pq
///     └── github.com/lib/pq
/// ```
pub fn render(graph: &ImportGraph, forest: &Forest, options: &RenderOptions) -> String {
    let terminal = Style::new().red().force_styling(options.color);
    let mut output = String::new();
    for root in &forest.roots {
        push_label(&mut output, graph, root, &terminal);
        render_children(&mut output, graph, root, "", &terminal);
    }
    output
}

/// Render `forest` into a single output stream.
pub fn write_forest<W: Write>(
    out: &mut W,
    graph: &ImportGraph,
    forest: &Forest,
    options: &RenderOptions,
) -> io::Result<()> {
    out.write_all(render(graph, forest, options).as_bytes())?;
    out.flush()
}

fn push_label(output: &mut String, graph: &ImportGraph, node: &TreeNode, terminal: &Style) {
    let label = node.anchor.label(graph);
    if node.is_terminal() {
        output.push_str(&terminal.apply_to(label).to_string());
    } else {
        output.push_str(label);
    }
    output.push('\n');
}

fn render_children(
    output: &mut String,
    graph: &ImportGraph,
    node: &TreeNode,
    prefix: &str,
    terminal: &Style,
) {
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == child_count;
        let (connector, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        output.push_str(prefix);
        output.push_str(connector);
        push_label(output, graph, child, terminal);
        render_children(
            output,
            graph,
            child,
            &format!("{}{}", prefix, continuation),
            terminal,
        );
    }
}

/// JSON shape of one tree node.
#[derive(Debug, Serialize)]
pub struct JsonNode<'a> {
    pub path: &'a str,
    /// Loader id, present for packages (it differs from `path` for test variants).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub kind: &'static str,
    pub terminal: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode<'a>>,
}

impl<'a> JsonNode<'a> {
    pub fn new(graph: &'a ImportGraph, node: &'a TreeNode) -> Self {
        let (id, kind) = match &node.anchor {
            Anchor::Module(_) => (None, "module"),
            Anchor::Package(n) => (Some(graph[*n].id.as_str()), "package"),
        };
        Self {
            path: node.anchor.label(graph),
            id,
            kind,
            terminal: node.is_terminal(),
            children: node
                .children
                .iter()
                .map(|c| JsonNode::new(graph, c))
                .collect(),
        }
    }
}

/// Render `forest` as a pretty-printed JSON array of trees.
pub fn render_json(graph: &ImportGraph, forest: &Forest) -> serde_json::Result<String> {
    let trees: Vec<JsonNode<'_>> = forest
        .roots
        .iter()
        .map(|root| JsonNode::new(graph, root))
        .collect();
    let mut json = serde_json::to_string_pretty(&trees)?;
    json.push('\n');
    Ok(json)
}
