//! Depth-first search for import paths that end at pattern matches.

use impath_core::graph::{ImportGraph, NodeId};
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// One route from a root to a matching package, root first, match last.
pub type Branch = Vec<NodeId>;

/// A branch together with the module its root package belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootedBranch {
    pub module: Option<String>,
    pub branch: Branch,
}

/// Counters collected over one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes whose imports were iterated.
    pub expanded: usize,
    /// Visits answered from the exhausted set.
    pub memo_hits: usize,
    /// Visits to a node that was still on the stack.
    pub cycle_cuts: usize,
    /// Visits that hit a matching node.
    pub matches: usize,
}

/// Mutable state for one search: the exhausted set and the current stack.
#[derive(Debug, Default)]
pub struct WalkContext {
    exhausted: HashSet<NodeId>,
    /// Nodes under expansion, mapped to their stack depth.
    active: HashMap<NodeId, usize>,
    stats: WalkStats,
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `node` has been fully explored and reaches no match.
    pub fn is_exhausted(&self, node: NodeId) -> bool {
        self.exhausted.contains(&node)
    }

    pub fn exhausted_count(&self) -> usize {
        self.exhausted.len()
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }
}

/// Result of visiting one node.
struct Visit {
    branches: Vec<Branch>,
    /// Shallowest stack depth a cycle was cut at below this node, if any.
    /// While set, an empty result is path dependent and must not be memoized.
    cut: Option<usize>,
}

impl Visit {
    fn empty(cut: Option<usize>) -> Self {
        Self {
            branches: Vec::new(),
            cut,
        }
    }
}

/// Find every branch from `node` to a package whose path matches `pattern`.
///
/// A match ends its branch: nothing below a matching package is explored.
/// Imports are followed in lexicographic order of their names, so the result
/// order is stable across runs.
pub fn find_branches(
    graph: &ImportGraph,
    node: NodeId,
    pattern: &Regex,
    ctx: &mut WalkContext,
) -> Vec<Branch> {
    let mut branches = visit(graph, node, pattern, ctx).branches;
    // Branches are built leaf first while the recursion unwinds.
    for branch in &mut branches {
        branch.reverse();
    }
    branches
}

fn visit(graph: &ImportGraph, node: NodeId, pattern: &Regex, ctx: &mut WalkContext) -> Visit {
    if ctx.exhausted.contains(&node) {
        ctx.stats.memo_hits += 1;
        return Visit::empty(None);
    }
    if let Some(&depth) = ctx.active.get(&node) {
        ctx.stats.cycle_cuts += 1;
        return Visit::empty(Some(depth));
    }

    let pkg = &graph[node];
    if pattern.is_match(&pkg.path) {
        ctx.stats.matches += 1;
        return Visit {
            branches: vec![vec![node]],
            cut: None,
        };
    }

    ctx.stats.expanded += 1;
    let depth = ctx.active.len();
    ctx.active.insert(node, depth);

    let mut branches = Vec::new();
    let mut cut: Option<usize> = None;
    for &target in pkg.imports.values() {
        let child = visit(graph, target, pattern, ctx);
        branches.extend(child.branches);
        cut = match (cut, child.cut) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    ctx.active.remove(&node);

    // Cuts back into this node are settled now that it is complete.
    let cut = cut.filter(|&d| d < depth);

    if branches.is_empty() {
        if cut.is_none() {
            ctx.exhausted.insert(node);
        }
    } else {
        for branch in &mut branches {
            branch.push(node);
        }
    }

    Visit { branches, cut }
}

/// Search from every root of `graph` with one shared context.
///
/// Each branch is tagged with its root's module so the merger can group
/// roots under a module heading.
pub fn find_all(graph: &ImportGraph, pattern: &Regex, ctx: &mut WalkContext) -> Vec<RootedBranch> {
    let mut all = Vec::new();
    for &root in graph.roots() {
        let branches = find_branches(graph, root, pattern, ctx);
        if branches.is_empty() {
            tracing::debug!(root = %graph[root].id, "no matching imports");
            continue;
        }
        let module = graph[root].module.clone();
        all.extend(branches.into_iter().map(|branch| RootedBranch {
            module: module.clone(),
            branch,
        }));
    }

    let stats = ctx.stats();
    tracing::debug!(
        branches = all.len(),
        expanded = stats.expanded,
        memo_hits = stats.memo_hits,
        cycle_cuts = stats.cycle_cuts,
        matches = stats.matches,
        "import search finished"
    );
    all
}
