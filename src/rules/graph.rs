//! Co-run rule graph and circular dependency detection.
//!
//! Each co-run rule links every listed task to every other listed task, so a
//! rule over N tasks contributes a directed clique of N·(N-1) edges. Cycles
//! are found by depth-first search over that graph.
//!
//! # Ordering
//! Nodes are visited in first-insertion order and neighbors in the order
//! their edges were added, so the output is deterministic for a given rule
//! order but changes when rules are reordered.
//!
//! # Precision
//! A node that has been fully explored is never entered again. A task taking
//! part in several cycles therefore only reports those reachable on first
//! arrival; the report answers "is there a cycle", not "list every cycle".
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (Depth-First Search)

use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::models::{CoRunRule, Cycle};

/// Directed adjacency built from co-run rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleGraph {
    adjacency: IndexMap<String, IndexSet<String>>,
}

impl RuleGraph {
    /// Builds the graph for a set of rules.
    ///
    /// For every rule, every task gets an edge to every other task of the
    /// same rule. A task listed twice in one rule gets no self edge.
    pub fn from_rules<'r, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'r CoRunRule>,
    {
        let mut adjacency: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for rule in rules {
            for task in &rule.tasks {
                let edges = adjacency.entry(task.clone()).or_default();
                for other in &rule.tasks {
                    if other != task {
                        edges.insert(other.clone());
                    }
                }
            }
        }
        Self { adjacency }
    }

    /// Task ids in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Outgoing neighbors of a task, in insertion order.
    pub fn neighbors<'g>(&'g self, task: &str) -> impl Iterator<Item = &'g str> {
        self.adjacency
            .get(task)
            .into_iter()
            .flat_map(|edges| edges.iter().map(String::as_str))
    }

    /// Whether the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.adjacency.get(from).is_some_and(|e| e.contains(to))
    }

    /// Number of tasks.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    /// Detects cycles using DFS.
    ///
    /// # Algorithm
    /// DFS from every unvisited node. Reaching a neighbor that is still on
    /// the DFS stack records the current path from that neighbor to
    /// the end; reaching a finished neighbor records nothing.
    ///
    /// No filtering is applied: the mutual edge between two tasks of the same
    /// rule is reported as a two-task cycle.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut visited = HashSet::new();
        let mut in_stack = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for node in self.nodes() {
            if !visited.contains(node) {
                collect_cycles_dfs(node, self, &mut visited, &mut in_stack, &mut path, &mut cycles);
            }
        }

        debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            cycles = cycles.len(),
            "co-run cycle scan"
        );
        cycles
    }

    /// Cycles whose tasks no single rule contains.
    ///
    /// # Algorithm
    /// Every cycle lies inside one biconnected component (block) of the
    /// undirected co-run graph, and any two tasks of a block lie on a common
    /// cycle. A cycle leaving every single rule therefore exists exactly when
    /// some block of three or more tasks is not inside one rule. One witness
    /// cycle is built per such block:
    /// - if two tasks `x` and `y` share a neighbor `m` but no rule, the
    ///   witness is `x, m, y` closed by a shortest path from `y` back to `x`
    ///   that avoids `m`;
    /// - otherwise the block is a clique and its tasks, in node order, form
    ///   the witness.
    ///
    /// Whether anything is reported depends on the rules, not on their
    /// order. Only the witness tasks may change when rules are reordered.
    ///
    /// # Reference
    /// Hopcroft & Tarjan (1973), "Efficient algorithms for graph manipulation"
    pub fn spanning_cycles(&self, rules: &[CoRunRule]) -> Vec<Cycle> {
        let names: Vec<&str> = self.nodes().collect();
        let neighbors: Vec<Vec<usize>> = self
            .adjacency
            .values()
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|t| self.adjacency.get_index_of(t.as_str()))
                    .collect()
            })
            .collect();

        let mut cycles: Vec<Cycle> = Vec::new();
        for mut block in biconnected_blocks(&neighbors) {
            if block.len() < 3 {
                continue;
            }
            block.sort_unstable();
            let tasks: Vec<String> = block.iter().map(|&i| names[i].to_string()).collect();
            if rules.iter().any(|r| r.contains_all(&tasks)) {
                continue;
            }
            if let Some(witness) = block_witness(&block, &neighbors) {
                cycles.push(witness.into_iter().map(|i| names[i].to_string()).collect());
            }
        }

        debug!(
            nodes = self.node_count(),
            spanning = cycles.len(),
            "co-run spanning cycle scan"
        );
        cycles
    }
}

/// Vertex sets of the biconnected components, by node index.
///
/// Iterative Tarjan: each frame holds a node, its DFS parent and the next
/// neighbor position to try.
fn biconnected_blocks(neighbors: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNSEEN: usize = usize::MAX;
    let n = neighbors.len();
    let mut disc = vec![UNSEEN; n];
    let mut low = vec![0; n];
    let mut timer = 0;
    let mut stack: Vec<usize> = Vec::new();
    let mut blocks = Vec::new();

    for root in 0..n {
        if disc[root] != UNSEEN {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        stack.push(root);
        let mut frames = vec![(root, UNSEEN, 0usize)];

        while let Some(&(v, parent, next)) = frames.last() {
            if let Some(&w) = neighbors[v].get(next) {
                let top = frames.len() - 1;
                frames[top].2 += 1;
                if disc[w] == UNSEEN {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    stack.push(w);
                    frames.push((w, v, 0));
                } else if w != parent {
                    low[v] = low[v].min(disc[w]);
                }
                continue;
            }

            frames.pop();
            match frames.last() {
                Some(&(u, _, _)) => {
                    low[u] = low[u].min(low[v]);
                    if low[v] >= disc[u] {
                        let mut block = vec![u];
                        while let Some(x) = stack.pop() {
                            block.push(x);
                            if x == v {
                                break;
                            }
                        }
                        blocks.push(block);
                    }
                }
                None => {
                    // Only the root is left.
                    stack.pop();
                }
            }
        }
    }
    blocks
}

/// A simple cycle through a block of three or more tasks that no rule
/// covers. `block` must be sorted.
fn block_witness(block: &[usize], neighbors: &[Vec<usize>]) -> Option<Vec<usize>> {
    let members: HashSet<usize> = block.iter().copied().collect();
    let adjacent = |a: usize, b: usize| neighbors[a].contains(&b);

    for &m in block {
        let near: Vec<usize> = neighbors[m]
            .iter()
            .copied()
            .filter(|t| members.contains(t))
            .collect();
        for (i, &x) in near.iter().enumerate() {
            for &y in &near[i + 1..] {
                if adjacent(x, y) {
                    continue;
                }
                // x and y share no rule; close x, m, y through the block without m.
                let back = shortest_path(y, x, neighbors, |t| t != m && members.contains(&t))?;
                let mut cycle = vec![x, m];
                cycle.extend(&back[..back.len() - 1]);
                return Some(cycle);
            }
        }
    }

    // Every two tasks are adjacent: the block is a clique.
    Some(block.to_vec())
}

/// Breadth-first path `from ..= to` over nodes accepted by `allowed`.
fn shortest_path(
    from: usize,
    to: usize,
    neighbors: &[Vec<usize>],
    allowed: impl Fn(usize) -> bool,
) -> Option<Vec<usize>> {
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    parent.insert(from, from);

    while let Some(node) = queue.pop_front() {
        if node == to {
            let mut path = vec![to];
            let mut at = to;
            while at != from {
                at = parent[&at];
                path.push(at);
            }
            path.reverse();
            return Some(path);
        }
        for &next in &neighbors[node] {
            if allowed(next) && !parent.contains_key(&next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    None
}

fn collect_cycles_dfs<'a>(
    start: &'a str,
    graph: &'a RuleGraph,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Cycle>,
) {
    visited.insert(start);
    in_stack.insert(start);
    path.push(start);
    let mut frames = vec![(start, graph.neighbors(start))];

    while let Some((node, neighbors)) = frames.last_mut() {
        match neighbors.next() {
            Some(next) if in_stack.contains(next) => {
                // Back edge: the path from `next` onwards closes a loop.
                if let Some(from) = path.iter().rposition(|n| *n == next) {
                    cycles.push(path[from..].iter().map(|s| s.to_string()).collect());
                }
            }
            Some(next) if visited.contains(next) => {}
            Some(next) => {
                visited.insert(next);
                in_stack.insert(next);
                path.push(next);
                frames.push((next, graph.neighbors(next)));
            }
            None => {
                in_stack.remove(*node);
                path.pop();
                frames.pop();
            }
        }
    }
}

/// Detects circular co-run dependencies in a rule list.
///
/// Shorthand for building a [`RuleGraph`] and calling
/// [`find_cycles`](RuleGraph::find_cycles). Every returned cycle is
/// unfiltered; see [`CycleFilter`](crate::config::CycleFilter) for the
/// consumer-side policy.
pub fn detect_circular_co_run(rules: &[CoRunRule]) -> Vec<Cycle> {
    RuleGraph::from_rules(rules).find_cycles()
}
