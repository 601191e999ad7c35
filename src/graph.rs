//! Cycle-tolerant dependency ordering over a [`Pool`].
//!
//! Nodes name their requirements; a requirement that is not in the pool is
//! a dangling reference and a requirement chain that returns to a node
//! still being expanded is a cycle. Neither aborts a traversal. Both
//! operations return a [`Resolution`] holding the resulting pool plus the
//! [`Diagnostic`]s found on the way, and the caller decides how loudly to
//! report them.
//!
//! # Sort
//!
//! Depth-first, post-order, in pool order. A node is emitted once all of its
//! resolvable requirements are emitted. A requirement that is currently on
//! the expansion stack closes a cycle: the cycle path is recorded and the
//! edge is skipped. The result is a topological order on the acyclic part of
//! the graph and a deterministic, cycle-broken order otherwise.
//!
//! # Filter
//!
//! Transitive closure from seed names, returned in original pool order, with
//! the same on-stack guard as sort. Missing names are reported once each.
//!
//! ```rust
//! use bemaker::graph::{DependencyGraph, Diagnostic, SimpleNode};
//! use bemaker::pool::Pool;
//!
//! let pool = Pool::from_items([
//!     SimpleNode::new("a", ["b"]),
//!     SimpleNode::new("b", ["a"]),
//! ])
//! .unwrap();
//!
//! let sorted = DependencyGraph::new(&pool).sort();
//! assert_eq!(sorted.pool.names(), vec!["b", "a"]);
//! assert_eq!(
//!     sorted.diagnostics,
//!     vec![Diagnostic::Cycle { path: vec!["a".into(), "b".into(), "a".into()] }]
//! );
//! ```

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

use crate::pool::{Named, Pool};

/// A named record that declares requirements on other records by name
pub trait Node: Named {
    /// Names this node requires, in declaration order
    fn requires(&self) -> &[String];
}

/// A non-fatal finding reported by a graph traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A requirement chain returned to a node that was still being expanded
    ///
    /// The path starts and ends with the same name: `[a, e, d, a]`.
    Cycle {
        /// Names along the cycle
        path: Vec<String>,
    },

    /// A requirement names a node that is not in the pool
    Missing {
        /// The node holding the requirement; `None` for a seed name given
        /// directly to [`DependencyGraph::filter`]
        consumer: Option<String>,
        /// The missing name
        name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Cycle {
                path,
            } => write!(f, "Circular dependency: {}", path.join(" → ")),
            Diagnostic::Missing {
                consumer: Some(consumer),
                name,
            } => write!(f, "Missing dependency '{name}' required by '{consumer}'"),
            Diagnostic::Missing {
                consumer: None,
                name,
            } => write!(f, "Requested block '{name}' does not exist"),
        }
    }
}

/// Output of a graph operation
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// The resulting records
    pub pool: Pool<T>,
    /// Findings in the order they were encountered
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Resolution<T> {
    /// Cycle paths among the diagnostics
    pub fn cycles(&self) -> impl Iterator<Item = &[String]> {
        self.diagnostics.iter().filter_map(|diagnostic| match diagnostic {
            Diagnostic::Cycle {
                path,
            } => Some(path.as_slice()),
            Diagnostic::Missing {
                ..
            } => None,
        })
    }

    /// Missing names among the diagnostics
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|diagnostic| match diagnostic {
            Diagnostic::Missing {
                name,
                ..
            } => Some(name.as_str()),
            Diagnostic::Cycle {
                ..
            } => None,
        })
    }
}

/// Read-only graph view over a pool of [`Node`]s
pub struct DependencyGraph<'a, T> {
    pool: &'a Pool<T>,
    index: HashMap<&'a str, usize>,
}

impl<'a, T: Node + Clone> DependencyGraph<'a, T> {
    /// Index the pool by name
    pub fn new(pool: &'a Pool<T>) -> Self {
        let index = pool.iter().enumerate().map(|(position, node)| (node.name(), position)).collect();
        Self {
            pool,
            index,
        }
    }

    /// Order nodes so that resolvable requirements precede their dependents
    pub fn sort(&self) -> Resolution<T> {
        let mut state = Walk::new(self.pool.len());

        for position in 0..self.pool.len() {
            if !state.finished[position] {
                self.visit(position, &mut state);
            }
        }

        let nodes = state.order.iter().map(|&position| self.node(position).clone()).collect();
        Resolution {
            pool: Pool::from_unique(nodes),
            diagnostics: state.diagnostics,
        }
    }

    /// Seeds plus everything they transitively require, in pool order
    pub fn filter<'n>(&self, seeds: impl IntoIterator<Item = &'n str>) -> Resolution<T> {
        let mut state = Walk::new(self.pool.len());
        let mut reported_missing = HashSet::new();

        for seed in seeds {
            match self.index.get(seed) {
                Some(&position) if !state.finished[position] => {
                    self.expand(position, &mut state, &mut reported_missing);
                }
                Some(_) => {}
                None => {
                    if reported_missing.insert(seed.to_string()) {
                        state.diagnostics.push(Diagnostic::Missing {
                            consumer: None,
                            name: seed.to_string(),
                        });
                    }
                }
            }
        }

        let nodes = self
            .pool
            .iter()
            .enumerate()
            .filter(|(position, _)| state.finished[*position])
            .map(|(_, node)| node.clone())
            .collect();
        Resolution {
            pool: Pool::from_unique(nodes),
            diagnostics: state.diagnostics,
        }
    }

    fn node(&self, position: usize) -> &'a T {
        &self.pool.all()[position]
    }

    fn visit(&self, position: usize, state: &mut Walk) {
        let node = self.node(position);
        state.enter(position);

        for required in node.requires() {
            let Some(&target) = self.index.get(required.as_str()) else {
                trace!("{} requires unknown '{}', ignored for ordering", node.name(), required);
                continue;
            };
            if state.finished[target] {
                continue;
            }
            if state.on_stack[target] {
                state.record_cycle(target, |p| self.node(p).name());
                continue;
            }
            self.visit(target, state);
        }

        if !state.finished[position] {
            state.finished[position] = true;
            state.order.push(position);
        }
        state.leave(position);
    }

    fn expand(&self, position: usize, state: &mut Walk, reported_missing: &mut HashSet<String>) {
        let node = self.node(position);
        state.finished[position] = true;
        state.enter(position);

        for required in node.requires() {
            match self.index.get(required.as_str()) {
                None => {
                    if reported_missing.insert(required.clone()) {
                        state.diagnostics.push(Diagnostic::Missing {
                            consumer: Some(node.name().to_string()),
                            name: required.clone(),
                        });
                    }
                }
                Some(&target) if state.on_stack[target] => {
                    state.record_cycle(target, |p| self.node(p).name());
                }
                Some(&target) if state.finished[target] => {}
                Some(&target) => self.expand(target, state, reported_missing),
            }
        }

        state.leave(position);
    }
}

/// Mutable state of one traversal
struct Walk {
    finished: Vec<bool>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    order: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
    reported_cycles: HashSet<Vec<usize>>,
}

impl Walk {
    fn new(len: usize) -> Self {
        Self {
            finished: vec![false; len],
            on_stack: vec![false; len],
            stack: Vec::new(),
            order: Vec::with_capacity(len),
            diagnostics: Vec::new(),
            reported_cycles: HashSet::new(),
        }
    }

    fn enter(&mut self, position: usize) {
        self.stack.push(position);
        self.on_stack[position] = true;
    }

    fn leave(&mut self, position: usize) {
        self.stack.pop();
        self.on_stack[position] = false;
    }

    /// Record the stack slice from `target` to the top, closed by `target`
    fn record_cycle<'n>(&mut self, target: usize, name_of: impl Fn(usize) -> &'n str) {
        let Some(start) = self.stack.iter().position(|&p| p == target) else {
            return;
        };
        let mut positions = self.stack[start..].to_vec();
        positions.push(target);

        if self.reported_cycles.insert(positions.clone()) {
            let path = positions.into_iter().map(|p| name_of(p).to_string()).collect();
            self.diagnostics.push(Diagnostic::Cycle {
                path,
            });
        }
    }
}

/// Minimal [`Node`] for callers that only have names and requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleNode {
    /// Node name
    pub name: String,
    /// Required names
    pub requires: Vec<String>,
}

impl SimpleNode {
    /// Create a node from a name and its requirements
    pub fn new<I, S>(name: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
        }
    }
}

impl Named for SimpleNode {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Node for SimpleNode {
    fn requires(&self) -> &[String] {
        &self.requires
    }
}
