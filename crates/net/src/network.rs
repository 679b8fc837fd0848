//! Bayesian networks as an ordered collection of named nodes.
//!
//! The network keeps its nodes in insertion order. Inference walks the nodes
//! in that order, so it must be topological: every parent before its
//! children. [`Network::sort_topologically`] establishes that order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use crate::error::NetError;
use crate::evidence::Evidence;
use crate::node::Node;

/// A discrete Bayesian network.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Network {
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable. An existing name is left untouched.
    pub fn add_node(&mut self, name: impl Into<String>, domain: Vec<String>) {
        self.insert(Node::new(name, domain));
    }

    /// Add a fully formed node. Returns `false` (and drops `node`) if the
    /// name is already taken.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.name) {
            return false;
        }
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Connect `parent -> child`, without duplicating either relation.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<(), NetError> {
        let (p, c) = match (self.index.get(parent), self.index.get(child)) {
            (Some(&p), Some(&c)) => (p, c),
            (p, _) => {
                let missing = if p.is_none() { parent } else { child };
                return Err(NetError::UnknownNode {
                    name: missing.to_string(),
                    referenced_by: format!("edge {} -> {}", parent, child),
                });
            }
        };

        push_unique(&mut self.nodes[p].children, child);
        push_unique(&mut self.nodes[c].parents, parent);
        Ok(())
    }

    /// Variable names in insertion order.
    pub fn variables(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// P(name = value | evidence).
    pub fn probability(
        &self,
        name: &str,
        value: &str,
        evidence: &Evidence,
    ) -> Result<f64, NetError> {
        self.lookup(name)?.probability_of(value, evidence)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// Like [`Network::node`], but a missing name is a [`NetError::VariableNotFound`].
    pub fn lookup(&self, name: &str) -> Result<&Node, NetError> {
        self.node(name).ok_or_else(|| NetError::VariableNotFound {
            name: name.to_string(),
        })
    }

    pub(crate) fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.index.get(name).map(|&i| &mut self.nodes[i])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove repeated entries from every parent and child list, keeping
    /// the first occurrence.
    pub fn dedup_relations(&mut self) {
        for node in &mut self.nodes {
            dedup_in_order(&mut node.parents);
            dedup_in_order(&mut node.children);
        }
    }

    /// Directed graph with one edge per (parent, child) relation.
    ///
    /// Graph indices coincide with insertion positions.
    fn dependency_graph(&self) -> Result<DiGraph<usize, ()>, NetError> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len());
        for i in 0..self.nodes.len() {
            graph.add_node(i);
        }

        for (c, node) in self.nodes.iter().enumerate() {
            for parent in &node.parents {
                let p = *self.index.get(parent).ok_or_else(|| NetError::UnknownNode {
                    name: parent.clone(),
                    referenced_by: format!("parents of '{}'", node.name),
                })?;
                graph.update_edge(NodeIndex::new(p), NodeIndex::new(c), ());
            }
        }
        Ok(graph)
    }

    /// A topological order of the variable names.
    ///
    /// Stable: among the variables whose parents are all placed, the one
    /// inserted first comes next, so an already ordered network keeps its
    /// order.
    pub fn topological_order(&self) -> Result<Vec<&str>, NetError> {
        Ok(self
            .topological_positions()?
            .into_iter()
            .map(|i| self.nodes[i].name.as_str())
            .collect())
    }

    fn topological_positions(&self) -> Result<Vec<usize>, NetError> {
        let graph = self.dependency_graph()?;

        if let Err(cycle) = toposort(&graph, None) {
            return Err(NetError::Cycle {
                node: self.nodes[graph[cycle.node_id()]].name.clone(),
            });
        }

        let mut in_degree: Vec<usize> = graph
            .node_indices()
            .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for child in graph.neighbors_directed(NodeIndex::new(i), Direction::Outgoing) {
                let c = child.index();
                in_degree[c] -= 1;
                if in_degree[c] == 0 {
                    ready.push(Reverse(c));
                }
            }
        }
        Ok(order)
    }

    /// Reorder the nodes so that [`Network::variables`] is topological.
    pub fn sort_topologically(&mut self) -> Result<(), NetError> {
        let order = self.topological_positions()?;
        let mut slots: Vec<Option<Node>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();

        self.nodes = order.into_iter().filter_map(|i| slots[i].take()).collect();
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.clone(), i))
            .collect();
        Ok(())
    }

    /// Every CPT signature whose masses do not sum to one.
    pub fn cpt_issues(&self) -> Vec<NetError> {
        self.nodes
            .iter()
            .flat_map(|n| n.normalization_issues())
            .collect()
    }

    /// Fail with the first non-normalized CPT signature, if any.
    pub fn validate_cpts(&self) -> Result<(), NetError> {
        match self.cpt_issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn dedup_in_order(list: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(list.len());
    list.retain(|name| {
        if seen.contains(name) {
            false
        } else {
            seen.push(name.clone());
            true
        }
    });
}
