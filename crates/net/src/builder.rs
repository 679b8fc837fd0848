//! Network construction from an edge list and CPT blocks.
//!
//! The two inputs are authored independently, so the builder reconciles them:
//!
//! 1. CPT blocks fix the variables, their domains, tables and the parent
//!    order each table was written in.
//! 2. Edges are applied on top. An edge may only name declared variables.
//! 3. Every variable that declared `Parents:` gets exactly that parent order,
//!    whatever order the edges produced, and each declared parent lists the
//!    variable as a child.
//! 4. Parent and child lists are deduplicated.
//! 5. Variables are reordered topologically; a cycle is fatal.
//!
//! The declared order wins because CPT signatures are composed in parent
//! order and must match the text of the table rows.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::NetError;
use crate::network::Network;
use crate::node::{CptKey, Node};
use crate::parse::{parse_cpts, parse_edges, CptBlock, EdgeDecl};

/// Parsed inputs, ready to be reconciled into a [`Network`].
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    blocks: Vec<CptBlock>,
    edges: Vec<EdgeDecl>,
}

impl NetworkBuilder {
    /// Parse both inputs from text. The CPT text is parsed first.
    pub fn from_sources(edges: &str, cpts: &str) -> Result<Self, NetError> {
        let blocks = parse_cpts(cpts)?;
        let edges = parse_edges(edges)?;
        Ok(Self { blocks, edges })
    }

    /// Read and parse both inputs from files.
    pub fn from_paths(edges: impl AsRef<Path>, cpts: impl AsRef<Path>) -> Result<Self, NetError> {
        let cpts = read(cpts.as_ref())?;
        let edges = read(edges.as_ref())?;
        Self::from_sources(&edges, &cpts)
    }

    /// Number of CPT blocks parsed.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of edge lines parsed.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Reconcile the inputs into a network.
    pub fn build(self) -> Result<Network, NetError> {
        let mut net = Network::new();
        let mut declared: Vec<(String, Vec<String>)> = Vec::new();

        for block in self.blocks {
            let mut node = Node::new(block.name, block.domain);
            for row in block.rows {
                node.cpt.insert(CptKey::new(row.signature, row.value), row.probability);
            }
            if !block.parents.is_empty() {
                declared.push((node.name.clone(), block.parents));
            }

            let name = node.name.clone();
            if !net.insert(node) {
                return Err(NetError::MalformedBlock {
                    line: block.line,
                    reason: format!("second block for '{}'", name),
                });
            }
        }

        for edge in &self.edges {
            for name in [&edge.parent, &edge.child] {
                if !net.contains(name) {
                    return Err(NetError::UnknownNode {
                        name: name.clone(),
                        referenced_by: format!(
                            "edge '{} {}' on line {}",
                            edge.parent, edge.child, edge.line
                        ),
                    });
                }
            }
            net.add_edge(&edge.parent, &edge.child)?;
        }

        for (name, parents) in declared {
            reconcile_parents(&mut net, &name, parents)?;
        }

        net.dedup_relations();
        net.sort_topologically()?;

        for issue in net.cpt_issues() {
            warn!(%issue, "CPT rows do not sum to one");
        }
        debug!(
            variables = net.len(),
            edges = self.edges.len(),
            order = ?net.variables(),
            "Built network"
        );
        Ok(net)
    }
}

/// Replace the parents of `name` with the declared order and repair the
/// matching child entries.
fn reconcile_parents(net: &mut Network, name: &str, parents: Vec<String>) -> Result<(), NetError> {
    for parent in &parents {
        if !net.contains(parent) {
            return Err(NetError::UnknownNode {
                name: parent.clone(),
                referenced_by: format!("'Parents:' of '{}'", name),
            });
        }
    }

    if let Some(node) = net.node_mut(name) {
        if node.parents != parents {
            debug!(node = name, from = ?node.parents, to = ?parents, "Using declared parent order");
        }
        // The dropped parent keeps `name` among its children.
        for dropped in node.parents.iter().filter(|p| !parents.contains(*p)) {
            debug!(
                node = name,
                parent = %dropped,
                "Edge parent missing from 'Parents:', dropped"
            );
        }
        node.parents = parents.clone();
    }

    for parent in &parents {
        if let Some(p) = net.node_mut(parent) {
            if !p.children.iter().any(|c| c == name) {
                p.children.push(name.to_string());
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, NetError> {
    fs::read_to_string(path).map_err(|e| NetError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Build a network from edge-list text and CPT text.
///
/// ```rust
/// use bayes_net::build_network;
///
/// let net = build_network(
///     "Rain Wet\n",
///     "Node: Rain\nValues: yes,no\nyes 0.3\nno 0.7\n\
///      Node: Wet\nValues: yes,no\nParents: Rain\n\
///      Rain=yes yes 0.9\nRain=yes no 0.1\nRain=no yes 0.1\nRain=no no 0.9\n",
/// )
/// .unwrap();
/// assert_eq!(net.variables(), vec!["Rain", "Wet"]);
/// ```
pub fn build_network(edges: &str, cpts: &str) -> Result<Network, NetError> {
    NetworkBuilder::from_sources(edges, cpts)?.build()
}

/// Read both files and build a network from them.
pub fn load_network(edges: impl AsRef<Path>, cpts: impl AsRef<Path>) -> Result<Network, NetError> {
    NetworkBuilder::from_paths(edges, cpts)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPTS: &str = "\
Node: A
Values: t,f
t 0.6
f 0.4

Node: B
Values: t,f
t 0.2
f 0.8

Node: C
Values: t,f
Parents: A,B
A=t B=t t 0.9
A=t B=t f 0.1
A=t B=f t 0.7
A=t B=f f 0.3
A=f B=t t 0.4
A=f B=t f 0.6
A=f B=f t 0.05
A=f B=f f 0.95
";

    #[test]
    fn test_declared_parent_order_wins() {
        let net = build_network("B C\nA C\n", CPTS).unwrap();
        assert_eq!(net.node("C").unwrap().parents, vec!["A", "B"]);
    }

    #[test]
    fn test_declared_parents_repair_missing_edges() {
        let net = build_network("A C\n", CPTS).unwrap();
        let c = net.node("C").unwrap();
        assert_eq!(c.parents, vec!["A", "B"]);
        assert_eq!(net.node("B").unwrap().children, vec!["C"]);
        assert_eq!(net.node("A").unwrap().children, vec!["C"]);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let net = build_network("A C\nA C\nB C\n", CPTS).unwrap();
        assert_eq!(net.node("A").unwrap().children, vec!["C"]);
        assert_eq!(net.node("C").unwrap().parents, vec!["A", "B"]);
    }

    #[test]
    fn test_undeclared_edge_parent_is_dropped() {
        let cpts = format!("Node: X\nValues: t,f\nt 0.5\nf 0.5\n{}", CPTS);
        let net = build_network("X C\nA C\n", &cpts).unwrap();
        assert_eq!(net.node("C").unwrap().parents, vec!["A", "B"]);
        assert_eq!(net.node("X").unwrap().children, vec!["C"]);

        let d = crate::enumeration_ask("C", &crate::parse_evidence("A=t,B=f").unwrap(), &net)
            .unwrap();
        assert!((d.get("t").unwrap() - 0.7).abs() < crate::PROB_TOLERANCE);
    }

    #[test]
    fn test_edges_alone_define_undeclared_parents() {
        let cpts = "Node: X\nValues: a,b\na 0.5\nb 0.5\nNode: Y\nValues: a,b\nX=a a 1.0\n";
        let net = build_network("X Y\n", cpts).unwrap();
        assert_eq!(net.node("Y").unwrap().parents, vec!["X"]);
        assert_eq!(net.node("X").unwrap().children, vec!["Y"]);
    }

    #[test]
    fn test_unknown_node_in_edge() {
        let err = build_network("A D\n", CPTS).unwrap_err();
        match err {
            NetError::UnknownNode {
                name,
                referenced_by,
            } => {
                assert_eq!(name, "D");
                assert!(referenced_by.contains("line 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_declared_parent() {
        let cpts = "Node: A\nValues: t,f\nParents: Z\nZ=t t 1.0\n";
        let err = build_network("", cpts).unwrap_err();
        assert!(matches!(err, NetError::UnknownNode { ref name, .. } if name == "Z"));
    }

    #[test]
    fn test_duplicate_block() {
        let cpts = "Node: A\nValues: t,f\nt 1.0\nNode: A\nValues: t,f\nt 1.0\n";
        let err = build_network("", cpts).unwrap_err();
        assert!(matches!(err, NetError::MalformedBlock { line: 4, .. }));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let cpts = "Node: A\nValues: t\nParents: B\nB=t t 1\nNode: B\nValues: t\nParents: A\nA=t t 1\n";
        let err = build_network("", cpts).unwrap_err();
        assert!(matches!(err, NetError::Cycle { .. }));
    }

    #[test]
    fn test_blocks_out_of_order_are_sorted() {
        let cpts = "\
Node: Wet
Values: yes,no
Parents: Rain
Rain=yes yes 0.9
Rain=yes no 0.1
Rain=no yes 0.1
Rain=no no 0.9
Node: Rain
Values: yes,no
yes 0.3
no 0.7
";
        let net = build_network("Rain Wet\n", cpts).unwrap();
        assert_eq!(net.variables(), vec!["Rain", "Wet"]);
    }

    #[test]
    fn test_builder_counts() {
        let builder = NetworkBuilder::from_sources("A C\nB C\n", CPTS).unwrap();
        assert_eq!(builder.block_count(), 3);
        assert_eq!(builder.edge_count(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_network("/nonexistent/edges.txt", "/nonexistent/cpts.txt").unwrap_err();
        assert!(matches!(err, NetError::Io { .. }));
    }
}
