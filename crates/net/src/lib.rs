//! # Bayes Net - Exact Inference over Discrete Bayesian Networks
//!
//! This crate answers queries of the form P(X | e) over a network of discrete
//! random variables, each with a conditional probability table (CPT).
//!
//! ## Core Concepts
//!
//! - **Node**: a variable with a value domain, ordered parents, children and
//!   a CPT keyed by `(signature, value)` text
//! - **Network**: nodes by name, kept in topological order
//! - **Builder**: reconciles an edge list with CPT blocks; the parent order
//!   declared next to a table always wins over the edge list
//! - **Enumeration**: exact inference by summing the joint over every
//!   unobserved variable, then normalizing
//!
//! ## Example: Rain and Wet Grass
//!
//! ```rust
//! use bayes_net::{build_network, enumeration_ask, parse_evidence};
//!
//! let edges = "Rain Wet\n";
//! let cpts = "\
//! Node: Rain
//! Values: yes,no
//! yes 0.3
//! no 0.7
//! Node: Wet
//! Values: yes,no
//! Parents: Rain
//! Rain=yes yes 0.9
//! Rain=yes no 0.1
//! Rain=no yes 0.1
//! Rain=no no 0.9
//! ";
//!
//! let net = build_network(edges, cpts).unwrap();
//! let posterior = enumeration_ask("Rain", &parse_evidence("Wet=yes").unwrap(), &net).unwrap();
//!
//! // Bayes' rule: 0.3 * 0.9 / (0.3 * 0.9 + 0.7 * 0.1)
//! assert!((posterior.get("yes").unwrap() - 0.7941).abs() < 1e-4);
//! ```

mod builder;
mod distribution;
mod error;
mod evidence;
mod inference;
mod network;
mod node;
pub mod parse;
pub mod samples;

pub use builder::{build_network, load_network, NetworkBuilder};
pub use distribution::Distribution;
pub use error::NetError;
pub use evidence::{format_evidence, parse_evidence, parse_evidence_item, Evidence};
pub use inference::{enumerate_all, enumeration_ask, Enumeration};
pub use network::Network;
pub use node::{Cpt, CptKey, Node, NO_PARENTS};

/// Tolerance for probability comparisons.
pub const PROB_TOLERANCE: f64 = 1e-6;
