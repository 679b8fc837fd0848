//! Exact inference by enumeration.
//!
//! `enumeration_ask` computes P(X | e) by summing the full joint over every
//! unobserved variable:
//!
//! ```text
//! P(X=x | e) ∝ Σ_y  Π_i P(V_i | parents(V_i))   with X=x, e fixed
//! ```
//!
//! Variables are visited in the network's order, which must be topological:
//! a variable's parents are always bound by the time its CPT is consulted.
//! Cost is exponential in the number of unobserved variables, which is fine
//! for small networks only.

use tracing::{debug, trace};

use crate::distribution::Distribution;
use crate::error::NetError;
use crate::evidence::Evidence;
use crate::network::Network;

/// Enumeration-ask engine over a borrowed network.
///
/// The network is only read, so one network can serve any number of engines,
/// including from several threads.
#[derive(Debug, Clone, Copy)]
pub struct Enumeration<'a> {
    net: &'a Network,
    max_depth: Option<usize>,
}

impl<'a> Enumeration<'a> {
    /// Create an engine with no depth limit.
    pub fn new(net: &'a Network) -> Self {
        Self {
            net,
            max_depth: None,
        }
    }

    /// Refuse queries over networks with more than `depth` variables.
    ///
    /// Recursion depth equals the number of variables, so this bounds stack use.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn network(&self) -> &'a Network {
        self.net
    }

    /// P(query | evidence), normalized over the query variable's domain.
    pub fn ask(&self, query: &str, evidence: &Evidence) -> Result<Distribution, NetError> {
        let node = self.net.lookup(query)?;
        let vars = self.net.variables();
        self.check_depth(vars.len())?;

        let mut bound = evidence.clone();
        let mut weights = Vec::with_capacity(node.domain.len());
        for x in &node.domain {
            bound.insert(query.to_string(), x.clone());
            let weight = self.enumerate(&vars, &mut bound)?;
            trace!(query, value = %x, weight, "Enumerated candidate");
            weights.push((x.clone(), weight));
        }

        let dist = Distribution::normalize(query, weights);
        if dist.is_degenerate() {
            debug!(query, "Evidence has zero likelihood");
        }
        debug!(query, evidence = ?evidence, result = ?dist, "Answered query");
        Ok(dist)
    }

    /// Sum of the joint over all unbound variables in `vars`, with `evidence` fixed.
    pub fn enumerate_all(&self, vars: &[&str], evidence: &Evidence) -> Result<f64, NetError> {
        self.check_depth(vars.len())?;
        let mut bound = evidence.clone();
        self.enumerate(vars, &mut bound)
    }

    /// Binds each unobserved head value in `evidence` for the recursive call
    /// and unbinds it afterwards, leaving `evidence` as it was.
    fn enumerate(&self, vars: &[&str], evidence: &mut Evidence) -> Result<f64, NetError> {
        let Some((&head, rest)) = vars.split_first() else {
            return Ok(1.0);
        };

        if let Some(value) = evidence.get(head) {
            let p = self.net.probability(head, value, evidence)?;
            return Ok(p * self.enumerate(rest, evidence)?);
        }

        let node = self.net.lookup(head)?;
        let mut total = 0.0;
        for y in &node.domain {
            let p = node.probability_of(y, evidence)?;
            evidence.insert(head.to_string(), y.clone());
            let rest_total = self.enumerate(rest, evidence);
            evidence.remove(head);
            total += p * rest_total?;
        }
        Ok(total)
    }

    fn check_depth(&self, variables: usize) -> Result<(), NetError> {
        match self.max_depth {
            Some(max_depth) if variables > max_depth => {
                Err(NetError::DepthLimitExceeded {
                    variables,
                    max_depth,
                })
            }
            _ => Ok(()),
        }
    }
}

/// P(query | evidence) over `net`.
///
/// ```rust
/// use bayes_net::{enumeration_ask, parse_evidence, samples};
///
/// let net = samples::rain_network();
/// let evidence = parse_evidence("Wet=yes").unwrap();
/// let posterior = enumeration_ask("Rain", &evidence, &net).unwrap();
/// assert!((posterior.get("yes").unwrap() - 0.27 / 0.34).abs() < 1e-9);
/// ```
pub fn enumeration_ask(
    query: &str,
    evidence: &Evidence,
    net: &Network,
) -> Result<Distribution, NetError> {
    Enumeration::new(net).ask(query, evidence)
}

/// Sum of the joint over the unbound variables of `vars`.
pub fn enumerate_all(vars: &[&str], evidence: &Evidence, net: &Network) -> Result<f64, NetError> {
    Enumeration::new(net).enumerate_all(vars, evidence)
}
