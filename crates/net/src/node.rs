//! Random variables and their conditional probability tables.
//!
//! A CPT is keyed by text, exactly as the table was authored:
//!
//! - the **signature** is `"none"` for a root variable, or the
//!   `"Parent=value"` pairs of the node's parents, in stored parent order,
//!   joined by single spaces;
//! - the **value** is one label of the node's domain.
//!
//! Lookups rebuild the signature from the evidence, so the parent order of a
//! node must match the order its table rows were written in.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::NetError;
use crate::evidence::Evidence;
use crate::PROB_TOLERANCE;

/// Signature used by variables without parents.
pub const NO_PARENTS: &str = "none";

/// Number of candidates reported when a CPT lookup misses.
const NEAREST_KEYS: usize = 3;

/// A CPT key: (parent-assignment signature, value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CptKey {
    pub signature: String,
    pub value: String,
}

impl CptKey {
    pub fn new(signature: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            value: value.into(),
        }
    }

    /// Key of a root variable's entry.
    pub fn root(value: impl Into<String>) -> Self {
        Self::new(NO_PARENTS, value)
    }

    /// How many `Parent=value` pairs and value this key shares with `other`.
    fn similarity(&self, other: &CptKey) -> usize {
        let shared_pairs = self
            .signature
            .split(' ')
            .filter(|pair| other.signature.split(' ').any(|p| p == *pair))
            .count();
        shared_pairs + usize::from(self.value == other.value)
    }
}

impl fmt::Display for CptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.signature, self.value)
    }
}

/// A conditional probability table, preserving authoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cpt {
    entries: Vec<(CptKey, f64)>,
    #[serde(skip)]
    index: HashMap<CptKey, usize>,
}

impl Cpt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mass of a key. A repeated key overwrites the earlier mass in place.
    pub fn insert(&mut self, key: CptKey, probability: f64) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = probability,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, probability));
            }
        }
    }

    pub fn get(&self, key: &CptKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were authored.
    pub fn iter(&self) -> impl Iterator<Item = (&CptKey, f64)> {
        self.entries.iter().map(|(k, p)| (k, *p))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CptKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Distinct signatures in first-seen order.
    pub fn signatures(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (key, _) in &self.entries {
            if !seen.contains(&key.signature.as_str()) {
                seen.push(&key.signature);
            }
        }
        seen
    }

    fn nearest(&self, key: &CptKey) -> Vec<CptKey> {
        let mut scored: Vec<(usize, &CptKey)> = self
            .keys()
            .map(|k| (key.similarity(k), k))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable sort keeps authoring order among equal scores.
        scored.sort_by_key(|(score, _)| Reverse(*score));
        scored
            .into_iter()
            .take(NEAREST_KEYS)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

/// One random variable of the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique variable name.
    pub name: String,
    /// Value labels, in declaration order.
    pub domain: Vec<String>,
    /// Parent names. The order defines how CPT signatures are composed.
    pub parents: Vec<String>,
    /// Child names, first-seen order.
    pub children: Vec<String>,
    /// P(value | parent assignment).
    pub cpt: Cpt,
}

impl Node {
    /// Create a node with no relations and an empty table.
    pub fn new(name: impl Into<String>, domain: Vec<String>) -> Self {
        Self {
            name: name.into(),
            domain,
            parents: Vec::new(),
            children: Vec::new(),
            cpt: Cpt::new(),
        }
    }

    /// Build the parent-assignment signature for `evidence`.
    ///
    /// Walks `parents` in stored order; every parent must be bound.
    pub fn signature(&self, evidence: &Evidence) -> Result<String, NetError> {
        if self.parents.is_empty() {
            return Ok(NO_PARENTS.to_string());
        }

        let mut pairs = Vec::with_capacity(self.parents.len());
        for parent in &self.parents {
            let value = evidence
                .get(parent)
                .ok_or_else(|| NetError::MissingEvidence {
                    parent: parent.clone(),
                    node: self.name.clone(),
                })?;
            pairs.push(format!("{}={}", parent, value));
        }
        Ok(pairs.join(" "))
    }

    /// P(self = value | parents as bound in `evidence`).
    pub fn probability_of(&self, value: &str, evidence: &Evidence) -> Result<f64, NetError> {
        let key = CptKey::new(self.signature(evidence)?, value);
        match self.cpt.get(&key) {
            Some(p) => Ok(p),
            None => Err(NetError::CptKeyNotFound {
                node: self.name.clone(),
                nearest: self.cpt.nearest(&key),
                known: self.cpt.keys().cloned().collect(),
                key,
            }),
        }
    }

    /// Sum of masses over the domain for each signature, in authoring order.
    pub fn row_sums(&self) -> Vec<(String, f64)> {
        self.cpt
            .signatures()
            .into_iter()
            .map(|signature| {
                let sum: f64 = self
                    .domain
                    .iter()
                    .filter_map(|v| self.cpt.get(&CptKey::new(signature, v.as_str())))
                    .sum();
                (signature.to_string(), sum)
            })
            .collect()
    }

    /// One [`NetError::NotNormalized`] per signature whose masses do not sum to one.
    pub fn normalization_issues(&self) -> Vec<NetError> {
        self.row_sums()
            .into_iter()
            .filter(|(_, sum)| (sum - 1.0).abs() > PROB_TOLERANCE)
            .map(|(signature, sum)| NetError::NotNormalized {
                node: self.name.clone(),
                signature,
                sum,
            })
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn evidence(pairs: &[(&str, &str)]) -> Evidence {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn grass() -> Node {
        let mut node = Node::new("Grass", labels(&["wet", "dry"]));
        node.parents = labels(&["Sprinkler", "Rain"]);
        node.cpt.insert(CptKey::new("Sprinkler=on Rain=yes", "wet"), 0.99);
        node.cpt.insert(CptKey::new("Sprinkler=on Rain=yes", "dry"), 0.01);
        node.cpt.insert(CptKey::new("Sprinkler=off Rain=yes", "wet"), 0.8);
        node.cpt.insert(CptKey::new("Sprinkler=off Rain=yes", "dry"), 0.2);
        node
    }

    #[test]
    fn test_root_lookup_uses_none_signature() {
        let mut rain = Node::new("Rain", labels(&["yes", "no"]));
        rain.cpt.insert(CptKey::root("yes"), 0.3);
        rain.cpt.insert(CptKey::root("no"), 0.7);

        let p = rain.probability_of("yes", &Evidence::new()).unwrap();
        assert!((p - 0.3).abs() < PROB_TOLERANCE);
        assert_eq!(rain.signature(&Evidence::new()).unwrap(), "none");
    }

    #[test]
    fn test_signature_follows_parent_order() {
        let node = grass();
        let e = evidence(&[("Rain", "yes"), ("Sprinkler", "on")]);
        assert_eq!(node.signature(&e).unwrap(), "Sprinkler=on Rain=yes");

        let p = node.probability_of("wet", &e).unwrap();
        assert!((p - 0.99).abs() < PROB_TOLERANCE);
    }

    #[test]
    fn test_missing_parent_evidence() {
        let node = grass();
        let err = node
            .probability_of("wet", &evidence(&[("Sprinkler", "on")]))
            .unwrap_err();
        assert_eq!(
            err,
            NetError::MissingEvidence {
                parent: "Rain".to_string(),
                node: "Grass".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_key_reports_nearest() {
        let node = grass();
        let err = node
            .probability_of("wet", &evidence(&[("Sprinkler", "on"), ("Rain", "no")]))
            .unwrap_err();

        match err {
            NetError::CptKeyNotFound {
                node,
                key,
                known,
                nearest,
            } => {
                assert_eq!(node, "Grass");
                assert_eq!(key, CptKey::new("Sprinkler=on Rain=no", "wet"));
                assert_eq!(known.len(), 4);
                assert_eq!(nearest.len(), 3);
                assert_eq!(nearest[0], CptKey::new("Sprinkler=on Rain=yes", "wet"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_value_outside_domain_is_a_key_miss() {
        let node = grass();
        let e = evidence(&[("Sprinkler", "on"), ("Rain", "yes")]);
        assert!(matches!(
            node.probability_of("soaked", &e),
            Err(NetError::CptKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_repeated_row_overwrites_in_place() {
        let mut cpt = Cpt::new();
        cpt.insert(CptKey::root("a"), 0.2);
        cpt.insert(CptKey::root("b"), 0.8);
        cpt.insert(CptKey::root("a"), 0.25);

        assert_eq!(cpt.len(), 2);
        assert_eq!(cpt.get(&CptKey::root("a")), Some(0.25));
        let order: Vec<_> = cpt.keys().map(|k| k.value.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_row_sums_and_normalization() {
        let mut node = grass();
        assert!(node.normalization_issues().is_empty());

        node.cpt.insert(CptKey::new("Sprinkler=off Rain=yes", "dry"), 0.3);
        let sums = node.row_sums();
        assert_eq!(sums[0].0, "Sprinkler=on Rain=yes");
        assert!((sums[1].1 - 1.1).abs() < PROB_TOLERANCE);

        let issues = node.normalization_issues();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            NetError::NotNormalized { signature, .. } if signature == "Sprinkler=off Rain=yes"
        ));
    }
}
