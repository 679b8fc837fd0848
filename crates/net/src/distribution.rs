//! Posterior distributions over one variable's domain.

use std::fmt;

use serde::Serialize;

/// P(variable = value | evidence) for every value, in domain order.
///
/// # Example
///
/// ```rust
/// use bayes_net::Distribution;
///
/// let d = Distribution::normalize("Coin", vec![("heads".into(), 3.0), ("tails".into(), 1.0)]);
/// assert!((d.get("heads").unwrap() - 0.75).abs() < 1e-12);
///
/// // Zero total: every value maps to zero.
/// let empty = Distribution::normalize("Coin", vec![("heads".into(), 0.0), ("tails".into(), 0.0)]);
/// assert!(empty.is_degenerate());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub variable: String,
    entries: Vec<(String, f64)>,
}

impl Distribution {
    /// Scale unnormalized weights so they sum to one.
    ///
    /// A zero total gives an all-zero distribution rather than dividing by zero.
    pub fn normalize(variable: impl Into<String>, weights: Vec<(String, f64)>) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let entries = if total == 0.0 {
            weights.into_iter().map(|(v, _)| (v, 0.0)).collect()
        } else {
            weights.into_iter().map(|(v, w)| (v, w / total)).collect()
        };
        Self {
            variable: variable.into(),
            entries,
        }
    }

    pub fn get(&self, value: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, p)| *p)
    }

    /// (value, probability) pairs in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(v, p)| (v.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities: 1 for a proper distribution, 0 when degenerate.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// True when the evidence had zero likelihood and every value maps to 0.
    pub fn is_degenerate(&self) -> bool {
        self.entries.iter().all(|(_, p)| *p == 0.0)
    }

    /// The most probable value; the first one in domain order on ties.
    pub fn mode(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (v, p) in self.iter() {
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((v, p));
            }
        }
        best.map(|(v, _)| v)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (value, p)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {:.5}", value, p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROB_TOLERANCE;

    fn weights(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(v, w)| (v.to_string(), *w)).collect()
    }

    #[test]
    fn test_normalize_keeps_domain_order() {
        let d = Distribution::normalize("X", weights(&[("c", 1.0), ("a", 2.0), ("b", 1.0)]));
        let values: Vec<_> = d.iter().map(|(v, _)| v).collect();
        assert_eq!(values, vec!["c", "a", "b"]);
        assert!((d.get("a").unwrap() - 0.5).abs() < PROB_TOLERANCE);
        assert!((d.total() - 1.0).abs() < PROB_TOLERANCE);
        assert_eq!(d.mode(), Some("a"));
    }

    #[test]
    fn test_mode_prefers_first_on_ties() {
        let d = Distribution::normalize("X", weights(&[("b", 1.0), ("a", 1.0)]));
        assert_eq!(d.mode(), Some("b"));
        let empty = Distribution::normalize("X", Vec::new());
        assert_eq!(empty.mode(), None);
    }

    #[test]
    fn test_zero_total_is_all_zero() {
        let d = Distribution::normalize("X", weights(&[("a", 0.0), ("b", 0.0)]));
        assert!(d.is_degenerate());
        assert_eq!(d.get("a"), Some(0.0));
        assert_eq!(d.total(), 0.0);
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_display() {
        let d = Distribution::normalize("X", weights(&[("yes", 0.27), ("no", 0.07)]));
        assert_eq!(d.to_string(), "yes: 0.79412\nno: 0.20588");
    }

    #[test]
    fn test_get_unknown_value() {
        let d = Distribution::normalize("X", weights(&[("yes", 1.0)]));
        assert_eq!(d.get("maybe"), None);
    }
}
