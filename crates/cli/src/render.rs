//! Plain-text rendering of networks and query results.

use bayes_net::{format_evidence, Distribution, Evidence, Network};

/// Structure first, then every CPT entry in authoring order.
pub fn network(net: &Network) -> String {
    let mut out = String::new();
    out.push_str("Network structure:\n");
    for node in net.nodes() {
        out.push_str(&format!(
            "- {}: values={:?}, parents={:?}, children={:?}\n",
            node.name, node.domain, node.parents, node.children
        ));
    }

    out.push('\n');
    out.push_str("Conditional probability tables:\n");
    for node in net.nodes() {
        out.push('\n');
        out.push_str(&format!("Node: {}\n", node.name));
        for (key, p) in node.cpt.iter() {
            out.push_str(&format!("  {}: {}\n", key, p));
        }
    }
    out
}

/// One `P(X=value | evidence) = p` line per domain value.
pub fn posterior(query: &str, evidence: &Evidence, dist: &Distribution) -> String {
    let given = if evidence.is_empty() {
        "no evidence".to_string()
    } else {
        format_evidence(evidence)
    };

    let mut out = String::new();
    for (value, p) in dist.iter() {
        out.push_str(&format!("P({}={} | {}) = {:.5}\n", query, value, given, p));
    }
    if dist.is_degenerate() {
        out.push_str("(evidence has zero likelihood; all values are 0)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bayes_net::samples::rain_network;
    use bayes_net::{enumeration_ask, parse_evidence};

    #[test]
    fn test_posterior_lines() {
        let net = rain_network();
        let e = parse_evidence("Wet=yes").unwrap();
        let d = enumeration_ask("Rain", &e, &net).unwrap();
        assert_eq!(
            posterior("Rain", &e, &d),
            "P(Rain=yes | Wet=yes) = 0.79412\nP(Rain=no | Wet=yes) = 0.20588\n"
        );
    }

    #[test]
    fn test_posterior_without_evidence() {
        let net = rain_network();
        let d = enumeration_ask("Rain", &Evidence::new(), &net).unwrap();
        assert!(posterior("Rain", &Evidence::new(), &d).starts_with("P(Rain=yes | no evidence) = 0.30000"));
    }

    #[test]
    fn test_network_lists_parents_and_cpts() {
        let text = network(&rain_network());
        assert!(text.contains("- Wet: values=[\"yes\", \"no\"], parents=[\"Rain\"], children=[]"));
        assert!(text.contains("Node: Wet\n  (\"Rain=yes\", \"yes\"): 0.9\n"));
    }
}
