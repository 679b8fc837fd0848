//! Exact inference on the rain and sprinkler networks
//!
//! Run with: cargo run -p bayes-net --example rain_query
//!
//! This example demonstrates:
//! - Building networks from edge and CPT text
//! - Bayes' rule as a query: P(Rain | Wet)
//! - Explaining away in the sprinkler network
//! - What a zero-likelihood query looks like

use bayes_net::samples::{rain_network, sprinkler_network};
use bayes_net::{enumeration_ask, format_evidence, parse_evidence, Network};

fn show(net: &Network, query: &str, evidence: &str) {
    let e = parse_evidence(evidence).unwrap();
    let d = enumeration_ask(query, &e, net).unwrap();
    println!("P({} | {})", query, format_evidence(&e));
    for (value, p) in d.iter() {
        println!("  {:<6} {:.5}", value, p);
    }
    if d.is_degenerate() {
        println!("  (evidence has zero likelihood)");
    }
    println!();
}

fn main() {
    println!("=== Exact Inference by Enumeration ===\n");

    // -------------------------------------------------------------------------
    // 1. Bayes' rule
    // -------------------------------------------------------------------------
    println!("1. Rain → Wet");
    println!("-------------");
    println!();
    let rain = rain_network();
    println!("Variables: {:?}", rain.variables());
    println!("P(Rain=yes | Wet=yes) = 0.3·0.9 / (0.3·0.9 + 0.7·0.1) = 0.27 / 0.34");
    println!();
    show(&rain, "Rain", "");
    show(&rain, "Rain", "Wet=yes");

    // -------------------------------------------------------------------------
    // 2. Explaining away
    // -------------------------------------------------------------------------
    println!("2. The Sprinkler Network");
    println!("------------------------");
    println!();
    let sprinkler = sprinkler_network();
    for node in sprinkler.nodes() {
        println!("  {:<10} parents={:?}", node.name, node.parents);
    }
    println!();
    show(&sprinkler, "Sprinkler", "WetGrass=true");
    show(&sprinkler, "Sprinkler", "WetGrass=true,Rain=true");

    // -------------------------------------------------------------------------
    // 3. Impossible evidence
    // -------------------------------------------------------------------------
    println!("3. Zero-Likelihood Evidence");
    println!("---------------------------");
    println!();
    show(&sprinkler, "Cloudy", "Sprinkler=false,Rain=false,WetGrass=true");
}
