//! Query scripts: batches of queries run against one network.
//!
//! ```text
//! # comment
//! QUERY Appointment
//! EVIDENCE:
//! EVIDENCE: Rain=light,Maintenance=no
//! ```
//!
//! `QUERY` sets the current variable; every `EVIDENCE` line after it is one
//! case. Keywords are case-insensitive and colons in the evidence are ignored.

use bayes_net::{parse_evidence_item, Evidence};

/// One parsed script line that produces output.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptItem {
    /// A query to evaluate.
    Case {
        line: usize,
        query: String,
        evidence: Evidence,
    },
    /// A problem with the script itself, reported without stopping the run.
    Diagnostic { line: usize, message: String },
}

fn has_keyword(line: &str, keyword: &str) -> bool {
    line.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

/// Parse a script into cases and diagnostics, in line order.
pub fn parse_script(text: &str) -> Vec<ScriptItem> {
    let mut items = Vec::new();
    let mut query: Option<String> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let number = i + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if has_keyword(line, "QUERY") {
            query = line.split_whitespace().nth(1).map(str::to_string);
            if query.is_none() {
                items.push(ScriptItem::Diagnostic {
                    line: number,
                    message: "QUERY without a variable".to_string(),
                });
            }
        } else if has_keyword(line, "EVIDENCE") {
            let Some(var) = &query else {
                items.push(ScriptItem::Diagnostic {
                    line: number,
                    message: "EVIDENCE without a preceding QUERY, ignored".to_string(),
                });
                continue;
            };

            let text = line["EVIDENCE".len()..].replace(':', "");
            let mut evidence = Evidence::new();
            for item in text.split(',').filter(|s| !s.trim().is_empty()) {
                match parse_evidence_item(item) {
                    Ok((k, v)) => {
                        evidence.insert(k, v);
                    }
                    Err(e) => items.push(ScriptItem::Diagnostic {
                        line: number,
                        message: e.to_string(),
                    }),
                }
            }
            items.push(ScriptItem::Case {
                line: number,
                query: var.clone(),
                evidence,
            });
        }
    }
    items
}
