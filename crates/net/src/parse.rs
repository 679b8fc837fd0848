//! Parsers for the two declarative inputs: the edge list and the CPT blocks.
//!
//! Both inputs may start with a UTF-8 byte-order mark, which is ignored.
//!
//! Edge list: one `Parent Child` pair per line; blank lines and lines
//! starting with `#` are skipped.
//!
//! CPT blocks:
//!
//! ```text
//! Node: Wet
//! Values: yes,no
//! Parents: Rain
//! CPT:
//! Rain=yes yes 0.9
//! Rain=yes no 0.1
//! ```
//!
//! The variable name is the rest of the `Node:` line, or the next non-blank
//! line. `Parents:` is optional. Lines starting with `CPT` are headers, and
//! lines starting with `#` are comments, as in the edge list. Every other
//! non-blank line is a row whose last two tokens are the value and its
//! probability; whatever precedes them is the parent assignment.

use crate::error::NetError;
use crate::node::NO_PARENTS;

const NODE_TAG: &str = "Node:";
const VALUES_TAG: &str = "Values:";
const PARENTS_TAG: &str = "Parents:";
const CPT_HEADER: &str = "CPT";
const BOM: char = '\u{feff}';

fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// One `Parent Child` line of the edge list.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDecl {
    pub parent: String,
    pub child: String,
    /// 1-based line number.
    pub line: usize,
}

/// One row of a CPT block.
#[derive(Debug, Clone, PartialEq)]
pub struct CptRow {
    /// Parent assignment text, or `"none"`.
    pub signature: String,
    pub value: String,
    pub probability: f64,
    pub line: usize,
}

/// One `Node:` block of the CPT file.
#[derive(Debug, Clone, PartialEq)]
pub struct CptBlock {
    pub name: String,
    pub domain: Vec<String>,
    /// Parent order declared by `Parents:`, empty when absent.
    pub parents: Vec<String>,
    pub rows: Vec<CptRow>,
    /// Line of the `Node:` tag.
    pub line: usize,
}

/// Parse the edge list.
pub fn parse_edges(text: &str) -> Result<Vec<EdgeDecl>, NetError> {
    let mut edges = Vec::new();
    for (i, raw) in strip_bom(text).lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [parent, child] => edges.push(EdgeDecl {
                parent: parent.to_string(),
                child: child.to_string(),
                line: i + 1,
            }),
            _ => {
                return Err(NetError::MalformedEdge {
                    line: i + 1,
                    text: line.to_string(),
                })
            }
        }
    }
    Ok(edges)
}

/// A block still being read.
struct Draft {
    line: usize,
    name: Option<String>,
    domain: Option<Vec<String>>,
    parents: Vec<String>,
    rows: Vec<CptRow>,
}

impl Draft {
    fn new(line: usize) -> Self {
        Self {
            line,
            name: None,
            domain: None,
            parents: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn finish(self) -> Result<CptBlock, NetError> {
        let name = self.name.ok_or_else(|| NetError::MalformedBlock {
            line: self.line,
            reason: "missing variable name after 'Node:'".to_string(),
        })?;

        let domain = match self.domain {
            Some(domain) if !domain.is_empty() => domain,
            Some(_) => {
                return Err(NetError::MalformedBlock {
                    line: self.line,
                    reason: format!("empty 'Values:' for '{}'", name),
                })
            }
            None => {
                return Err(NetError::MalformedBlock {
                    line: self.line,
                    reason: format!("missing 'Values:' for '{}'", name),
                })
            }
        };

        if let Some(dup) = domain
            .iter()
            .enumerate()
            .find(|(i, v)| domain[..*i].contains(*v))
            .map(|(_, v)| v)
        {
            return Err(NetError::MalformedBlock {
                line: self.line,
                reason: format!("value '{}' listed twice for '{}'", dup, name),
            });
        }

        Ok(CptBlock {
            name,
            domain,
            parents: self.parents,
            rows: self.rows,
            line: self.line,
        })
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_row(line: usize, text: &str) -> Result<CptRow, NetError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let n = tokens.len();
    if n < 2 {
        return Err(NetError::MalformedRow {
            line,
            row: text.to_string(),
        });
    }

    let probability = tokens[n - 1]
        .parse::<f64>()
        .ok()
        .filter(|p| (0.0..=1.0).contains(p))
        .ok_or_else(|| NetError::InvalidProbability {
            line,
            text: tokens[n - 1].to_string(),
        })?;

    let signature = if n == 2 {
        NO_PARENTS.to_string()
    } else {
        tokens[..n - 2].join(" ")
    };

    Ok(CptRow {
        signature,
        value: tokens[n - 2].to_string(),
        probability,
        line,
    })
}

/// Parse the CPT file into blocks, in file order.
pub fn parse_cpts(text: &str) -> Result<Vec<CptBlock>, NetError> {
    let mut blocks = Vec::new();
    let mut current: Option<Draft> = None;

    for (i, raw) in strip_bom(text).lines().enumerate() {
        let number = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix(NODE_TAG) {
            if let Some(done) = current.take() {
                blocks.push(done.finish()?);
            }
            let mut draft = Draft::new(number);
            let rest = rest.trim();
            if !rest.is_empty() {
                draft.name = Some(rest.to_string());
            }
            current = Some(draft);
            continue;
        }

        let draft = current.as_mut().ok_or_else(|| NetError::MalformedBlock {
            line: number,
            reason: format!("'{}' appears before any 'Node:'", line),
        })?;

        if draft.name.is_none() {
            draft.name = Some(line.to_string());
        } else if let Some(values) = line.strip_prefix(VALUES_TAG) {
            draft.domain = Some(split_list(values));
        } else if let Some(parents) = line.strip_prefix(PARENTS_TAG) {
            draft.parents = split_list(parents);
        } else if !line.starts_with(CPT_HEADER) {
            draft.rows.push(parse_row(number, line)?);
        }
    }

    if let Some(done) = current {
        blocks.push(done.finish()?);
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_skip_blanks_and_comments() {
        let edges = parse_edges("# structure\n\nRain Wet\n  Cloudy   Rain  \n").unwrap();
        assert_eq!(
            edges,
            vec![
                EdgeDecl {
                    parent: "Rain".to_string(),
                    child: "Wet".to_string(),
                    line: 3,
                },
                EdgeDecl {
                    parent: "Cloudy".to_string(),
                    child: "Rain".to_string(),
                    line: 4,
                },
            ]
        );
    }

    #[test]
    fn test_edge_with_wrong_arity() {
        assert_eq!(
            parse_edges("Rain Wet\nRain\n"),
            Err(NetError::MalformedEdge {
                line: 2,
                text: "Rain".to_string()
            })
        );
        assert!(parse_edges("A B C").is_err());
    }

    #[test]
    fn test_root_and_conditional_blocks() {
        let text = "\
Node:
Rain
Values: yes, no
CPT:
yes 0.3
no 0.7

Node: Wet
Values: yes,no
Parents: Rain
CPT
Rain=yes   yes 0.9
Rain=yes no 0.1
";
        let blocks = parse_cpts(text).unwrap();
        assert_eq!(blocks.len(), 2);

        let rain = &blocks[0];
        assert_eq!(rain.name, "Rain");
        assert_eq!(rain.domain, vec!["yes", "no"]);
        assert!(rain.parents.is_empty());
        assert_eq!(rain.rows[0].signature, "none");
        assert_eq!(rain.rows[0].value, "yes");
        assert_eq!(rain.line, 1);

        let wet = &blocks[1];
        assert_eq!(wet.name, "Wet");
        assert_eq!(wet.parents, vec!["Rain"]);
        assert_eq!(wet.rows.len(), 2);
        assert_eq!(wet.rows[0].signature, "Rain=yes");
        assert!((wet.rows[0].probability - 0.9).abs() < 1e-12);
        assert_eq!(wet.rows[1].line, 13);
    }

    #[test]
    fn test_multi_parent_signature_is_verbatim_text() {
        let text = "Node: C\nValues: t,f\nParents: A,B\nA=t  B=f t 0.25\n";
        let blocks = parse_cpts(text).unwrap();
        assert_eq!(blocks[0].rows[0].signature, "A=t B=f");
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = parse_cpts("Node: A\nValues: t,f\n0.5\n").unwrap_err();
        assert_eq!(
            err,
            NetError::MalformedRow {
                line: 3,
                row: "0.5".to_string()
            }
        );
    }

    #[test]
    fn test_bad_probability() {
        for bad in ["t x", "t 1.5", "t -0.1", "t NaN"] {
            let text = format!("Node: A\nValues: t,f\n{}\n", bad);
            assert!(
                matches!(parse_cpts(&text), Err(NetError::InvalidProbability { line: 3, .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_block_without_values() {
        let err = parse_cpts("Node: A\nt 0.5\n").unwrap_err();
        assert!(matches!(err, NetError::MalformedBlock { line: 1, .. }));
    }

    #[test]
    fn test_block_without_name() {
        let err = parse_cpts("Node:\n").unwrap_err();
        assert!(matches!(err, NetError::MalformedBlock { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_domain_value() {
        let err = parse_cpts("Node: A\nValues: t,f,t\n").unwrap_err();
        assert!(matches!(err, NetError::MalformedBlock { .. }));
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let blocks = parse_cpts("\u{feff}Node: Rain\nValues: yes,no\nyes 0.3\nno 0.7\n").unwrap();
        assert_eq!(blocks[0].name, "Rain");
        assert_eq!(blocks[0].line, 1);

        let edges = parse_edges("\u{feff}Rain Wet\n").unwrap();
        assert_eq!(edges[0].parent, "Rain");
    }

    #[test]
    fn test_comments_inside_cpt_block() {
        let text = "# tables\nNode: A\n# domain next\nValues: t,f\n# rows\nt 0.5\nf 0.5\n";
        let blocks = parse_cpts(text).unwrap();
        assert_eq!(blocks[0].rows.len(), 2);
        assert_eq!(blocks[0].rows[0].line, 6);
    }

    #[test]
    fn test_rows_before_any_block() {
        assert!(matches!(
            parse_cpts("yes 0.3\n"),
            Err(NetError::MalformedBlock { line: 1, .. })
        ));
    }
}
