//! Display indexing: nodes are addressed on the CLI by their 1-based
//! position in sequence order, or by a content substring when the number is
//! too much to remember. Indexes are ephemeral — they are re-derived from
//! the sequence on every command, never stored.

use crate::error::{AtomaError, Result};
use crate::model::Node;
use crate::outline::Outline;
use std::str::FromStr;
use uuid::Uuid;

/// A node paired with its current display index.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub node: Node,
    pub index: usize,
}

pub fn index_nodes(outline: &Outline) -> Vec<DisplayNode> {
    outline
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| DisplayNode {
            node: node.clone(),
            index: i + 1,
        })
        .collect()
}

/// User input selecting one node: a display index, or a content search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelector {
    Index(usize),
    Content(String),
}

impl FromStr for NodeSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<usize>() {
            Ok(n) => Ok(NodeSelector::Index(n)),
            Err(_) => Ok(NodeSelector::Content(s.to_string())),
        }
    }
}

impl std::fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeSelector::Index(i) => write!(f, "{}", i),
            NodeSelector::Content(term) => write!(f, "\"{}\"", term),
        }
    }
}

/// Resolve a selector to a node id. Content selectors must match exactly
/// one node; ambiguity is an error, not a guess.
pub fn resolve(outline: &Outline, selector: &NodeSelector) -> Result<Uuid> {
    match selector {
        NodeSelector::Index(i) => {
            if *i == 0 || *i > outline.len() {
                return Err(AtomaError::Api(format!("No node at index {}", i)));
            }
            Ok(outline.nodes()[i - 1].id)
        }
        NodeSelector::Content(term) => {
            let needle = term.to_lowercase();
            let matches: Vec<Uuid> = outline
                .nodes()
                .iter()
                .filter(|n| n.content.to_lowercase().contains(&needle))
                .map(|n| n.id)
                .collect();
            match matches.len() {
                0 => Err(AtomaError::Api(format!("No node matching \"{}\"", term))),
                1 => Ok(matches[0]),
                n => Err(AtomaError::Api(format!(
                    "\"{}\" matches {} nodes; use an index instead",
                    term, n
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> Outline {
        Outline::from_nodes(vec![
            Node::new("Groceries", 0),
            Node::new("Milk", 1),
            Node::new("Oat milk", 1),
        ])
    }

    #[test]
    fn indexes_are_one_based_sequence_positions() {
        let o = outline();
        let indexed = index_nodes(&o);
        assert_eq!(indexed.len(), 3);
        assert_eq!(indexed[0].index, 1);
        assert_eq!(indexed[2].index, 3);
        assert_eq!(indexed[2].node.content, "Oat milk");
    }

    #[test]
    fn selector_parses_numbers_as_indexes() {
        assert_eq!("2".parse::<NodeSelector>().unwrap(), NodeSelector::Index(2));
        assert_eq!(
            "milk".parse::<NodeSelector>().unwrap(),
            NodeSelector::Content("milk".to_string())
        );
    }

    #[test]
    fn resolve_by_index() {
        let o = outline();
        let id = resolve(&o, &NodeSelector::Index(2)).unwrap();
        assert_eq!(id, o.nodes()[1].id);
    }

    #[test]
    fn resolve_rejects_out_of_range_index() {
        let o = outline();
        assert!(resolve(&o, &NodeSelector::Index(0)).is_err());
        assert!(resolve(&o, &NodeSelector::Index(4)).is_err());
    }

    #[test]
    fn resolve_by_unique_content_match() {
        let o = outline();
        let id = resolve(&o, &NodeSelector::Content("grocer".to_string())).unwrap();
        assert_eq!(id, o.nodes()[0].id);
    }

    #[test]
    fn ambiguous_content_match_is_an_error() {
        let o = outline();
        let err = resolve(&o, &NodeSelector::Content("milk".to_string())).unwrap_err();
        assert!(err.to_string().contains("2 nodes"));
    }

    #[test]
    fn missing_content_match_is_an_error() {
        let o = outline();
        assert!(resolve(&o, &NodeSelector::Content("bread".to_string())).is_err());
    }
}
