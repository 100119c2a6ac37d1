use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    domain::FlatMapping,
    error::{ParameterStoreError, StoreResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HierarchyNode {
    Leaf(String),
    Branch(HierarchyTree),
}

impl HierarchyNode {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => Some(value.as_str()),
            Self::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&HierarchyTree> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(tree) => Some(tree),
        }
    }
}

/// Parameters grouped by shared path segments. Serializes as nested objects
/// with string leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyTree {
    nodes: BTreeMap<String, HierarchyNode>,
}

impl HierarchyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, segment: &str) -> Option<&HierarchyNode> {
        self.nodes.get(segment)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HierarchyNode)> {
        self.nodes.iter()
    }

    /// Inserts `value` at the position named by `key`, creating a branch for
    /// every segment but the last.
    ///
    /// Fails with [`ParameterStoreError::HierarchyConflict`] when a segment is
    /// already taken by a node of the other kind.
    pub fn insert(&mut self, key: &str, value: String, delimiter: char) -> StoreResult<()> {
        let segments: Vec<&str> = key.split(delimiter).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut current = &mut self.nodes;
        for (depth, segment) in parents.iter().enumerate() {
            let node = current
                .entry(segment.to_string())
                .or_insert_with(|| HierarchyNode::Branch(HierarchyTree::new()));
            current = match node {
                HierarchyNode::Branch(tree) => &mut tree.nodes,
                HierarchyNode::Leaf(_) => {
                    return Err(ParameterStoreError::HierarchyConflict(format!(
                        "'{}' holds a value but '{}' needs it as a branch",
                        join(&segments[..=depth], delimiter),
                        key
                    )));
                }
            };
        }

        if let Some(HierarchyNode::Branch(_)) = current.get(*leaf) {
            return Err(ParameterStoreError::HierarchyConflict(format!(
                "'{}' is a branch and cannot hold a value",
                key
            )));
        }
        current.insert(leaf.to_string(), HierarchyNode::Leaf(value));

        Ok(())
    }
}

fn join(segments: &[&str], delimiter: char) -> String {
    segments.join(&delimiter.to_string())
}

/// Converts a flat mapping of full parameter names into a tree.
///
/// When `prefix` is given it is removed from the front of every key that
/// starts with it. A single leading delimiter is then dropped before the key
/// is split into segments.
pub fn build_hierarchy(
    flat: &FlatMapping,
    prefix: Option<&str>,
    delimiter: char,
) -> StoreResult<HierarchyTree> {
    let mut tree = HierarchyTree::new();

    for (key, value) in flat {
        let mut key = key.as_str();
        if let Some(prefix) = prefix {
            key = key.strip_prefix(prefix).unwrap_or(key);
        }
        key = key.strip_prefix(delimiter).unwrap_or(key);

        tree.insert(key, value.clone(), delimiter)?;
    }

    Ok(tree)
}
