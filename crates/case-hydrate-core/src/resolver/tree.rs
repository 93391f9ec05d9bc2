//! Resolver for free-form nested objects (vision assessment data).
//!
//! Two passes. The walk collects `(path, id)` for every id-shaped string leaf
//! without touching the tree; then all ids are resolved in one chain call and
//! each recorded path is re-descended on a copy to write the name.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::config::HydrationConfig;
use crate::store::{LookupStores, StoreResult};

use super::{canonical_id, is_reference, resolve_with_fallback, ChainStep, Resolved};

/// One step from a node to its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Safety bounds for the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Containers at this depth are not descended (root is depth 0)
    pub max_depth: usize,
    /// The walk stops after visiting this many values
    pub max_nodes: usize,
}

impl From<&HydrationConfig> for TreeLimits {
    fn from(config: &HydrationConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
        }
    }
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self::from(&HydrationConfig::default())
    }
}

/// An id-shaped leaf found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafReference {
    pub path: Vec<PathSegment>,
    pub id: String,
}

#[derive(Debug, Default)]
struct Walk {
    found: Vec<LeafReference>,
    visited: usize,
    truncated: bool,
}

impl Walk {
    fn visit(&mut self, value: &Value, path: &mut Vec<PathSegment>, limits: TreeLimits) {
        if self.visited >= limits.max_nodes {
            self.truncated = true;
            return;
        }
        self.visited += 1;

        match value {
            Value::String(s) if is_reference(s) => self.found.push(LeafReference {
                path: path.clone(),
                id: s.clone(),
            }),
            Value::Array(items) => {
                if path.len() >= limits.max_depth {
                    self.truncated = true;
                    return;
                }
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    self.visit(item, path, limits);
                    path.pop();
                }
            }
            Value::Object(map) => {
                if path.len() >= limits.max_depth {
                    self.truncated = true;
                    return;
                }
                for (key, item) in map {
                    path.push(PathSegment::Key(key.clone()));
                    self.visit(item, path, limits);
                    path.pop();
                }
            }
            _ => {}
        }
    }
}

/// Depth-first collection of id-shaped string leaves.
///
/// Returns the leaves in document order and whether a bound cut the walk short.
pub fn collect_references(value: &Value, limits: TreeLimits) -> (Vec<LeafReference>, bool) {
    let mut walk = Walk::default();
    walk.visit(value, &mut Vec::new(), limits);
    (walk.found, walk.truncated)
}

fn node_mut<'a>(root: &'a mut Value, path: &[PathSegment]) -> Option<&'a mut Value> {
    path.iter().try_fold(root, |node, segment| match segment {
        PathSegment::Key(key) => node.get_mut(key.as_str()),
        PathSegment::Index(index) => node.get_mut(*index),
    })
}

pub async fn resolve_tree(
    stores: &LookupStores,
    value: &Value,
    chain: &[ChainStep],
    limits: TreeLimits,
) -> StoreResult<Resolved> {
    let (leaves, truncated) = collect_references(value, limits);
    if truncated {
        tracing::warn!(
            max_depth = limits.max_depth,
            max_nodes = limits.max_nodes,
            "Nested object exceeds walk bounds; deeper references left as stored"
        );
    }

    if leaves.is_empty() {
        return Ok(Resolved::unchanged(value.clone()));
    }

    let ids: BTreeSet<String> = leaves.iter().map(|leaf| canonical_id(&leaf.id)).collect();
    let names = resolve_with_fallback(stores, &ids, chain).await?;

    let mut out = value.clone();
    let mut unresolved = BTreeSet::new();
    for leaf in &leaves {
        match names.get(&leaf.id) {
            Some(name) => {
                if let Some(node) = node_mut(&mut out, &leaf.path) {
                    *node = Value::String(name.to_string());
                }
            }
            None => {
                unresolved.insert(leaf.id.clone());
            }
        }
    }

    Ok(Resolved {
        value: out,
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::resolver::VISUAL_ACUITY_CHAIN;
    use crate::store::InMemoryLookupStore;
    use serde_json::json;
    use std::sync::Arc;

    const SIX_SIX: &str = "66666666-6666-6666-6666-666666666666";
    const SIX_NINE: &str = "69696969-6969-6969-6969-696969696969";
    const UNKNOWN: &str = "99999999-9999-9999-9999-999999999999";

    fn stores() -> LookupStores {
        let master = InMemoryLookupStore::new()
            .with_entry(Category::VisualAcuity, SIX_SIX, "6/6")
            .with_entry(Category::VisualAcuity, SIX_NINE, "6/9");
        LookupStores::new(Arc::new(master))
    }

    #[tokio::test]
    async fn test_only_reference_leaves_rewritten() {
        let value = json!({"right_eye": {"acuity": SIX_SIX}, "notes": "stable"});
        let resolved = resolve_tree(&stores(), &value, VISUAL_ACUITY_CHAIN, TreeLimits::default())
            .await
            .unwrap();
        assert_eq!(resolved.value, json!({"right_eye": {"acuity": "6/6"}, "notes": "stable"}));
    }

    #[tokio::test]
    async fn test_arrays_and_mixed_depths() {
        let value = json!({
            "unaided": {"right": SIX_NINE, "left": UNKNOWN},
            "history": [{"date": "2024-01-02", "best": [SIX_SIX, "CF 1m"]}],
            "pinhole": true,
            "iop": 14
        });
        let resolved = resolve_tree(&stores(), &value, VISUAL_ACUITY_CHAIN, TreeLimits::default())
            .await
            .unwrap();

        assert_eq!(
            resolved.value,
            json!({
                "unaided": {"right": "6/9", "left": UNKNOWN},
                "history": [{"date": "2024-01-02", "best": ["6/6", "CF 1m"]}],
                "pinhole": true,
                "iop": 14
            })
        );
        assert_eq!(resolved.unresolved, BTreeSet::from([UNKNOWN.to_string()]));
    }

    #[test]
    fn test_collect_paths() {
        let value = json!({"a": [{"b": SIX_SIX}], "c": "text"});
        let (leaves, truncated) = collect_references(&value, TreeLimits::default());

        assert!(!truncated);
        assert_eq!(
            leaves,
            vec![LeafReference {
                path: vec![
                    PathSegment::Key("a".into()),
                    PathSegment::Index(0),
                    PathSegment::Key("b".into()),
                ],
                id: SIX_SIX.into(),
            }]
        );
    }

    #[test]
    fn test_depth_bound() {
        let value = json!({"l1": {"l2": {"l3": SIX_SIX}}, "top": SIX_NINE});
        let limits = TreeLimits {
            max_depth: 2,
            max_nodes: 100,
        };
        let (leaves, truncated) = collect_references(&value, limits);

        assert!(truncated);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id, SIX_NINE);
    }

    #[test]
    fn test_node_bound() {
        let value = json!([SIX_SIX, SIX_SIX, SIX_SIX, SIX_SIX]);
        let limits = TreeLimits {
            max_depth: 8,
            max_nodes: 3,
        };
        let (leaves, truncated) = collect_references(&value, limits);

        // Root array plus two leaves
        assert!(truncated);
        assert_eq!(leaves.len(), 2);
    }

    #[tokio::test]
    async fn test_no_references_skips_store() {
        let value = json!({"notes": "stable", "iop": [14, 15]});
        let stores = LookupStores::new(Arc::new(InMemoryLookupStore::new()));
        let resolved = resolve_tree(&stores, &value, VISUAL_ACUITY_CHAIN, TreeLimits::default())
            .await
            .unwrap();
        assert_eq!(resolved.value, value);
    }
}
