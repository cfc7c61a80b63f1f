//! Immutable document snapshots with structural sharing.
//!
//! Records and lists hold their children behind [`Arc`], so cloning a
//! [`Snapshot`] is O(1) and an edit rebuilds only the ancestor chain of the
//! field it touches. Everything else is shared with the previous snapshot.

use crate::error::Result;
use crate::path::FieldPath;
use crate::schema;
use crate::types::HandoverDocument;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One node of a snapshot tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string, number, or boolean.
    Leaf(Value),
    Record(Arc<BTreeMap<String, Node>>),
    List(Arc<Vec<Node>>),
}

impl Node {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Record(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (k, Node::from_value(v)))
                    .collect(),
            )),
            Value::Array(items) => {
                Node::List(Arc::new(items.into_iter().map(Node::from_value).collect()))
            }
            leaf => Node::Leaf(leaf),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Leaf(v) => v.clone(),
            Node::Record(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Node::List(items) => Value::Array(items.iter().map(Node::to_value).collect()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "scalar",
            Node::Record(_) => "record",
            Node::List(_) => "list",
        }
    }

    /// True if both nodes are the same shared container (not merely equal).
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Record(a), Node::Record(b)) => Arc::ptr_eq(a, b),
            (Node::List(a), Node::List(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// One complete, immutable value of a handover document.
///
/// Produced by [`Snapshot::from_document`] or by any of the operations in
/// [`mutate`](crate::mutate); never changed in place.
///
/// ```
/// use handover::v1::{FieldPath, HandoverDocument, Snapshot, mutate};
///
/// let before = Snapshot::from_document(&HandoverDocument::default()).unwrap();
/// let path = FieldPath::parse("risks.issues").unwrap();
/// let after = mutate::set(&before, &path, "Vendor contract ends".into()).unwrap();
///
/// assert_eq!(mutate::get(&before, &path).unwrap(), "");
/// assert_eq!(mutate::get(&after, &path).unwrap(), "Vendor contract ends");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Node,
}

impl Snapshot {
    pub fn from_document(doc: &HandoverDocument) -> Result<Self> {
        Self::from_value(serde_json::to_value(doc)?)
    }

    /// Build a snapshot from arbitrary JSON, normalizing it through the
    /// document schema. Missing fields become defaults; unknown fields and
    /// wrongly-typed values are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let root = schema::DOCUMENT.coerce(value, &FieldPath::root())?;
        Ok(Self::from_root(Node::from_value(root)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub(crate) fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    pub fn to_document(&self) -> Result<HandoverDocument> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// Canonical JSON export. Key order follows the document model.
    pub fn to_json(&self) -> Result<String> {
        Ok(self.to_document()?.to_json()?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(self.to_document()?.to_json_pretty()?)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::from_root(Node::from_value(schema::DOCUMENT.default_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Project};

    #[test]
    fn test_default_snapshot_matches_default_document() {
        let snap = Snapshot::default();
        assert_eq!(snap.to_document().unwrap(), HandoverDocument::default());
        assert_eq!(
            Snapshot::from_document(&HandoverDocument::default()).unwrap(),
            snap
        );
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = HandoverDocument::default();
        doc.priorities.push(Priority::new("Migrate DB", "진행", "2024.12.31"));
        doc.ongoing_projects.push(Project {
            name: "Billing".into(),
            progress: 70,
            ..Default::default()
        });
        let snap = Snapshot::from_document(&doc).unwrap();
        assert_eq!(snap.to_document().unwrap(), doc);

        let again = Snapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(again, snap);
    }

    #[test]
    fn test_from_value_normalizes() {
        let snap = Snapshot::from_value(serde_json::json!({
            "ongoingProjects": [{"name": "X", "progress": "250"}]
        }))
        .unwrap();
        let doc = snap.to_document().unwrap();
        assert_eq!(doc.ongoing_projects[0].progress, 100);
        assert_eq!(doc.ongoing_projects[0].owner, "");
        assert_eq!(doc.overview.transferor.name, "");
    }

    #[test]
    fn test_from_value_rejects_unknown_fields() {
        assert!(Snapshot::from_value(serde_json::json!({"rawContent": "x"})).is_err());
    }

    #[test]
    fn test_clone_shares_root() {
        let snap = Snapshot::default();
        let copy = snap.clone();
        assert!(snap.root().ptr_eq(copy.root()));
    }
}
