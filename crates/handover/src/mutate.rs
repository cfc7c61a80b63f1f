//! Path-addressed reads and edits over document snapshots.
//!
//! Every edit takes a snapshot by reference and returns a new one. The input
//! snapshot is never modified, and an edit that fails returns an error
//! without producing a partially-edited document.

use crate::error::{EditError, Result};
use crate::path::{FieldPath, Segment};
use crate::schema::{self, Schema};
use crate::tree::{Node, Snapshot};
use serde_json::Value;
use std::sync::Arc;

/// Read the value at `path`.
///
/// # Examples
///
/// ```
/// use handover::v1::{FieldPath, HandoverDocument, Person, Snapshot, mutate};
///
/// let mut doc = HandoverDocument::default();
/// doc.overview.transferor = Person::new("Kim", "Manager");
/// let snap = Snapshot::from_document(&doc).unwrap();
///
/// let name = mutate::get(&snap, &FieldPath::parse("overview.transferor.name").unwrap());
/// assert_eq!(name.unwrap(), "Kim");
///
/// let missing = mutate::get(&snap, &FieldPath::parse("priorities.0.title").unwrap());
/// assert!(missing.is_err());
/// ```
pub fn get(snapshot: &Snapshot, path: &FieldPath) -> Result<Value> {
    schema::resolve(path)?;
    Ok(lookup(snapshot.root(), path)?.to_value())
}

/// Read a text field. Fails with [`EditError::Value`] if the field is not text.
pub fn get_text(snapshot: &Snapshot, path: &FieldPath) -> Result<String> {
    match schema::resolve(path)? {
        Schema::Text => match lookup(snapshot.root(), path)? {
            Node::Leaf(Value::String(s)) => Ok(s.clone()),
            _ => Err(EditError::value(path.to_string(), "text")),
        },
        _ => Err(EditError::value(path.to_string(), "text")),
    }
}

/// Number of elements in the list at `path`.
pub fn len(snapshot: &Snapshot, path: &FieldPath) -> Result<usize> {
    schema::resolve(path)?;
    match lookup(snapshot.root(), path)? {
        Node::List(items) => Ok(items.len()),
        other => Err(not_a_list(path, other)),
    }
}

/// Replace the value at `path`, returning the next snapshot.
///
/// The value is normalized through the schema first (see
/// [`Schema::coerce`]). Setting an index past the end of a list is an error,
/// not an append; only [`append`] grows a list.
///
/// # Examples
///
/// ```
/// use handover::v1::{FieldPath, Snapshot, mutate};
///
/// let snap = Snapshot::default();
/// let items = FieldPath::parse("ongoingProjects").unwrap();
/// let snap = mutate::append_default(&snap, &items).unwrap();
///
/// let progress = FieldPath::parse("ongoingProjects.0.progress").unwrap();
/// let snap = mutate::set(&snap, &progress, 150.into()).unwrap();
/// assert_eq!(mutate::get(&snap, &progress).unwrap(), 100);
/// ```
pub fn set(snapshot: &Snapshot, path: &FieldPath, value: Value) -> Result<Snapshot> {
    let schema = schema::resolve(path)?;
    let replacement = Node::from_value(schema.coerce(value, path)?);
    let root = rebuild(snapshot.root(), path.segments(), path, &mut |_| {
        Ok(replacement.clone())
    })?;
    tracing::debug!(path = %path, "set field");
    Ok(Snapshot::from_root(root))
}

/// Insert `item` at the end of the list at `path`.
pub fn append(snapshot: &Snapshot, path: &FieldPath, item: Value) -> Result<Snapshot> {
    let elem = list_schema(path)?;
    let current = len(snapshot, path)?;
    let item = Node::from_value(elem.coerce(item, &path.index(current))?);
    let root = rebuild(snapshot.root(), path.segments(), path, &mut |node| match node {
        Node::List(items) => {
            let mut next = Vec::with_capacity(items.len() + 1);
            next.extend(items.iter().cloned());
            next.push(item.clone());
            Ok(Node::List(Arc::new(next)))
        }
        other => Err(not_a_list(path, other)),
    })?;
    tracing::debug!(path = %path, index = current, "appended item");
    Ok(Snapshot::from_root(root))
}

/// Append the empty template item for the list at `path`.
pub fn append_default(snapshot: &Snapshot, path: &FieldPath) -> Result<Snapshot> {
    append(snapshot, path, schema::template(path)?)
}

/// Remove the element at `index` from the list at `path`, shifting later
/// elements down by one.
///
/// # Examples
///
/// ```
/// use handover::v1::{FieldPath, Snapshot, mutate};
///
/// let goals = FieldPath::parse("jobStatus.teamGoals").unwrap();
/// let snap = mutate::set(&Snapshot::default(), &goals, serde_json::json!(["a", "b", "c"])).unwrap();
///
/// let snap = mutate::remove_at(&snap, &goals, 1).unwrap();
/// assert_eq!(mutate::get(&snap, &goals).unwrap(), serde_json::json!(["a", "c"]));
///
/// assert!(mutate::remove_at(&snap, &goals, 2).is_err());
/// ```
pub fn remove_at(snapshot: &Snapshot, path: &FieldPath, index: usize) -> Result<Snapshot> {
    list_schema(path)?;
    let root = rebuild(snapshot.root(), path.segments(), path, &mut |node| match node {
        Node::List(items) if index < items.len() => {
            let mut next = (**items).clone();
            next.remove(index);
            Ok(Node::List(Arc::new(next)))
        }
        Node::List(items) => Err(EditError::Index {
            path: path.to_string(),
            index,
            len: items.len(),
        }),
        other => Err(not_a_list(path, other)),
    })?;
    tracing::debug!(path = %path, index, "removed item");
    Ok(Snapshot::from_root(root))
}

fn list_schema(path: &FieldPath) -> Result<&'static Schema> {
    match schema::resolve(path)? {
        Schema::List(elem) => Ok(*elem),
        other => Err(EditError::path(
            path.to_string(),
            format!("not a list ({})", other.kind()),
        )),
    }
}

fn not_a_list(path: &FieldPath, node: &Node) -> EditError {
    EditError::path(path.to_string(), format!("not a list ({})", node.kind()))
}

fn lookup<'a>(root: &'a Node, path: &FieldPath) -> Result<&'a Node> {
    path.segments()
        .iter()
        .try_fold(root, |node, seg| child(node, seg, path))
}

fn child<'a>(node: &'a Node, seg: &Segment, path: &FieldPath) -> Result<&'a Node> {
    match (node, seg) {
        (Node::Record(map), Segment::Key(key)) => map
            .get(key)
            .ok_or_else(|| EditError::path(path.to_string(), format!("missing field `{}`", key))),
        (Node::List(items), Segment::Index(i)) => items.get(*i).ok_or_else(|| {
            EditError::path(
                path.to_string(),
                format!("index {} out of bounds (len {})", i, items.len()),
            )
        }),
        (node, seg) => Err(EditError::path(
            path.to_string(),
            format!("`{}` cannot address a {}", seg, node.kind()),
        )),
    }
}

/// Copy the ancestor chain of `segs` and swap in `f(target)` at the end.
///
/// Siblings along the chain are shared with `node`, not copied. Nothing is
/// built until the whole chain resolves and `f` succeeds.
fn rebuild(
    node: &Node,
    segs: &[Segment],
    path: &FieldPath,
    f: &mut dyn FnMut(&Node) -> Result<Node>,
) -> Result<Node> {
    let Some((seg, rest)) = segs.split_first() else {
        return f(node);
    };
    let replaced = rebuild(child(node, seg, path)?, rest, path, f)?;
    match (node, seg) {
        (Node::Record(map), Segment::Key(key)) => {
            let mut next = (**map).clone();
            next.insert(key.clone(), replaced);
            Ok(Node::Record(Arc::new(next)))
        }
        (Node::List(items), Segment::Index(i)) => {
            let mut next = (**items).clone();
            next[*i] = replaced;
            Ok(Node::List(Arc::new(next)))
        }
        // `child` already rejected every other combination
        (node, seg) => Err(EditError::path(
            path.to_string(),
            format!("`{}` cannot address a {}", seg, node.kind()),
        )),
    }
}
