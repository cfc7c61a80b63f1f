//! The open document and the edits applied to it.

use crate::codec::{self, Composite};
use crate::error::{EditError, Result};
use crate::mutate;
use crate::path::FieldPath;
use crate::tree::Snapshot;
use crate::types::HandoverDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single edit event from the form, addressed by path.
///
/// Edits are internally tagged by `op` so a script of edits reads naturally
/// as JSON:
///
/// ```json
/// [
///   { "op": "append", "path": "priorities" },
///   { "op": "set", "path": "priorities.0.title", "value": "Migrate DB" },
///   { "op": "composite", "path": "teamMembers.0", "kind": "name-position", "input": "Kim (Manager)" },
///   { "op": "lines", "path": "jobStatus.teamGoals", "input": "Ship v2\nHire SRE" },
///   { "op": "remove", "path": "checklist", "index": 0 }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Edit {
    Set {
        path: FieldPath,
        value: Value,
    },
    /// Appends `item`, or the list's empty template when `item` is absent.
    Append {
        path: FieldPath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<Value>,
    },
    Remove {
        path: FieldPath,
        index: usize,
    },
    Composite {
        path: FieldPath,
        kind: Composite,
        input: String,
    },
    Lines {
        path: FieldPath,
        input: String,
    },
}

impl Edit {
    pub fn set(path: FieldPath, value: impl Into<Value>) -> Self {
        Edit::Set {
            path,
            value: value.into(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            Edit::Set { path, .. }
            | Edit::Append { path, .. }
            | Edit::Remove { path, .. }
            | Edit::Composite { path, .. }
            | Edit::Lines { path, .. } => path,
        }
    }

    /// Apply to `snapshot`, returning the next snapshot.
    pub fn apply(&self, snapshot: &Snapshot) -> Result<Snapshot> {
        match self {
            Edit::Set { path, value } => mutate::set(snapshot, path, value.clone()),
            Edit::Append { path, item: Some(item) } => mutate::append(snapshot, path, item.clone()),
            Edit::Append { path, item: None } => mutate::append_default(snapshot, path),
            Edit::Remove { path, index } => mutate::remove_at(snapshot, path, *index),
            Edit::Composite { path, kind, input } => {
                codec::apply_composite(snapshot, path, *kind, input)
            }
            Edit::Lines { path, input } => codec::apply_lines(snapshot, path, input),
        }
    }
}

/// Holds the current snapshot of the open document.
///
/// The snapshot is the single source of truth: every successful edit swaps
/// in a new one, and a failed edit leaves it exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    current: Option<Snapshot>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `doc`, replacing any document already open.
    pub fn load(&mut self, doc: &HandoverDocument) -> Result<()> {
        let snapshot = Snapshot::from_document(doc)?;
        if self.current.replace(snapshot).is_some() {
            tracing::debug!("replaced open document");
        }
        Ok(())
    }

    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.current = Some(snapshot);
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    fn open(&self) -> Result<&Snapshot> {
        self.current.as_ref().ok_or(EditError::NoDocument)
    }

    pub fn get(&self, path: &FieldPath) -> Result<Value> {
        mutate::get(self.open()?, path)
    }

    pub fn apply(&mut self, edit: &Edit) -> Result<&Snapshot> {
        let next = edit.apply(self.open()?).inspect_err(|e| {
            tracing::warn!(path = %edit.path(), error = %e, "edit rejected");
        })?;
        Ok(&*self.current.insert(next))
    }

    /// Apply `edits` in order. If any edit fails, none of them take effect.
    pub fn apply_all(&mut self, edits: &[Edit]) -> Result<&Snapshot> {
        let mut next = self.open()?.clone();
        for (i, edit) in edits.iter().enumerate() {
            next = edit.apply(&next).inspect_err(|e| {
                tracing::warn!(step = i, path = %edit.path(), error = %e, "edit batch rejected");
            })?;
        }
        Ok(&*self.current.insert(next))
    }

    pub fn document(&self) -> Result<HandoverDocument> {
        self.open()?.to_document()
    }

    pub fn to_json(&self) -> Result<String> {
        self.open()?.to_json()
    }

    /// Drop the open document without exporting it.
    pub fn discard(&mut self) -> Option<Snapshot> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn opened() -> Editor {
        let mut editor = Editor::new();
        editor.load(&HandoverDocument::default()).unwrap();
        editor
    }

    #[test]
    fn test_no_document() {
        let mut editor = Editor::new();
        assert!(!editor.is_open());
        assert!(matches!(
            editor.apply(&Edit::set(p("risks.issues"), "x")),
            Err(EditError::NoDocument)
        ));
    }

    #[test]
    fn test_apply_advances_snapshot() {
        let mut editor = opened();
        let before = editor.snapshot().unwrap().clone();
        editor.apply(&Edit::set(p("risks.issues"), "Audit")).unwrap();
        assert_eq!(editor.get(&p("risks.issues")).unwrap(), "Audit");
        assert_eq!(mutate::get(&before, &p("risks.issues")).unwrap(), "");
    }

    #[test]
    fn test_failed_edit_keeps_snapshot() {
        let mut editor = opened();
        let before = editor.snapshot().unwrap().clone();
        assert!(
            editor
                .apply(&Edit::Remove {
                    path: p("priorities"),
                    index: 0
                })
                .is_err()
        );
        assert_eq!(editor.snapshot().unwrap(), &before);
    }

    #[test]
    fn test_apply_all_is_atomic() {
        let mut editor = opened();
        let before = editor.snapshot().unwrap().clone();
        let edits = vec![
            Edit::Append {
                path: p("priorities"),
                item: None,
            },
            Edit::set(p("priorities.0.title"), "Migrate DB"),
            Edit::set(p("priorities.1.title"), "oops"),
        ];
        assert!(editor.apply_all(&edits).is_err());
        assert_eq!(editor.snapshot().unwrap(), &before);

        editor.apply_all(&edits[..2]).unwrap();
        assert_eq!(editor.get(&p("priorities.0.title")).unwrap(), "Migrate DB");
    }

    #[test]
    fn test_edit_script_from_json() {
        let script = r#"[
            {"op": "append", "path": "teamMembers"},
            {"op": "composite", "path": "teamMembers.0", "kind": "name-position", "input": "Kim (Manager)"},
            {"op": "lines", "path": "jobStatus.teamGoals", "input": "Ship v2\nHire SRE"},
            {"op": "append", "path": "checklist", "item": {"text": "Keys"}},
            {"op": "set", "path": "checklist.0.completed", "value": true},
            {"op": "append", "path": "ongoingProjects"},
            {"op": "set", "path": "ongoingProjects.0.progress", "value": "150"},
            {"op": "remove", "path": "ongoingProjects", "index": 0}
        ]"#;
        let edits: Vec<Edit> = serde_json::from_str(script).unwrap();
        let mut editor = opened();
        editor.apply_all(&edits).unwrap();

        let doc = editor.document().unwrap();
        assert_eq!(doc.team_members[0].name, "Kim");
        assert_eq!(doc.team_members[0].position, "Manager");
        assert_eq!(doc.job_status.team_goals, vec!["Ship v2", "Hire SRE"]);
        assert!(doc.checklist[0].completed);
        assert!(doc.ongoing_projects.is_empty());
    }

    #[test]
    fn test_edit_serializes_with_op_tag() {
        let json = serde_json::to_value(Edit::Remove {
            path: p("checklist"),
            index: 2,
        })
        .unwrap();
        assert_eq!(json, json!({"op": "remove", "path": "checklist", "index": 2}));
    }

    #[test]
    fn test_load_replaces_and_discard_drops() {
        let mut editor = opened();
        editor.apply(&Edit::set(p("overview.reason"), "Leave")).unwrap();

        editor.load(&HandoverDocument::default()).unwrap();
        assert_eq!(editor.get(&p("overview.reason")).unwrap(), "");

        assert!(editor.discard().is_some());
        assert!(editor.to_json().is_err());
    }
}
