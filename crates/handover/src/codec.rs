//! Composite display fields: one editable string packing two underlying
//! fields, decomposed back into field writes on edit.
//!
//! The canonical document always keeps the fields separate. Splitting on a
//! delimiter is a guess about the user's intent: a name that itself contains
//! `" ("` is split at its first occurrence. That ambiguity is accepted here
//! and nowhere else.

use crate::error::Result;
use crate::mutate;
use crate::path::FieldPath;
use crate::tree::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The composite patterns used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Composite {
    /// `"{name} ({position})"`
    NamePosition,
    /// `"{status} / {deadline}"`
    StatusDeadline,
}

impl Composite {
    /// Record field names for the left and right halves.
    pub fn fields(self) -> (&'static str, &'static str) {
        match self {
            Composite::NamePosition => ("name", "position"),
            Composite::StatusDeadline => ("status", "deadline"),
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            Composite::NamePosition => " (",
            Composite::StatusDeadline => " / ",
        }
    }

    pub fn pack(self, left: &str, right: &str) -> String {
        match self {
            Composite::NamePosition => format!("{} ({})", left, right),
            Composite::StatusDeadline => format!("{} / {}", left, right),
        }
    }

    /// Split `input` on the first delimiter into `(left, right)`.
    ///
    /// Both halves are trimmed; for [`Composite::NamePosition`] one trailing
    /// `)` is also stripped from the right. Without a delimiter the whole
    /// input becomes the left field verbatim and the right field keeps its
    /// `previous` value.
    ///
    /// ```
    /// use handover::v1::Composite;
    ///
    /// let packed = Composite::NamePosition.pack("Kim", "Manager");
    /// assert_eq!(packed, "Kim (Manager)");
    /// assert_eq!(
    ///     Composite::NamePosition.unpack(&packed, ("", "")),
    ///     ("Kim".to_string(), "Manager".to_string())
    /// );
    ///
    /// // Editing only the visible left part keeps the right field.
    /// assert_eq!(
    ///     Composite::NamePosition.unpack("Kim", ("Kim", "Manager")),
    ///     ("Kim".to_string(), "Manager".to_string())
    /// );
    ///
    /// assert_eq!(
    ///     Composite::StatusDeadline.unpack("진행 / 2024.12.31", ("", "")),
    ///     ("진행".to_string(), "2024.12.31".to_string())
    /// );
    /// ```
    pub fn unpack(self, input: &str, previous: (&str, &str)) -> (String, String) {
        let (_, previous_right) = previous;
        match input.split_once(self.delimiter()) {
            Some((left, right)) => {
                let right = right.trim();
                let right = match self {
                    Composite::NamePosition => right.strip_suffix(')').unwrap_or(right).trim(),
                    Composite::StatusDeadline => right,
                };
                (left.trim().to_string(), right.to_string())
            }
            None => (input.to_string(), previous_right.to_string()),
        }
    }
}

impl std::fmt::Display for Composite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Composite::NamePosition => write!(f, "name-position"),
            Composite::StatusDeadline => write!(f, "status-deadline"),
        }
    }
}

impl std::str::FromStr for Composite {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "name-position" => Ok(Composite::NamePosition),
            "status-deadline" => Ok(Composite::StatusDeadline),
            other => Err(format!("unknown composite `{}`", other)),
        }
    }
}

/// Display string for the composite field of the record at `record`.
pub fn read_composite(snapshot: &Snapshot, record: &FieldPath, composite: Composite) -> Result<String> {
    let (left, right) = composite.fields();
    let left = mutate::get_text(snapshot, &record.key(left))?;
    let right = mutate::get_text(snapshot, &record.key(right))?;
    Ok(composite.pack(&left, &right))
}

/// Unpack `input` and write both halves into the record at `record`.
///
/// Both writes land in the returned snapshot or neither does.
pub fn apply_composite(
    snapshot: &Snapshot,
    record: &FieldPath,
    composite: Composite,
    input: &str,
) -> Result<Snapshot> {
    let (left_field, right_field) = composite.fields();
    let left_path = record.key(left_field);
    let right_path = record.key(right_field);

    let previous_left = mutate::get_text(snapshot, &left_path)?;
    let previous_right = mutate::get_text(snapshot, &right_path)?;
    let (left, right) = composite.unpack(input, (&previous_left, &previous_right));

    let next = mutate::set(snapshot, &left_path, Value::String(left))?;
    mutate::set(&next, &right_path, Value::String(right))
}

/// Join list items one per line, for multi-line editors.
pub fn pack_lines(items: &[String]) -> String {
    items.join("\n")
}

/// Split a multi-line editor's text into list items. Empty lines are kept,
/// so `unpack_lines(&pack_lines(x)) == x` for items without newlines.
pub fn unpack_lines(input: &str) -> Vec<String> {
    input.split('\n').map(str::to_string).collect()
}

/// Replace the text list at `path` with the lines of `input`.
pub fn apply_lines(snapshot: &Snapshot, path: &FieldPath, input: &str) -> Result<Snapshot> {
    let items = unpack_lines(input).into_iter().map(Value::String).collect();
    mutate::set(snapshot, path, Value::Array(items))
}
