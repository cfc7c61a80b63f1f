//! Static shape of a [`HandoverDocument`](crate::types::HandoverDocument).
//!
//! Every path is checked against this table before a snapshot is touched, and
//! every written value is normalized through it. The table mirrors the serde
//! model in `types.rs`; `test_default_value_matches_model` keeps them in step.

use crate::error::{EditError, Result};
use crate::path::{FieldPath, Segment};
use serde_json::{Map, Value};

/// Shape of one node in the document tree.
#[derive(Debug, PartialEq, Eq)]
pub enum Schema {
    Text,
    Flag,
    /// Integer clamped to `min..=max` on write.
    Int { min: i64, max: i64 },
    List(&'static Schema),
    Record(&'static [(&'static str, Schema)]),
}

const LINES: Schema = Schema::List(&Schema::Text);

const PERSON: Schema = Schema::Record(&[
    ("name", Schema::Text),
    ("position", Schema::Text),
    ("contact", Schema::Text),
    ("startDate", Schema::Text),
]);

const SCHEDULE_ENTRY: Schema = Schema::Record(&[("date", Schema::Text), ("activity", Schema::Text)]);

const PRIORITY: Schema = Schema::Record(&[
    ("title", Schema::Text),
    ("status", Schema::Text),
    ("deadline", Schema::Text),
]);

const CONTACT: Schema = Schema::Record(&[("name", Schema::Text), ("role", Schema::Text)]);

const TEAM_MEMBER: Schema = Schema::Record(&[
    ("name", Schema::Text),
    ("position", Schema::Text),
    ("role", Schema::Text),
    ("notes", Schema::Text),
]);

const PROJECT: Schema = Schema::Record(&[
    ("name", Schema::Text),
    ("owner", Schema::Text),
    ("status", Schema::Text),
    ("progress", Schema::Int { min: 0, max: 100 }),
    ("deadline", Schema::Text),
    ("description", Schema::Text),
]);

const DOC_REF: Schema = Schema::Record(&[
    ("category", Schema::Text),
    ("name", Schema::Text),
    ("location", Schema::Text),
]);

const SYSTEM_REF: Schema = Schema::Record(&[
    ("name", Schema::Text),
    ("usage", Schema::Text),
    ("contact", Schema::Text),
]);

const RESOURCE_CONTACT: Schema = Schema::Record(&[
    ("category", Schema::Text),
    ("name", Schema::Text),
    ("position", Schema::Text),
    ("contact", Schema::Text),
]);

const CHECKLIST_ITEM: Schema = Schema::Record(&[("text", Schema::Text), ("completed", Schema::Flag)]);

/// Root of the table.
pub static DOCUMENT: Schema = Schema::Record(&[
    (
        "overview",
        Schema::Record(&[
            ("transferor", PERSON),
            ("transferee", PERSON),
            ("reason", Schema::Text),
            ("background", Schema::Text),
            ("period", Schema::Text),
            ("schedule", Schema::List(&SCHEDULE_ENTRY)),
        ]),
    ),
    (
        "jobStatus",
        Schema::Record(&[
            ("title", Schema::Text),
            ("responsibilities", LINES),
            ("authority", Schema::Text),
            ("reportingLine", Schema::Text),
            ("teamMission", Schema::Text),
            ("teamGoals", LINES),
        ]),
    ),
    ("priorities", Schema::List(&PRIORITY)),
    (
        "stakeholders",
        Schema::Record(&[
            ("manager", Schema::Text),
            ("internal", Schema::List(&CONTACT)),
            ("external", Schema::List(&CONTACT)),
        ]),
    ),
    ("teamMembers", Schema::List(&TEAM_MEMBER)),
    ("ongoingProjects", Schema::List(&PROJECT)),
    (
        "risks",
        Schema::Record(&[("issues", Schema::Text), ("risks", Schema::Text)]),
    ),
    (
        "roadmap",
        Schema::Record(&[("shortTerm", Schema::Text), ("longTerm", Schema::Text)]),
    ),
    (
        "resources",
        Schema::Record(&[
            ("docs", Schema::List(&DOC_REF)),
            ("systems", Schema::List(&SYSTEM_REF)),
            ("contacts", Schema::List(&RESOURCE_CONTACT)),
        ]),
    ),
    ("checklist", Schema::List(&CHECKLIST_ITEM)),
]);

/// Resolve `path` against the document schema without touching any data.
///
/// Unknown keys, a key where an index belongs (or vice versa), and segments
/// past a leaf are all rejected here, so no edit can start on a path that
/// could never succeed.
pub fn resolve(path: &FieldPath) -> Result<&'static Schema> {
    let mut current: &'static Schema = &DOCUMENT;
    for seg in path.segments() {
        current = match (current, seg) {
            (Schema::Record(fields), Segment::Key(key)) => fields
                .iter()
                .find(|(name, _)| *name == key.as_str())
                .map(|(_, schema)| schema)
                .ok_or_else(|| EditError::path(path.to_string(), format!("unknown field `{}`", key)))?,
            (Schema::List(elem), Segment::Index(_)) => *elem,
            (Schema::Record(_), Segment::Index(i)) => {
                return Err(EditError::path(
                    path.to_string(),
                    format!("index {} used on a record", i),
                ));
            }
            (Schema::List(_), Segment::Key(key)) => {
                return Err(EditError::path(
                    path.to_string(),
                    format!("key `{}` used on a list", key),
                ));
            }
            (leaf, seg) => {
                return Err(EditError::path(
                    path.to_string(),
                    format!("`{}` goes past a {} field", seg, leaf.kind()),
                ));
            }
        };
    }
    Ok(current)
}

/// Default item for the list at `path`, the template used by
/// [`append_default`](crate::mutate::append_default).
pub fn template(path: &FieldPath) -> Result<Value> {
    match resolve(path)? {
        Schema::List(elem) => Ok(elem.default_value()),
        other => Err(EditError::path(
            path.to_string(),
            format!("not a list ({})", other.kind()),
        )),
    }
}

impl Schema {
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Text => "text",
            Schema::Flag => "flag",
            Schema::Int { .. } => "integer",
            Schema::List(_) => "list",
            Schema::Record(_) => "record",
        }
    }

    /// The empty value: `""`, `false`, zero clamped into range, `[]`, or a
    /// record of defaults.
    pub fn default_value(&self) -> Value {
        match self {
            Schema::Text => Value::String(String::new()),
            Schema::Flag => Value::Bool(false),
            Schema::Int { min, max } => Value::from(0i64.clamp(*min, *max)),
            Schema::List(_) => Value::Array(Vec::new()),
            Schema::Record(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.default_value()))
                    .collect(),
            ),
        }
    }

    /// Normalize `value` to this shape. `path` is only used for error messages.
    ///
    /// `null` always means "absent" and becomes the default. Integers accept
    /// numbers or numeric strings and are clamped; anything non-numeric is 0.
    pub fn coerce(&self, value: Value, path: &FieldPath) -> Result<Value> {
        if value.is_null() {
            return Ok(self.default_value());
        }
        match (self, value) {
            (Schema::Text, Value::String(s)) => Ok(Value::String(s)),
            (Schema::Flag, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Schema::Int { min, max }, v @ (Value::Number(_) | Value::String(_) | Value::Bool(_))) => {
                Ok(Value::from(to_int(&v).clamp(*min, *max)))
            }
            (Schema::List(elem), Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| elem.coerce(item, &path.index(i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            (Schema::Record(fields), Value::Object(mut obj)) => {
                if let Some(unknown) = obj.keys().find(|k| !fields.iter().any(|(n, _)| *n == k.as_str())) {
                    return Err(EditError::path(
                        path.key(unknown).to_string(),
                        format!("unknown field `{}`", unknown),
                    ));
                }
                let mut out = Map::new();
                for (name, schema) in fields.iter() {
                    let v = obj.remove(*name).unwrap_or(Value::Null);
                    out.insert(name.to_string(), schema.coerce(v, &path.key(name))?);
                }
                Ok(Value::Object(out))
            }
            (schema, _) => Err(EditError::value(path.to_string(), schema.kind())),
        }
    }
}

/// Integer view of a scalar, the way a form field's text is read: a leading
/// optionally-signed run of digits, otherwise 0.
pub(crate) fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        _ => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -magnitude } else { magnitude }
}
