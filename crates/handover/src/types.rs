use serde::{Deserialize, Deserializer, Serialize};

/// A role handover document, the single editable entity.
///
/// The document is a tree of records and ordered lists. Every field is always
/// present after deserialization: text fields default to `""`, lists to `[]`,
/// so a [`FieldPath`](crate::path::FieldPath) that the schema accepts can be
/// walked without ever creating intermediate containers.
///
/// Field names on the wire are camelCase, and paths use the wire names
/// (`"jobStatus.reportingLine"`, `"ongoingProjects.0.progress"`).
///
/// # JSON shape
///
/// ```json
/// {
///   "overview": {
///     "transferor": { "name": "Kim", "position": "Manager", "contact": "", "startDate": "" },
///     "transferee": { "name": "Lee", "position": "Lead", "contact": "", "startDate": "2025-01-02" },
///     "reason": "Reassignment", "background": "", "period": "2 weeks", "schedule": []
///   },
///   "jobStatus": { "title": "Ops", "responsibilities": ["Billing"], … },
///   "priorities": [ { "title": "Migrate DB", "status": "진행", "deadline": "2024.12.31" } ],
///   …
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandoverDocument {
    #[serde(deserialize_with = "nullable")]
    pub overview: Overview,
    #[serde(deserialize_with = "nullable")]
    pub job_status: JobStatus,
    #[serde(deserialize_with = "nullable")]
    pub priorities: Vec<Priority>,
    #[serde(deserialize_with = "nullable")]
    pub stakeholders: Stakeholders,
    #[serde(deserialize_with = "nullable")]
    pub team_members: Vec<TeamMember>,
    #[serde(deserialize_with = "nullable")]
    pub ongoing_projects: Vec<Project>,
    #[serde(deserialize_with = "nullable")]
    pub risks: Risks,
    #[serde(deserialize_with = "nullable")]
    pub roadmap: Roadmap,
    #[serde(deserialize_with = "nullable")]
    pub resources: Resources,
    #[serde(deserialize_with = "nullable")]
    pub checklist: Vec<ChecklistItem>,
}

// ============================================================================
// Overview
// ============================================================================

/// Who hands over to whom, why, and when.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overview {
    #[serde(deserialize_with = "nullable")]
    pub transferor: Person,
    #[serde(deserialize_with = "nullable")]
    pub transferee: Person,
    #[serde(deserialize_with = "nullable")]
    pub reason: String,
    #[serde(deserialize_with = "nullable")]
    pub background: String,
    #[serde(deserialize_with = "nullable")]
    pub period: String,
    #[serde(deserialize_with = "nullable")]
    pub schedule: Vec<ScheduleEntry>,
}

/// One side of the handover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub position: String,
    #[serde(deserialize_with = "nullable")]
    pub contact: String,
    #[serde(deserialize_with = "nullable")]
    pub start_date: String,
}

/// Handover schedule entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleEntry {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub activity: String,
}

// ============================================================================
// Job
// ============================================================================

/// The role being handed over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub authority: String,
    #[serde(deserialize_with = "nullable")]
    pub reporting_line: String,
    #[serde(deserialize_with = "nullable")]
    pub team_mission: String,
    #[serde(deserialize_with = "nullable")]
    pub team_goals: Vec<String>,
}

/// A priority task. Rank is implied by position in
/// [`HandoverDocument::priorities`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Priority {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub deadline: String,
}

// ============================================================================
// People
// ============================================================================

/// Stakeholders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stakeholders {
    #[serde(deserialize_with = "nullable")]
    pub manager: String,
    #[serde(deserialize_with = "nullable")]
    pub internal: Vec<Contact>,
    #[serde(deserialize_with = "nullable")]
    pub external: Vec<Contact>,
}

/// A stakeholder and the role they play.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub role: String,
}

/// Team member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub position: String,
    #[serde(deserialize_with = "nullable")]
    pub role: String,
    #[serde(deserialize_with = "nullable")]
    pub notes: String,
}

// ============================================================================
// Work in flight
// ============================================================================

/// An ongoing project.
///
/// `progress` is a percentage in `0..=100`. Reads and exports clamp it, so
/// a value set above 100 in code still exports as 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub owner: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(with = "progress")]
    pub progress: u8,
    #[serde(deserialize_with = "nullable")]
    pub deadline: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

/// Risks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risks {
    #[serde(deserialize_with = "nullable")]
    pub issues: String,
    #[serde(deserialize_with = "nullable")]
    pub risks: String,
}

/// Roadmap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Roadmap {
    #[serde(deserialize_with = "nullable")]
    pub short_term: String,
    #[serde(deserialize_with = "nullable")]
    pub long_term: String,
}

// ============================================================================
// Resources
// ============================================================================

/// Documents, systems, and people the transferee needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    #[serde(deserialize_with = "nullable")]
    pub docs: Vec<DocRef>,
    #[serde(deserialize_with = "nullable")]
    pub systems: Vec<SystemRef>,
    #[serde(deserialize_with = "nullable")]
    pub contacts: Vec<ResourceContact>,
}

/// Reference document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocRef {
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub location: String,
}

/// System access entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemRef {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub usage: String,
    #[serde(deserialize_with = "nullable")]
    pub contact: String,
}

/// Contact entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceContact {
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub position: String,
    #[serde(deserialize_with = "nullable")]
    pub contact: String,
}

/// Checklist item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistItem {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub completed: bool,
}

// ============================================================================
// Generation boundary
// ============================================================================

/// An uploaded source artifact handed to a [`GenerationService`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    /// Base64-encoded file body.
    pub content: String,
    pub mime_type: String,
}

/// Produces a complete [`HandoverDocument`] from uploaded sources.
///
/// The result seeds an [`Editor`](crate::editor::Editor) and replaces any
/// previous document wholesale.
pub trait GenerationService {
    type Error: std::error::Error + Send + Sync + 'static;

    fn generate(&self, sources: &[SourceFile]) -> Result<HandoverDocument, Self::Error>;
}

// ============================================================================
// Lenient field readers
// ============================================================================

/// `null` reads as the field's default, the same as a missing key.
fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Progress percentage: numbers, numeric strings, or `null`, clamped to
/// `0..=100` on both read and write.
mod progress {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &u8, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u8((*value).min(100))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<u8, D::Error> {
        let value = Value::deserialize(de)?;
        if value.is_array() || value.is_object() {
            return Err(D::Error::custom("expected a progress percentage"));
        }
        let clamped = crate::schema::to_int(&value).clamp(0, 100);
        u8::try_from(clamped).map_err(D::Error::custom)
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

impl HandoverDocument {
    /// Parse a handover document from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Person {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            ..Default::default()
        }
    }
}

impl Priority {
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            deadline: deadline.into(),
        }
    }
}
