//! Symbolic field paths like `"ongoingProjects.0.progress"`.

use crate::error::{EditError, Result};
use std::fmt;
use std::str::FromStr;

/// One step of a [`FieldPath`]: a record key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// An ordered sequence of [`Segment`]s addressing one field or element.
///
/// Dotted strings parse segment-by-segment; an all-digit segment is an
/// index, anything else is a key.
///
/// ```
/// use handover::v1::{FieldPath, Segment};
///
/// let path: FieldPath = "priorities.0.title".parse().unwrap();
/// assert_eq!(path.segments()[1], Segment::Index(0));
/// assert_eq!(path.to_string(), "priorities.0.title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(EditError::path(s, "empty path"));
        }
        let segments = s
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    Err(EditError::path(s, "empty segment"))
                } else if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| EditError::path(s, format!("index `{}` too large", part)))
                } else {
                    Ok(Segment::Key(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// The empty path, addressing the whole document.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn key(&self, key: &str) -> Self {
        self.child(Segment::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }
}

impl FromStr for FieldPath {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = EditError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for FieldPath {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_indices() {
        let p = FieldPath::parse("ongoingProjects.12.progress").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("ongoingProjects".into()),
                Segment::Index(12),
                Segment::Key("progress".into()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("overview..reason").is_err());
        assert!(FieldPath::parse("overview.").is_err());
    }

    #[test]
    fn test_parse_rejects_huge_index() {
        assert!(FieldPath::parse("priorities.99999999999999999999999").is_err());
    }

    #[test]
    fn test_child_builders() {
        let p = FieldPath::parse("teamMembers").unwrap().index(2).key("name");
        assert_eq!(p.to_string(), "teamMembers.2.name");
    }

    #[test]
    fn test_serde_as_string() {
        let p: FieldPath = serde_json::from_str("\"risks.issues\"").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"risks.issues\"");
        assert!(serde_json::from_str::<FieldPath>("\"a..b\"").is_err());
    }
}
