#![doc = include_str!("../README.md")]

mod codec;
mod editor;
mod error;
mod mutate;
mod path;
mod schema;
mod tree;
mod types;

pub mod v1 {
    //! Versioned public API for handover documents and edits.
    //!
    //! # Documents
    //!
    //! - [`HandoverDocument`]: the typed document, with one struct per section
    //! - [`Snapshot`]: an immutable, structurally shared value of a document
    //! - [`SourceFile`] / [`GenerationService`]: the generation boundary
    //!
    //! # Addressing
    //!
    //! - [`FieldPath`] / [`Segment`]: dotted paths such as `"priorities.0.title"`
    //! - [`schema`]: the static shape every path and value is checked against
    //!
    //! # Editing
    //!
    //! - [`mutate`]: `get`, `set`, `append`, `remove_at` on snapshots
    //! - [`Composite`] and [`codec`]: two-part display fields and line lists
    //! - [`Edit`] / [`Editor`]: edit events and the open document
    //!
    //! # Example: edit a team member through its composite field
    //!
    //! ```
    //! use handover::v1::*;
    //!
    //! let snap = Snapshot::default();
    //! let team = FieldPath::parse("teamMembers").unwrap();
    //! let snap = mutate::append_default(&snap, &team).unwrap();
    //!
    //! let member = team.index(0);
    //! let snap = codec::apply_composite(&snap, &member, Composite::NamePosition, "Kim (Manager)").unwrap();
    //! assert_eq!(mutate::get(&snap, &member.key("position")).unwrap(), "Manager");
    //!
    //! // Editing only the name keeps the position.
    //! let snap = codec::apply_composite(&snap, &member, Composite::NamePosition, "Kim Jisoo").unwrap();
    //! assert_eq!(
    //!     codec::read_composite(&snap, &member, Composite::NamePosition).unwrap(),
    //!     "Kim Jisoo (Manager)"
    //! );
    //! ```

    /// Path-addressed reads and edits over snapshots.
    pub mod mutate {
        pub use crate::mutate::{
            append, append_default, get, get_text, len, remove_at, set,
        };
    }

    /// Composite field and line-list codecs.
    pub mod codec {
        pub use crate::codec::{apply_composite, apply_lines, pack_lines, read_composite, unpack_lines};
    }

    /// Static document schema.
    pub mod schema {
        pub use crate::schema::{DOCUMENT, Schema, resolve, template};
    }

    pub use crate::codec::Composite;
    pub use crate::editor::{Edit, Editor};
    pub use crate::error::{EditError, Result};
    pub use crate::path::{FieldPath, Segment};
    pub use crate::tree::{Node, Snapshot};
    pub use crate::types::{
        ChecklistItem, Contact, DocRef, GenerationService, HandoverDocument, JobStatus, Overview,
        Person, Priority, Project, ResourceContact, Resources, Risks, Roadmap, ScheduleEntry,
        SourceFile, Stakeholders, SystemRef, TeamMember,
    };
}
