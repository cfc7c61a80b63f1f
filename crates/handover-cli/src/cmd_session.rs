use anyhow::{Context, Result};
use clap::Subcommand;
use handover_convo::{ChatMessage, Role, SessionStore};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum SessionOp {
    /// Create a session and make it active
    New {
        /// Session title ("New chat N" if not provided)
        #[arg(long)]
        title: Option<String>,
    },
    /// List sessions with a preview of their last message
    List {
        /// Preview length in characters
        #[arg(long, default_value_t = 40)]
        preview: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a session active (unknown ids are ignored)
    Select { id: String },
    /// Append a message to a session
    Append {
        /// Session id (the active session if not provided)
        #[arg(long)]
        id: Option<String>,

        #[arg(long, default_value = "user")]
        role: Role,

        text: String,
    },
    /// Print a session's messages
    Show {
        /// Session id (the active session if not provided)
        id: Option<String>,
    },
}

pub fn run(op: SessionOp, store_path: PathBuf, pretty: bool) -> Result<()> {
    let mut store = load(&store_path)?;
    match op {
        SessionOp::New { title } => {
            let id = store.create_session(title.as_deref());
            save(&store, &store_path)?;
            println!("{}", id);
        }
        SessionOp::List { preview, json } => {
            let summaries = store.summaries(preview);
            if json {
                let out = if pretty {
                    serde_json::to_string_pretty(&summaries)?
                } else {
                    serde_json::to_string(&summaries)?
                };
                println!("{}", out);
            } else {
                for s in &summaries {
                    let marker = if s.active { "*" } else { " " };
                    println!(
                        "{} {}  {}  ({} messages)  {}",
                        marker, s.id, s.title, s.message_count, s.preview
                    );
                }
            }
        }
        SessionOp::Select { id } => {
            if store.select_session(&id) {
                save(&store, &store_path)?;
            } else {
                tracing::warn!(session = %id, "no such session, selection unchanged");
            }
        }
        SessionOp::Append { id, role, text } => {
            let id = resolve_id(&store, id)?;
            let message = match role {
                Role::User => ChatMessage::user(text),
                Role::Assistant => ChatMessage::assistant(text),
            };
            store.append_message(&id, message)?;
            save(&store, &store_path)?;
        }
        SessionOp::Show { id } => {
            let id = resolve_id(&store, id)?;
            let session = store
                .session(&id)
                .with_context(|| format!("session not found: {}", id))?;
            let updated = session.updated_at.with_timezone(&chrono::Local);
            println!("# {} (updated {})", session.title, updated.format("%Y-%m-%d %H:%M"));
            for m in &session.messages {
                println!("[{}] {}", m.role, m.text);
            }
        }
    }
    Ok(())
}

fn resolve_id(store: &SessionStore, id: Option<String>) -> Result<String> {
    match id {
        Some(id) => Ok(id),
        None => store
            .active_session_id()
            .map(str::to_string)
            .context("No active session; pass an id or run `session new`"),
    }
}

fn load(path: &Path) -> Result<SessionStore> {
    SessionStore::load(path).with_context(|| format!("Failed to load sessions from {:?}", path))
}

fn save(store: &SessionStore, path: &Path) -> Result<()> {
    store
        .save(path)
        .with_context(|| format!("Failed to save sessions to {:?}", path))
}
