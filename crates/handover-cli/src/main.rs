mod cmd_doc;
mod cmd_render;
mod cmd_session;
mod cmd_stats;
mod cmd_validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use handover::v1::Composite;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "handover")]
#[command(about = "Edit, render, and discuss role handover documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log edits and requests to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write an empty handover document
    New {
        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the value at a path
    Get {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Dotted field path, e.g. "priorities.0.title"
        #[arg(long)]
        path: String,
    },
    /// Replace the value at a path
    Set {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        #[arg(long)]
        path: String,

        /// New value. Text fields take it verbatim, other fields parse it as JSON
        #[arg(long)]
        value: String,
    },
    /// Append an item to a list
    Append {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        #[arg(long)]
        path: String,

        /// Item as JSON (the list's empty template if not provided)
        #[arg(long)]
        item: Option<String>,
    },
    /// Remove a list item by index
    Remove {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        #[arg(long)]
        path: String,

        #[arg(long)]
        index: usize,
    },
    /// Write a two-part display field such as "Kim (Manager)"
    Composite {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        /// Path of the record holding both fields
        #[arg(long)]
        path: String,

        /// name-position or status-deadline
        #[arg(long)]
        kind: Composite,

        /// The display text to unpack
        #[arg(long)]
        text: String,
    },
    /// Apply a JSON script of edits, all or nothing
    Apply {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        /// File holding a JSON array of edits
        #[arg(long)]
        script: PathBuf,
    },
    /// Check that a document matches the handover schema
    Validate {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Render a document as paginated printable text
    Render {
        #[command(flatten)]
        io: cmd_doc::DocIo,

        /// Content lines per page (0 disables pagination)
        #[arg(long, default_value_t = 60)]
        lines_per_page: usize,

        /// Heading on the first page
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the empty value for a path, e.g. a new list item
    Template {
        #[arg(long)]
        path: String,
    },
    /// Manage chat sessions in a JSON store file
    Session {
        /// Session store file
        #[arg(long, env = "HANDOVER_SESSIONS", default_value = "sessions.json")]
        store: PathBuf,

        #[command(subcommand)]
        op: cmd_session::SessionOp,
    },
    /// Poll backend document statistics
    Stats {
        /// Backend base URL
        #[arg(long, env = "HANDOVER_STATS_URL", default_value = "http://localhost:8000")]
        url: String,

        /// Index to query
        #[arg(long)]
        index: Option<String>,

        /// Milliseconds between polls
        #[arg(long, default_value_t = 5000)]
        interval_ms: u64,

        /// Number of polls before exiting
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::New { output } => cmd_doc::run_new(output, cli.pretty),
        Commands::Get { input, path } => cmd_doc::run_get(input, &path, cli.pretty),
        Commands::Set { io, path, value } => cmd_doc::run_set(io, &path, &value, cli.pretty),
        Commands::Append { io, path, item } => {
            cmd_doc::run_append(io, &path, item.as_deref(), cli.pretty)
        }
        Commands::Remove { io, path, index } => cmd_doc::run_remove(io, &path, index, cli.pretty),
        Commands::Composite {
            io,
            path,
            kind,
            text,
        } => cmd_doc::run_composite(io, &path, kind, &text, cli.pretty),
        Commands::Apply { io, script } => cmd_doc::run_apply(io, script, cli.pretty),
        Commands::Validate { input } => cmd_validate::run(input),
        Commands::Render {
            io,
            lines_per_page,
            title,
        } => cmd_render::run(io, lines_per_page, title),
        Commands::Template { path } => cmd_doc::run_template(&path, cli.pretty),
        Commands::Session { store, op } => cmd_session::run(op, store, cli.pretty),
        Commands::Stats {
            url,
            index,
            interval_ms,
            count,
        } => cmd_stats::run(url, index, interval_ms, count, cli.pretty),
    }
}
