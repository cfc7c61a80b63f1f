use anyhow::{Context, Result};
use clap::Args;
use handover::v1::schema::{self, Schema};
use handover::v1::{Composite, Edit, Editor, FieldPath, Snapshot, mutate};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where a document is read from and written to.
#[derive(Args, Debug, Default)]
pub struct DocIo {
    /// Input file (reads from stdin if not provided)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn read_input(input: Option<&Path>) -> Result<String> {
    if let Some(path) = input {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    } else {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    }
}

pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
    } else {
        print!("{}", content);
        Ok(())
    }
}

fn read_snapshot(input: Option<&Path>) -> Result<Snapshot> {
    let content = read_input(input)?;
    let source = input.map_or_else(|| "stdin".to_string(), |p| format!("{:?}", p));
    Snapshot::from_json(&content).with_context(|| format!("Failed to parse {}", source))
}

fn write_snapshot(snapshot: &Snapshot, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        snapshot.to_json_pretty()?
    } else {
        snapshot.to_json()?
    };
    json.push('\n');
    write_output(output, &json)
}

fn to_json(value: &Value, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn parse_path(path: &str) -> Result<FieldPath> {
    FieldPath::parse(path).with_context(|| format!("Invalid path {:?}", path))
}

/// Text fields take `raw` verbatim; everything else is parsed as JSON,
/// falling back to a string so the schema can coerce or reject it.
fn parse_value(path: &FieldPath, raw: &str) -> Result<Value> {
    if let Schema::Text = schema::resolve(path)? {
        return Ok(Value::String(raw.to_string()));
    }
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Run `edit` against the document in `io` and write the result.
fn edit_document(io: DocIo, edit: Edit, pretty: bool) -> Result<()> {
    let mut editor = Editor::new();
    editor.load_snapshot(read_snapshot(io.input.as_deref())?);
    let next = editor
        .apply(&edit)
        .with_context(|| format!("Failed to edit `{}`", edit.path()))?;
    write_snapshot(next, io.output.as_deref(), pretty)
}

pub fn run_new(output: Option<PathBuf>, pretty: bool) -> Result<()> {
    write_snapshot(&Snapshot::default(), output.as_deref(), pretty)
}

pub fn run_get(input: Option<PathBuf>, path: &str, pretty: bool) -> Result<()> {
    let snapshot = read_snapshot(input.as_deref())?;
    let path = parse_path(path)?;
    let value = mutate::get(&snapshot, &path)?;
    match value {
        Value::String(s) => println!("{}", s),
        other => println!("{}", to_json(&other, pretty)?),
    }
    Ok(())
}

pub fn run_set(io: DocIo, path: &str, value: &str, pretty: bool) -> Result<()> {
    let path = parse_path(path)?;
    let value = parse_value(&path, value)?;
    edit_document(io, Edit::Set { path, value }, pretty)
}

pub fn run_append(io: DocIo, path: &str, item: Option<&str>, pretty: bool) -> Result<()> {
    let path = parse_path(path)?;
    let item = item
        .map(|raw| serde_json::from_str::<Value>(raw).with_context(|| format!("Invalid item JSON {:?}", raw)))
        .transpose()?;
    edit_document(io, Edit::Append { path, item }, pretty)
}

pub fn run_remove(io: DocIo, path: &str, index: usize, pretty: bool) -> Result<()> {
    let path = parse_path(path)?;
    edit_document(io, Edit::Remove { path, index }, pretty)
}

pub fn run_composite(
    io: DocIo,
    path: &str,
    kind: Composite,
    text: &str,
    pretty: bool,
) -> Result<()> {
    let path = parse_path(path)?;
    edit_document(
        io,
        Edit::Composite {
            path,
            kind,
            input: text.to_string(),
        },
        pretty,
    )
}

pub fn run_apply(io: DocIo, script: PathBuf, pretty: bool) -> Result<()> {
    let content =
        std::fs::read_to_string(&script).with_context(|| format!("Failed to read {:?}", script))?;
    let edits: Vec<Edit> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", script))?;

    let mut editor = Editor::new();
    editor.load_snapshot(read_snapshot(io.input.as_deref())?);
    let next = editor
        .apply_all(&edits)
        .context("Edit script rejected, document unchanged")?;
    tracing::info!(edits = edits.len(), "applied edit script");
    write_snapshot(next, io.output.as_deref(), pretty)
}

pub fn run_template(path: &str, pretty: bool) -> Result<()> {
    let path = parse_path(path)?;
    let value = schema::template(&path)?;
    println!("{}", to_json(&value, pretty)?);
    Ok(())
}
