use crate::cmd_doc::{DocIo, read_input, write_output};
use anyhow::{Context, Result};
use handover::v1::Snapshot;
use handover_print::PrintOptions;

pub fn run(io: DocIo, lines_per_page: usize, title: Option<String>) -> Result<()> {
    let content = read_input(io.input.as_deref())?;
    let doc = Snapshot::from_json(&content)
        .and_then(|s| s.to_document())
        .context("Failed to parse handover document")?;

    let mut options = PrintOptions {
        lines_per_page,
        ..Default::default()
    };
    if let Some(title) = title {
        options.title = title;
    }

    let text = handover_print::render(&doc, &options);
    write_output(io.output.as_deref(), &text)
}
