//! Render handover documents as paginated printable text.
//!
//! The output follows the layout of the printed handover form: six numbered
//! sections followed by signature lines. Every empty field prints a fixed
//! fallback, so a blank document still yields a complete form.
//!
//! # Example
//!
//! ```
//! use handover::v1::{HandoverDocument, Person};
//! use handover_print::{render, PrintOptions};
//!
//! let mut doc = HandoverDocument::default();
//! doc.overview.transferor = Person::new("Kim", "Manager");
//!
//! let text = render(&doc, &PrintOptions::default());
//! assert!(text.contains("Transferor: Kim (Manager)"));
//! assert!(text.contains("Transferee: (name) ((position))"));
//! ```

use handover::v1::{HandoverDocument, Person};

pub const NAME_FALLBACK: &str = "(name)";
pub const POSITION_FALLBACK: &str = "(position)";
pub const NA: &str = "N/A";
pub const NO_DETAILS: &str = "No details";
pub const NOTHING_RECORDED: &str = "Nothing recorded";
pub const SIGNATURE_FALLBACK: &str = "(signature)";

/// Page separator between rendered pages.
pub const PAGE_BREAK: char = '\u{000C}';

/// Options controlling the printed layout.
pub struct PrintOptions {
    /// Content lines per page. `0` renders one unpaginated page without footer.
    pub lines_per_page: usize,
    /// Heading printed on the first line.
    pub title: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            lines_per_page: 60,
            title: "Role Handover".to_string(),
        }
    }
}

/// Render `doc` as printable text.
pub fn render(doc: &HandoverDocument, options: &PrintOptions) -> String {
    let mut lines = Vec::new();
    lines.push(options.title.clone());
    lines.push("=".repeat(options.title.chars().count().max(1)));

    render_overview(doc, &mut lines);
    render_job(doc, &mut lines);
    render_priorities(doc, &mut lines);
    render_projects(doc, &mut lines);
    render_risks(doc, &mut lines);
    render_resources(doc, &mut lines);
    render_signatures(doc, &mut lines);

    paginate(&lines, options.lines_per_page)
}

fn section(lines: &mut Vec<String>, number: u8, title: &str) {
    lines.push(String::new());
    lines.push(format!("{:02} {}", number, title));
    lines.push("-".repeat(40));
}

fn render_overview(doc: &HandoverDocument, lines: &mut Vec<String>) {
    let o = &doc.overview;
    section(lines, 1, "Overview");
    lines.push(format!("Transferor: {}", person(&o.transferor)));
    lines.push(format!("Transferee: {}", person(&o.transferee)));
    lines.push(format!("Period: {}", or(&o.period, NA)));
    lines.push(format!("Reason: {}", or(&o.reason, NO_DETAILS)));
}

fn render_job(doc: &HandoverDocument, lines: &mut Vec<String>) {
    let job = &doc.job_status;
    section(lines, 2, "Job");
    lines.push(format!("Title: {}", or(&job.title, NA)));
    lines.push("Responsibilities:".to_string());
    let items: Vec<&String> = job.responsibilities.iter().filter(|r| !r.trim().is_empty()).collect();
    if items.is_empty() {
        lines.push(format!("  {}", NOTHING_RECORDED));
    }
    for item in items {
        lines.push(format!("  - {}", item));
    }
}

fn render_priorities(doc: &HandoverDocument, lines: &mut Vec<String>) {
    section(lines, 3, "Priorities");
    if doc.priorities.is_empty() {
        lines.push(NOTHING_RECORDED.to_string());
        return;
    }
    lines.push("No | Title | Status | Deadline".to_string());
    for (i, p) in doc.priorities.iter().enumerate() {
        lines.push(format!(
            "{} | {} | {} | {}",
            i + 1,
            or(&p.title, NA),
            or(&p.status, NA),
            or(&p.deadline, NA)
        ));
    }
}

fn render_projects(doc: &HandoverDocument, lines: &mut Vec<String>) {
    section(lines, 4, "Ongoing projects");
    if doc.ongoing_projects.is_empty() {
        lines.push(NOTHING_RECORDED.to_string());
        return;
    }
    for p in &doc.ongoing_projects {
        lines.push(format!(
            "{} (owner: {}) {}%",
            or(&p.name, NA),
            or(&p.owner, NA),
            p.progress.min(100)
        ));
        lines.push(format!("  {}", or(&p.description, NO_DETAILS)));
    }
}

fn render_risks(doc: &HandoverDocument, lines: &mut Vec<String>) {
    section(lines, 5, "Issues and risks");
    lines.push(format!("Issues: {}", or(&doc.risks.issues, NO_DETAILS)));
    lines.push(format!("Risks: {}", or(&doc.risks.risks, NO_DETAILS)));
}

fn render_resources(doc: &HandoverDocument, lines: &mut Vec<String>) {
    section(lines, 6, "Documents");
    if doc.resources.docs.is_empty() {
        lines.push(NOTHING_RECORDED.to_string());
        return;
    }
    for d in &doc.resources.docs {
        lines.push(format!(
            "[{}] {} / {}",
            or(&d.category, NA),
            or(&d.name, NA),
            or(&d.location, NA)
        ));
    }
}

fn render_signatures(doc: &HandoverDocument, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("Signatures".to_string());
    lines.push("-".repeat(40));
    let signers = [
        ("Transferor", doc.overview.transferor.name.as_str()),
        ("Transferee", doc.overview.transferee.name.as_str()),
        ("Manager", doc.stakeholders.manager.as_str()),
    ];
    for (label, name) in signers {
        lines.push(format!(
            "{}: {}  {}",
            label,
            or(name, NAME_FALLBACK),
            SIGNATURE_FALLBACK
        ));
    }
}

fn person(p: &Person) -> String {
    format!(
        "{} ({})",
        or(&p.name, NAME_FALLBACK),
        or(&p.position, POSITION_FALLBACK)
    )
}

/// `value` unless it is blank, else `fallback`.
pub fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn paginate(lines: &[String], per_page: usize) -> String {
    if per_page == 0 {
        let mut out = lines.join("\n");
        out.push('\n');
        return out;
    }

    let pages: Vec<&[String]> = lines.chunks(per_page).collect();
    let total = pages.len();
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_BREAK);
        }
        for line in *page {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("- {} / {} -\n", i + 1, total));
    }
    out
}
