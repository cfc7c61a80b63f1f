use anyhow::{Context, Result};
use handover::v1::Snapshot;
use std::path::PathBuf;

pub fn run(input: PathBuf) -> Result<()> {
    let content =
        std::fs::read_to_string(&input).with_context(|| format!("Failed to read {:?}", input))?;
    println!("{}", validate_content(&content)?);
    Ok(())
}

fn validate_content(content: &str) -> Result<String> {
    let doc = Snapshot::from_json(content)
        .and_then(|s| s.to_document())
        .map_err(|e| anyhow::anyhow!("Invalid: {}", e))?;
    Ok(format!(
        "Valid: handover document ({} priorities, {} projects, {} checklist items)",
        doc.priorities.len(),
        doc.ongoing_projects.len(),
        doc.checklist.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_empty_object() {
        let summary = validate_content("{}").unwrap();
        assert!(summary.contains("0 priorities"));
    }

    #[test]
    fn test_validate_counts() {
        let json = r#"{"priorities":[{"title":"Migrate DB"}],"checklist":[{"text":"Keys","completed":true}]}"#;
        let summary = validate_content(json).unwrap();
        assert!(summary.contains("1 priorities"));
        assert!(summary.contains("1 checklist items"));
    }

    #[test]
    fn test_validate_invalid_json() {
        assert!(validate_content("not json").is_err());
    }

    #[test]
    fn test_validate_unknown_field() {
        let err = validate_content(r#"{"jobStatus":{"salary":"x"}}"#).unwrap_err();
        assert!(err.to_string().contains("jobStatus.salary"));
    }

    #[test]
    fn test_validate_wrong_kind() {
        assert!(validate_content(r#"{"priorities":{"title":"x"}}"#).is_err());
    }

    #[test]
    fn test_run_with_temp_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"overview":{{"reason":"Reassignment"}}}}"#).unwrap();
        f.flush().unwrap();
        assert!(run(f.path().to_path_buf()).is_ok());
    }

    #[test]
    fn test_run_nonexistent_file() {
        assert!(run(PathBuf::from("/nonexistent/file.json")).is_err());
    }
}
