use crate::{Result, Stats, StatsSource};

/// Index queried when none is selected.
pub const DEFAULT_INDEX: &str = "documents-index";

/// Reads [`Stats`] from `GET {base_url}/api/upload/stats?index_name={index}`.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: reqwest::Client,
    url: String,
    index: String,
}

impl HttpStatsSource {
    pub fn new(base_url: &str, index: Option<&str>) -> Self {
        let index = match index {
            Some(i) if !i.is_empty() => i,
            _ => DEFAULT_INDEX,
        };
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/api/upload/stats", base_url.trim_end_matches('/')),
            index: index.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn index(&self) -> &str {
        &self.index
    }
}

impl StatsSource for HttpStatsSource {
    async fn fetch(&self) -> Result<Stats> {
        let stats = self
            .client
            .get(&self.url)
            .query(&[("index_name", self.index.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Stats>()
            .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_index() {
        let source = HttpStatsSource::new("http://localhost:8000/", None);
        assert_eq!(source.url(), "http://localhost:8000/api/upload/stats");
        assert_eq!(source.index(), DEFAULT_INDEX);

        let source = HttpStatsSource::new("http://localhost:8000", Some(""));
        assert_eq!(source.index(), DEFAULT_INDEX);
    }

    #[test]
    fn test_selected_index() {
        let source = HttpStatsSource::new("http://rag.internal", Some("handover-2024"));
        assert_eq!(source.index(), "handover-2024");
    }

    #[tokio::test]
    async fn test_unreachable_is_error() {
        let source = HttpStatsSource::new("http://127.0.0.1:9", None);
        assert!(source.fetch().await.is_err());
    }
}
