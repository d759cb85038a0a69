use crate::config::NotionConfig;
use crate::notion::{self, LoadError};
use crate::record::Table;

/// Fetches the practice database and flattens it into a [`Table`].
#[derive(Debug, Clone)]
pub struct Loader {
    client: reqwest::Client,
    config: NotionConfig,
}

impl Loader {
    pub fn new(config: NotionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// One authenticated query, all-or-nothing flattening. Performs exactly
    /// one network call; callers hold the result in a
    /// [`crate::cache::TableCache`] so re-renders do not refetch.
    pub async fn load(&self) -> Result<Table, LoadError> {
        let results = notion::query_database(&self.client, &self.config).await?;
        let table = Table::from_results(&results)?;
        tracing::info!(rows = table.len(), "loaded practice records");
        Ok(table)
    }
}
