use anyhow::Context as _;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Credentials and endpoint location for the Notion data source.
///
/// Built once at the process edge and handed to [`crate::loader::Loader`];
/// nothing below the edge reads the environment, so tests can inject a stub
/// server through `base_url`.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_token: String,
    pub database_id: String,
    pub base_url: String,
}

impl NotionConfig {
    pub fn new(api_token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            database_id: database_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = require_env("NOTION_API_KEY")?;
        let database_id = require_env("NOTION_DATABASE_ID")?;

        let base_url = match std::env::var("NOTION_BASE_URL") {
            Ok(raw) => {
                let raw = raw.trim().trim_end_matches('/').to_string();
                url::Url::parse(&raw)
                    .with_context(|| format!("invalid NOTION_BASE_URL: {raw:?}"))?;
                raw
            }
            Err(_) => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self {
            api_token,
            database_id,
            base_url,
        })
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    let raw = std::env::var(name).map_err(|_| anyhow::anyhow!("{name} is required"))?;
    let raw = raw.trim().to_string();
    if raw.is_empty() {
        anyhow::bail!("{name} is empty");
    }
    Ok(raw)
}
