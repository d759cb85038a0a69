use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::NotionConfig;

/// API version pinned in every query request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Failure taxonomy for one dashboard load. The three kinds stay separate
/// so callers and tests can tell a rejected credential from a bad response
/// shape from a dead network. Nothing is caught or retried anywhere; every
/// variant aborts the render that triggered the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data source rejected the query ({status}): {message}")]
    Config { status: StatusCode, message: String },
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("query request failed: {0}")]
    Network(#[from] reqwest::Error),
}

pub fn query_endpoint(base_url: &str, database_id: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/v1/databases/{database_id}/query")
}

/// Issues the single database query and returns the first page of results.
///
/// No filter or sort is sent, so the source's default ordering and page
/// size apply. A `has_more` signal is logged and otherwise ignored.
pub async fn query_database(
    client: &reqwest::Client,
    config: &NotionConfig,
) -> Result<Vec<Value>, LoadError> {
    let endpoint = query_endpoint(&config.base_url, &config.database_id);
    let response = client
        .post(&endpoint)
        .bearer_auth(&config.api_token)
        .header("Notion-Version", NOTION_VERSION)
        .json(&serde_json::json!({}))
        .send()
        .await?;

    let status = response.status();
    if matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    ) {
        let raw = response.text().await.unwrap_or_default();
        let message = parse_error_message(&raw).unwrap_or(raw);
        return Err(LoadError::Config { status, message });
    }
    let response = response.error_for_status()?;

    let raw = response.text().await?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| LoadError::Shape(format!("parse query response: {err}")))?;

    if value
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        tracing::debug!("query returned more than one page; extra pages are ignored");
    }

    let results = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::Shape("missing `results` array in query response".to_string()))?;

    Ok(results.clone())
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("message")?.as_str()?.to_owned();
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_database_id() {
        assert_eq!(
            query_endpoint("https://api.notion.com", "abc123"),
            "https://api.notion.com/v1/databases/abc123/query"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            query_endpoint("http://127.0.0.1:8080/", "db"),
            "http://127.0.0.1:8080/v1/databases/db/query"
        );
    }

    #[test]
    fn error_message_parsed_from_body() {
        let raw = r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#;
        assert_eq!(
            parse_error_message(raw).as_deref(),
            Some("API token is invalid.")
        );
    }

    #[test]
    fn error_message_absent_for_non_json() {
        assert_eq!(parse_error_message("gateway timeout"), None);
    }
}
