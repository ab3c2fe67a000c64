//! Web search tool backed by the Tavily search API

use super::ToolResult;
use crate::session::SessionKeys;
use crate::{Error, Result};

const SOURCE: &str = "tavily";
const MAX_RESULTS: usize = 3;

/// Tavily search request body
#[derive(Debug, serde::Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
}

/// Tavily search response (the fields we read)
#[derive(Debug, serde::Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, serde::Deserialize)]
struct TavilyResult {
    title: String,
    content: String,
}

/// Run a web search for the transcript, live when a Tavily key is stored
pub async fn web(query: &str, keys: &SessionKeys, client: &reqwest::Client) -> ToolResult {
    let Some(api_key) = keys.tavily.as_deref() else {
        return demo(query);
    };

    match fetch(query, None, api_key, client).await {
        Ok(results) if results.is_empty() => {
            ToolResult::success(format!("I couldn't find anything for \"{query}\"."), SOURCE)
        }
        Ok(results) => ToolResult::success(summarize(&results), SOURCE),
        Err(e) => {
            tracing::warn!(query, error = %e, "web search failed, serving demo data");
            demo(query)
        }
    }
}

/// POST the search to Tavily and return its result list
pub(super) async fn fetch(
    query: &str,
    topic: Option<&str>,
    api_key: &str,
    client: &reqwest::Client,
) -> Result<Vec<(String, String)>> {
    let request = TavilyRequest {
        api_key,
        query,
        max_results: MAX_RESULTS,
        topic,
    };

    let response = client
        .post("https://api.tavily.com/search")
        .json(&request)
        .send()
        .await?;

    let response = response.error_for_status().map_err(Error::Http)?;
    let parsed: TavilyResponse = response.json().await?;

    Ok(parsed
        .results
        .into_iter()
        .map(|r| (r.title, r.content))
        .collect())
}

fn summarize(results: &[(String, String)]) -> String {
    let mut reply = String::from("Here's what I found. ");
    for (index, (title, content)) in results.iter().take(MAX_RESULTS).enumerate() {
        let snippet: String = content.chars().take(160).collect();
        reply.push_str(&format!("{}. {title}: {snippet} ", index + 1));
    }
    reply.trim_end().to_string()
}

fn demo(query: &str) -> ToolResult {
    ToolResult::demo(
        format!(
            "Demo search for \"{query}\": I'd show live results here with a \
             Tavily API key configured."
        ),
        SOURCE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;

    #[tokio::test]
    async fn no_key_returns_demo() {
        let keys = SessionKeys::default();
        let client = reqwest::Client::new();

        let result = web("rust tutorials", &keys, &client).await;
        assert_eq!(result.status, ToolStatus::Demo);
        assert!(result.reply.contains("rust tutorials"));
    }

    #[test]
    fn summarize_numbers_results() {
        let results = vec![
            ("First".to_string(), "alpha".to_string()),
            ("Second".to_string(), "beta".to_string()),
        ];
        let reply = summarize(&results);
        assert!(reply.contains("1. First: alpha"));
        assert!(reply.contains("2. Second: beta"));
    }

    #[test]
    fn parses_tavily_payload() {
        let json = r#"{"results": [{"title": "Rust", "content": "A language."}]}"#;
        let parsed: TavilyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].title, "Rust");
    }

    #[test]
    fn missing_results_field_parses_as_empty() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
