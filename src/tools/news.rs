//! News headlines tool, a news-topic Tavily search

use super::{search, ToolResult};
use crate::session::SessionKeys;

const SOURCE: &str = "tavily";

const DEMO_HEADLINES: &[&str] = &[
    "Markets steady as tech earnings roll in",
    "New rail link cuts cross-town travel time in half",
    "Researchers report progress on long-duration batteries",
];

/// Latest headlines for the transcript's topic, live when a Tavily key is stored
pub async fn headlines(topic: &str, keys: &SessionKeys, client: &reqwest::Client) -> ToolResult {
    let Some(api_key) = keys.tavily.as_deref() else {
        return demo();
    };

    match search::fetch(topic, Some("news"), api_key, client).await {
        Ok(results) if results.is_empty() => {
            ToolResult::success("No matching headlines right now.".to_string(), SOURCE)
        }
        Ok(results) => {
            let mut reply = String::from("Here are the latest headlines. ");
            for (index, (title, _)) in results.iter().enumerate() {
                reply.push_str(&format!("{}. {title}. ", index + 1));
            }
            ToolResult::success(reply.trim_end().to_string(), SOURCE)
        }
        Err(e) => {
            tracing::warn!(topic, error = %e, "news lookup failed, serving demo data");
            demo()
        }
    }
}

fn demo() -> ToolResult {
    let mut reply = String::from("Demo headlines. ");
    for (index, headline) in DEMO_HEADLINES.iter().enumerate() {
        reply.push_str(&format!("{}. {headline}. ", index + 1));
    }
    reply.push_str("Add a Tavily API key for live news.");
    ToolResult::demo(reply, SOURCE)
}
