//! Web Search Tool
//!
//! Mocked search. Simulates network latency and never returns more than
//! three hits.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use agent_core::{ToolBuilder, ToolDescriptor};

const MAX_HITS: usize = 3;
const SIMULATED_LATENCY: Duration = Duration::from_millis(100);

fn default_max_results() -> usize {
    5
}

/// Search the web for information
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct SearchWebArgs {
    /// Search keywords
    pub query: String,
    /// Maximum number of results
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
}

pub async fn search_web(args: SearchWebArgs) -> anyhow::Result<SearchResults> {
    tokio::time::sleep(SIMULATED_LATENCY).await;

    let query = args.query;
    let results = (1..=args.max_results.min(MAX_HITS))
        .map(|i| SearchHit {
            title: format!("Result {i} for {query}"),
            url: format!("https://example.com/result{i}"),
            snippet: format!("Summary of search result {i} about {query}"),
        })
        .collect();

    Ok(SearchResults { query, results })
}

pub fn search_web_tool() -> ToolDescriptor {
    ToolBuilder::new().async_fn(search_web)
}
