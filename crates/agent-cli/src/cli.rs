//! Command-line arguments

use std::time::Duration;

use agent_core::provider::DEFAULT_MODEL;
use agent_core::reasoning::{DEFAULT_MAX_STEPS, DEFAULT_SYSTEM_PROMPT};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "A minimal tool-calling agent", long_about = None)]
pub struct Cli {
    /// Prompt to run once; starts an interactive session when omitted
    pub prompt: Option<String>,

    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum model calls per run
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Wall-clock budget per run, in seconds
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// System prompt seeding the conversation
    #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system_prompt: String,

    /// Agent name used in logs
    #[arg(long, default_value = "toy-agent")]
    pub name: String,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Run without the bundled tools
    #[arg(long)]
    pub no_tools: bool,

    /// Print the full transcript after each run
    #[arg(long)]
    pub transcript: bool,

    /// API key (falls back to OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (falls back to OPENAI_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,
}

impl Cli {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
