//! toy-agent command-line driver
//!
//! Runs a single prompt, or an interactive session reading prompts from
//! stdin. `/reset` clears the conversation, `/history` prints it and
//! `exit` quits.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{Agent, AgentBuilder, Message, Role};
use agent_runtime::{OpenAiConfig, OpenAiProvider};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for answers
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut agent = build_agent(&cli)?;

    tracing::info!(
        agent = agent.name(),
        model = %agent.config().generation.model,
        tools = ?agent.tools().list_tools(),
        "Agent ready"
    );

    match cli.prompt.clone() {
        Some(prompt) => {
            let answer = agent.run(prompt).await.map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{answer}");
            if cli.transcript {
                print_transcript(agent.history());
            }
        }
        None => repl(&mut agent, cli.transcript).await?,
    }

    Ok(())
}

fn build_agent(cli: &Cli) -> anyhow::Result<Agent> {
    let mut config = match &cli.api_key {
        Some(key) => OpenAiConfig::new(key.clone()),
        None => OpenAiConfig::from_env()?,
    };
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    let provider = OpenAiProvider::new(config)?;

    let mut builder = AgentBuilder::new()
        .provider(Arc::new(provider))
        .name(cli.name.clone())
        .system_prompt(cli.system_prompt.clone())
        .model(cli.model.clone())
        .max_steps(cli.max_steps)
        .timeout(cli.timeout());
    if let Some(temperature) = cli.temperature {
        builder = builder.temperature(temperature);
    }

    let mut agent = builder.build().context("invalid agent configuration")?;
    if !cli.no_tools {
        agent_tools::register_all(agent.tools_mut())?;
    }

    Ok(agent)
}

async fn repl(agent: &mut Agent, transcript: bool) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "/reset" => {
                agent.reset();
                println!("(conversation cleared)");
            }
            "/history" => print_transcript(agent.history()),
            prompt => {
                // a failed run keeps the session alive
                match agent.run(prompt).await {
                    Ok(answer) => println!("{answer}"),
                    Err(e) => {
                        tracing::warn!(kind = e.kind(), "Run failed: {e}");
                        println!("{}", e.user_message());
                    }
                }
                if transcript {
                    print_transcript(agent.history());
                }
            }
        }
    }

    Ok(())
}

fn print_transcript(messages: &[Message]) {
    println!("--- transcript ({} messages) ---", messages.len());
    for message in messages {
        match message.role {
            Role::Tool => println!(
                "[tool {}] {}",
                message.tool_call_id.as_deref().unwrap_or("?"),
                message.text()
            ),
            role if message.has_tool_calls() => {
                for call in &message.tool_calls {
                    println!("[{role}] -> {}({})", call.name, call.arguments);
                }
            }
            role => println!("[{role}] {}", message.text()),
        }
    }
    println!("---");
}
