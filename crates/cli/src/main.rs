//! Deployq CLI - Command-line client for the Deployq daemon
//! Talks to the desk the same way a chat front end would

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9640";

#[derive(Parser)]
#[command(name = "deployq")]
#[command(about = "Deploy queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "DEPLOYQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Your chat user id
    #[arg(short, long, env = "DEPLOYQ_USER", default_value = "cli")]
    user: String,

    /// Display name others see in the queue
    #[arg(short, long, env = "DEPLOYQ_NAME")]
    name: Option<String>,

    /// Command keyword the daemon listens for
    #[arg(long, env = "DEPLOYQ_COMMAND_PREFIX", default_value = "deploy")]
    prefix: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Join the queue
    Add {
        /// What you are deploying
        metadata: Vec<String>,
    },

    /// Finish your current turn
    Done,

    /// Who is deploying right now
    Current,

    /// Who is up next
    Next,

    /// Remove a user by display name (`me` removes yourself)
    Remove {
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// List the queue as a chat message
    List,

    /// Dump the raw queue entries
    Dump,

    /// Send arbitrary chat text to the desk
    Say { text: Vec<String> },

    /// Show the queue as a table
    Queue,

    /// Read your direct messages
    Inbox,

    /// Show daemon status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct ChatMessage {
    kind: String,
    text: String,
}

#[derive(Deserialize)]
struct CommandResult {
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "holder")]
    display_name: String,
    #[tabled(rename = "id")]
    holder: String,
    #[tabled(rename = "deploying")]
    metadata: String,
}

#[derive(Deserialize)]
struct QueueResult {
    entries: Vec<QueueRow>,
    run_length: usize,
}

#[derive(Deserialize)]
struct InboxResult {
    messages: Vec<String>,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// Chat text for commands that go through the desk
fn chat_text(prefix: &str, command: &Commands) -> Option<String> {
    let text = match command {
        Commands::Add { metadata } => format!("{prefix} add {}", metadata.join(" ")),
        Commands::Done => format!("{prefix} done"),
        Commands::Current => format!("{prefix} current"),
        Commands::Next => format!("{prefix} next"),
        Commands::Remove { name } => format!("{prefix} remove {}", name.join(" ")),
        Commands::List => format!("{prefix} list"),
        Commands::Dump => format!("{prefix} dump"),
        Commands::Say { text } => text.join(" "),
        Commands::Queue | Commands::Inbox | Commands::Status => return None,
    };
    Some(text.trim().to_string())
}

fn print_messages(caller: &str, messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("{}", "(no response)".dimmed());
    }
    for message in messages {
        match message.kind.as_str() {
            "reply" => println!("{} {}", format!("@{caller}:").cyan().bold(), message.text),
            _ => println!("{}", message.text),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let caller = cli.name.clone().unwrap_or_else(|| cli.user.clone());

    if let Some(text) = chat_text(&cli.prefix, &cli.command) {
        let params = json!({
            "user_id": cli.user,
            "display_name": cli.name,
            "text": text,
        });

        let result = call_rpc(&cli.rpc_url, "deploy.command.v1", params).await?;
        let result: CommandResult = serde_json::from_value(result)?;
        print_messages(&caller, &result.messages);
        return Ok(());
    }

    match cli.command {
        Commands::Queue => {
            let result = call_rpc(&cli.rpc_url, "deploy.queue.v1", json!({})).await?;
            let queue: QueueResult = serde_json::from_value(result)?;

            if queue.entries.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!(
                    "{}",
                    format!("Current run: {} turn(s)", queue.run_length).cyan().bold()
                );
                println!();
                println!("{}", Table::new(queue.entries));
            }
        }

        Commands::Inbox => {
            let params = json!({ "user_id": cli.user });
            let result = call_rpc(&cli.rpc_url, "deploy.inbox.v1", params).await?;
            let inbox: InboxResult = serde_json::from_value(result)?;

            if inbox.messages.is_empty() {
                println!("{}", "No new direct messages".yellow());
            }
            for message in inbox.messages {
                println!("{} {}", "✉".bold(), message);
            }
        }

        Commands::Status => {
            println!("{}", "Daemon Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.status.v1", json!({})).await {
                Ok(status) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Version:".bold(), status["version"]);
                    println!();
                    println!("  {} {}", "Queue length:".bold(), status["queue_length"]);
                    println!("  {} {}", "Deploying:".bold(), status["current_holder"]);
                    println!("  {} {}", "Reminder for:".bold(), status["reminder_holder"]);
                    println!(
                        "  {} {} seconds",
                        "Idle timeout:".bold(),
                        status["idle_timeout_secs"]
                    );
                    println!("  {} {} seconds", "Uptime:".bold(), status["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        // Chat commands were handled above
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_text_for_desk_commands() {
        assert_eq!(
            chat_text(
                "deploy",
                &Commands::Add {
                    metadata: vec!["my".into(), "api".into()]
                }
            )
            .as_deref(),
            Some("deploy add my api")
        );
        assert_eq!(
            chat_text("deploy", &Commands::Add { metadata: vec![] }).as_deref(),
            Some("deploy add")
        );
        assert_eq!(
            chat_text("ship", &Commands::Remove { name: vec!["me".into()] }).as_deref(),
            Some("ship remove me")
        );
    }

    #[test]
    fn test_local_commands_have_no_chat_text() {
        assert!(chat_text("deploy", &Commands::Queue).is_none());
        assert!(chat_text("deploy", &Commands::Inbox).is_none());
        assert!(chat_text("deploy", &Commands::Status).is_none());
    }

    #[test]
    fn test_cli_parses_global_identity() {
        let cli = Cli::try_parse_from(["deployq", "--user", "U1", "--name", "alice", "done"]).unwrap();
        assert_eq!(cli.user, "U1");
        assert_eq!(cli.name.as_deref(), Some("alice"));
        assert!(matches!(cli.command, Commands::Done));
    }
}
