//! Dice Messages Admin CLI
//!
//! Command line client for a running Dice Messages server. Every
//! subcommand sends one GraphQL request over HTTP and prints the result.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dice_messages::Message;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Parser)]
#[command(name = "dice-messages-admin")]
#[command(about = "Dice Messages Admin CLI - Talk to a running GraphQL server")]
#[command(version = "1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GraphQL endpoint URL
    #[arg(long, env = "DICE_API_URL", default_value = "http://localhost:4000/graphql")]
    url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Say hello
    Hello,

    /// Fetch the quote of the day
    Quote,

    /// Fetch a random number in [0, 1)
    Random,

    /// Roll some dice
    Roll {
        /// Number of dice to roll
        #[arg(long, default_value_t = 3)]
        dice: i32,

        /// Sides per die (server default is 6)
        #[arg(long)]
        sides: Option<i32>,
    },

    /// Create a message
    Create {
        /// Message content
        #[arg(long)]
        content: Option<String>,

        /// Message author
        #[arg(long)]
        author: Option<String>,
    },

    /// Show a message
    Get {
        /// Message ID
        id: String,
    },

    /// Replace a message's content and author
    Update {
        /// Message ID
        id: String,

        /// New content (left unset when omitted)
        #[arg(long)]
        content: Option<String>,

        /// New author (left unset when omitted)
        #[arg(long)]
        author: Option<String>,
    },

    /// Show the address the server sees for this client
    Ip,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
struct GraphQLEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

struct GraphQLClient {
    http: reqwest::Client,
    url: String,
}

impl GraphQLClient {
    fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        debug!("POST {} {}", self.url, query);

        let envelope: GraphQLEnvelope = self
            .http
            .post(&self.url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?
            .error_for_status()?
            .json()
            .await
            .context("Server returned an invalid GraphQL response")?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            bail!(messages.join("; "));
        }

        envelope
            .data
            .ok_or_else(|| anyhow!("Server response contained no data"))
    }

    async fn field(&self, query: &str, variables: Value, field: &str) -> Result<Value> {
        let mut data = self.execute(query, variables).await?;
        data.get_mut(field)
            .map(Value::take)
            .ok_or_else(|| anyhow!("Response is missing field {}", field))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let client = GraphQLClient::new(cli.url.clone());

    if let Err(e) = run(&client, cli.command).await {
        eprintln!("{} {}", "❌".red(), format!("{:#}", e).red());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &GraphQLClient, command: Commands) -> Result<()> {
    match command {
        Commands::Hello => {
            let hello = client.field("{ hello }", json!({}), "hello").await?;
            println!("{}", hello.as_str().unwrap_or_default().green());
        }

        Commands::Quote => {
            let quote = client
                .field("{ quoteOfTheDay }", json!({}), "quoteOfTheDay")
                .await?;
            println!("💬 {}", quote.as_str().unwrap_or_default().italic());
        }

        Commands::Random => {
            let random = client.field("{ random }", json!({}), "random").await?;
            println!("🎲 {}", random);
        }

        Commands::Roll { dice, sides } => {
            let rolls = client
                .field(
                    "query Roll($numDice: Int!, $numSides: Int) { rollDice(numDice: $numDice, numSides: $numSides) }",
                    json!({ "numDice": dice, "numSides": sides }),
                    "rollDice",
                )
                .await?;
            let rolls: Vec<i32> = serde_json::from_value(rolls)?;
            print_rolls(&rolls);
        }

        Commands::Create { content, author } => {
            let message = client
                .field(
                    "mutation Create($input: MessageInput) { createMessage(input: $input) { id content author } }",
                    json!({ "input": { "content": content, "author": author } }),
                    "createMessage",
                )
                .await?;
            println!("{} Created message", "✅".green());
            print_message(&serde_json::from_value(message)?);
        }

        Commands::Get { id } => {
            let message = client
                .field(
                    "query Get($id: ID!) { getMessage(id: $id) { id content author } }",
                    json!({ "id": id }),
                    "getMessage",
                )
                .await?;
            print_message(&serde_json::from_value(message)?);
        }

        Commands::Update {
            id,
            content,
            author,
        } => {
            let message = client
                .field(
                    "mutation Update($id: ID!, $input: MessageInput) { updateMessage(id: $id, input: $input) { id content author } }",
                    json!({ "id": id, "input": { "content": content, "author": author } }),
                    "updateMessage",
                )
                .await?;
            println!("{} Updated message", "✅".green());
            print_message(&serde_json::from_value(message)?);
        }

        Commands::Ip => {
            let ip = client.field("{ ip }", json!({}), "ip").await?;
            match ip.as_str() {
                Some(ip) => println!("🌐 {}", ip.cyan()),
                None => println!("🌐 {}", "unknown".dimmed()),
            }
        }
    }

    Ok(())
}

fn print_rolls(rolls: &[i32]) {
    let total: i64 = rolls.iter().map(|r| i64::from(*r)).sum();
    let faces: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
    println!("🎲 [{}]  total {}", faces.join(", ").bold(), total);
}

fn print_message(message: &Message) {
    let unset = "(unset)".dimmed().to_string();
    println!("  {}      {}", "id:".bold(), message.id.cyan());
    println!(
        "  {} {}",
        "content:".bold(),
        message.content.clone().unwrap_or_else(|| unset.clone())
    );
    println!(
        "  {}  {}",
        "author:".bold(),
        message.author.clone().unwrap_or(unset)
    );
}
