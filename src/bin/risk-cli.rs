use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "risk-cli")]
#[command(about = "Command-line client for the address risk API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one address
    Check {
        address: String,
        /// Also query the reputation source
        #[arg(long)]
        goplus: bool,
    },
    /// Manage the local blacklist
    Blacklist {
        #[command(subcommand)]
        command: BlacklistCommands,
    },
    /// List recent assessments
    History {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
}

#[derive(Subcommand)]
enum BlacklistCommands {
    /// List entries, newest first
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Add or update one entry
    Add {
        address: String,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        source: Option<String>,
    },
    /// Bulk import from a JSON array file (objects, arrays or strings)
    Import { file: PathBuf },
    /// Remove one entry
    Remove { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Check { address, goplus } => client
            .post(format!("{}/api/check", base))
            .json(&json!({"address": address, "useGoPlus": goplus})),
        Commands::History { limit, offset } => client
            .get(format!("{}/api/history", base))
            .query(&page(limit, offset)),
        Commands::Blacklist { command } => match command {
            BlacklistCommands::List { limit, offset } => client
                .get(format!("{}/api/blacklist", base))
                .query(&page(limit, offset)),
            BlacklistCommands::Add {
                address,
                reason,
                source,
            } => client
                .post(format!("{}/api/blacklist", base))
                .json(&json!({"address": address, "reason": reason, "source": source})),
            BlacklistCommands::Import { file } => {
                let rows: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
                client
                    .post(format!("{}/api/blacklist/import", base))
                    .json(&json!({"addresses": rows}))
            }
            BlacklistCommands::Remove { address } => {
                client.delete(format!("{}/api/blacklist/{}", base, address))
            }
        },
    };

    print_response(request.send().await?).await
}

fn page(limit: Option<u32>, offset: Option<u32>) -> Vec<(&'static str, u32)> {
    [("limit", limit), ("offset", offset)]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
