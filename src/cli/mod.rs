mod commands;

#[cfg(test)]
mod mod_test;

use std::net::IpAddr;

use clap::{Parser, Subcommand};
use miette::Result;

use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "todo-mcp")]
#[command(author, version, about = "Shareable todo lists over HTTP and MCP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (JSON API, widget and MCP endpoint)
    Serve {
        /// Host address to bind to (default: TODO_HOST env or 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (default: TODO_PORT env or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite URL, e.g. sqlite://todos.db (default: DATABASE_URL env; unset keeps data in memory)
        #[arg(long)]
        database_url: Option<String>,

        /// Origin clients reach the server at (default: TODO_BASE_URL env or http://localhost:<port>)
        #[arg(long)]
        base_url: Option<String>,

        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Serve API docs at /docs
        #[arg(long)]
        docs: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
            base_url,
            verbose,
            docs,
        } => {
            commands::serve::run(ServeArgs {
                host,
                port,
                database_url,
                base_url,
                verbosity: verbose,
                enable_docs: docs,
            })
            .await
        }
    }
}
