//! Defines the command-line interface for office-mcp.

use crate::config::Transport;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Model Context Protocol servers for building spreadsheets and slide decks.",
    subcommand_required = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Starts the AI-Sheets spreadsheet server.
    Sheets(ServeArgs),
    /// Starts the PowerPoint-Creator slide server.
    Slides(ServeArgs),
    /// Prints the tool catalog of a server as JSON and exits.
    Catalog {
        #[arg(value_enum)]
        server: ServerKind,
    },
}

/// Per-invocation overrides applied on top of the loaded configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Transport protocol (overrides `server.transport`).
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,
    /// HTTP bind port (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Sheets,
    Slides,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["office-mcp", "sheets", "--transport", "http", "--port", "4000"]);
        match cli.command {
            Commands::Sheets(args) => {
                assert_eq!(args.transport, Some(Transport::Http));
                assert_eq!(args.port, Some(4000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_catalog_target() {
        let cli = Cli::parse_from(["office-mcp", "catalog", "slides"]);
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                server: ServerKind::Slides
            }
        ));
    }
}
