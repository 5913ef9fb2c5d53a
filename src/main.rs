use anyhow::Result;
use clap::Parser;
use office_mcp::cli::{Cli, Commands, ServerKind};
use office_mcp::engine;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command-line arguments.
    let cli = Cli::parse();

    // Dispatch to the appropriate command handler.
    match cli.command {
        Commands::Sheets(args) => {
            // start_server() initializes its own tracing (with log capture layer)
            engine::server::start_server(ServerKind::Sheets, args).await?;
        }
        Commands::Slides(args) => {
            engine::server::start_server(ServerKind::Slides, args).await?;
        }
        Commands::Catalog { server } => {
            println!("{}", engine::server::catalog_json(server)?);
        }
    }

    Ok(())
}
