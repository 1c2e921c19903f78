use anyhow::Result;
use clap::{Parser, Subcommand};
use echomap_client::{ClientConfig, HttpNoteGateway, NoteSync, TerminalMapView};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "echomap",
    author,
    version,
    about = "EchoMap - leave short notes on a shared world map"
)]
struct Cli {
    /// Base URL of the EchoMap server
    #[arg(long, global = true, env = "ECHOMAP_SERVER_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List every note on the map")]
    List,

    #[command(about = "Post a note at a position")]
    Post {
        /// Latitude in degrees, -90 to 90
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees, -180 to 180
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Note text, at most 280 characters
        text: String
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(server) = cli.server {
        config.base_url = server;
    }

    let gateway = Arc::new(HttpNoteGateway::new(&config)?);

    match cli.command {
        Commands::List => {
            let sync = NoteSync::new(gateway, Arc::new(TerminalMapView::default()), &config);
            sync.load().await?;
        }
        Commands::Post { lat, lng, text } => {
            let sync = NoteSync::new(gateway, Arc::new(TerminalMapView { quiet: true }), &config);
            let note = sync.submit_at(lat, lng, &text).await?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
    }

    Ok(())
}
