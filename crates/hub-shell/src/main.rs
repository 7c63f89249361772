//! Internship Hub shell
//!
//! Line-oriented terminal client for the Internship Hub backend. Logs go to
//! stderr; stdout carries only what the user asked for.

use common::config::ClientConfig;
use hub_client::{ApiClient, FileTokenStore, Session};
use hub_shell::{logging, App, Command, Outcome};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    logging::init();

    // Load configuration
    let config = ClientConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        api_base_url = %config.api_base_url,
        storage_dir = %config.storage_dir.display(),
        default_max_distance_km = config.default_max_distance_km,
        "Configuration loaded"
    );

    // Hydrate the session before anything is shown
    let store = Arc::new(FileTokenStore::new(&config.storage_dir));
    let session = Arc::new(Session::hydrate(store).map_err(|e| {
        error!("Failed to read persisted session: {}", e);
        e
    })?);

    let client = ApiClient::new(&config, session)?;
    let mut app = App::new(client);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\nType `help` for commands.\n", app.header()).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                stdout.write_all(format!("{e}\n").as_bytes()).await?;
                continue;
            }
        };

        let text = match app.execute(command).await {
            Ok(Outcome::Output(text)) => text,
            Ok(Outcome::Quit) => break,
            Err(e) => format!("Error: {}", e.user_message()),
        };
        stdout.write_all(format!("{text}\n").as_bytes()).await?;
    }

    info!("Goodbye");
    Ok(())
}
