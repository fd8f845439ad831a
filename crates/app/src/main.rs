//! Terminal client for the race-tracking API.
//!
//! Mostly a development aid: it drives the same client crate the mobile
//! frontends use and prints the screens as plain text.

mod commands;
mod render;

use std::{env, process::ExitCode};

use commands::Command;
use race_api::{
    auth::{MemoryTokenStore, TokenStore},
    client::{RaceApiClient, RaceApiConfig},
};
use render::TermCapabilities;

const USAGE: &str = "usage: racecast <command>

commands:
  home                                      member home screen
  races                                     upcoming races
  race <race-id>                            race detail
  register <race-id> <bib> <course> [target]
  search <race-id> name|bib|code <query>
  broadcast <broadcast-key> [course]        live tracking views";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let client = RaceApiClient::new(RaceApiConfig::env(), MemoryTokenStore::new());
    if let Err(error) = login(&client).await {
        eprintln!("login failed: {}", error);
        return ExitCode::FAILURE;
    }

    match commands::run(&client, command, &TermCapabilities::detect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}

/// Exchange a provider token for API tokens. Without a real OAuth flow on a
/// terminal, the provider token comes from the environment; the mock backend
/// accepts any value.
async fn login<S: TokenStore>(client: &RaceApiClient<S>) -> Result<(), race_api::ApiError> {
    if client.tokens().is_authenticated().await? {
        return Ok(());
    }
    let provider_token = env::var("RACECAST_PROVIDER_TOKEN")
        .unwrap_or_else(|_| "terminal-client".to_owned());
    let login = client.login_with_provider(provider_token).await?;
    log::info!("logged in as {}", login.user.member_name);
    Ok(())
}
