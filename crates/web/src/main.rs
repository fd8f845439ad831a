use std::env;

use tracing_subscriber::EnvFilter;
use web::{mock::MockDataset, start_web_server, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let bind_addr =
        env::var("RACECAST_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let state = AppState::new(MockDataset::generate());
    start_web_server(state, &bind_addr)
        .await
        .expect("could not start mock api server");
}
