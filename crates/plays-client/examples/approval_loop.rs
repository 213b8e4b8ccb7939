//! Headless end-to-end pass against a running plays service: run the
//! default play, print what came back, approve everything.
//!
//! ```sh
//! OPSDECK_BASE_URL=http://127.0.0.1:8000 cargo run --example approval_loop
//! ```

use opsdeck_core::{DeckConfig, DeckController, DetachedViz, UiEvent};
use plays_client::PlaysClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = DeckConfig {
        base_url: std::env::var("OPSDECK_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".into()),
        ..DeckConfig::default()
    };

    let client = PlaysClient::new(&config.base_url);
    if !client.health().await? {
        anyhow::bail!("plays service at {} is not healthy", config.base_url);
    }

    let mut deck = DeckController::new(client, DetachedViz, config);
    let mut events = deck.subscribe();

    deck.run_play(serde_json::json!({})).await?;
    println!(
        "run {} produced {} pending action(s)",
        deck.run_id().unwrap_or("<none>"),
        deck.pending_actions().len()
    );
    for action in deck.pending_actions() {
        println!(
            "  [{}] {}",
            action.action_type.as_str(),
            action.title.as_deref().unwrap_or(&action.description)
        );
    }

    deck.approve_all().await?;
    println!("approved; {} still pending", deck.pending_actions().len());

    while let Ok(event) = events.try_recv() {
        if let UiEvent::Notice { level, message } = event {
            println!("notice ({level:?}): {message}");
        }
    }
    Ok(())
}
