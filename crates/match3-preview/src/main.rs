//! Headless Match Three preview runner.

use match3_core::hint::random_swap;
use match3_core::{EngineConfig, Grid, MatchGame};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;
mod settings;

use session::PreviewHandle;
use settings::PreviewSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = PreviewSettings::from_env()?;
    let config = EngineConfig::default();

    info!(
        difficulty = settings.customizations.difficulty.as_str(),
        color_scheme = settings.customizations.color_scheme.display_name(),
        theme = settings.customizations.theme.id(),
        seconds = settings.run_for.as_secs(),
        "Starting Match Three preview..."
    );

    let game = MatchGame::new(settings.customizations.clone(), config.clone())?;
    let handle = session::spawn(game, settings.tick_period);
    let mut scores = handle.subscribe_scores();
    let mut updates = handle.watch();
    handle.start()?;
    updates.changed().await?;
    info!(grid_size = handle.snapshot().grid_size, "Board dealt");
    handle.force_check_matches()?;

    let deadline = tokio::time::sleep(settings.run_for);
    tokio::pin!(deadline);
    let mut autoplay = tokio::time::interval(Duration::from_secs(1));
    let mut rng = StdRng::from_entropy();

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            received = scores.recv() => match received {
                Ok(score) => info!(score, "onScoreChange"),
                Err(e) => warn!("Score feed interrupted: {}", e),
            },
            _ = autoplay.tick(), if settings.autoplay => {
                play_hint(&handle, config.color_count, &mut rng)?;
            }
        }
    }

    let snapshot = handle.snapshot();
    debug!(snapshot = %serde_json::to_string(&snapshot)?, "final board");
    info!(score = snapshot.score, "Preview finished");

    handle.reset()?;
    handle.shutdown().await?;
    Ok(())
}

/// Click through one productive swap if the board is idle
fn play_hint(handle: &PreviewHandle, color_count: u8, rng: &mut StdRng) -> anyhow::Result<()> {
    let snapshot = handle.snapshot();
    if !snapshot.game_started || snapshot.is_animating {
        return Ok(());
    }

    let colors = snapshot
        .grid
        .iter()
        .map(|row| row.iter().map(|tile| tile.color).collect())
        .collect();
    let grid = Grid::from_colors(colors, color_count)?;

    match random_swap(&grid, rng) {
        Some((a, b)) => {
            debug!(%a, %b, "autoplay swap");
            handle.select_cell(a.row, a.col)?;
            handle.select_cell(b.row, b.col)?;
        }
        None => debug!("no productive swap on the board"),
    }
    Ok(())
}
