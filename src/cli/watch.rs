use super::{rates, ui};
use crate::App;
use crate::core::{FeedState, RateSnapshotManager, RefreshScheduler};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Refreshes on the configured cadence and reprints the table on every
/// published state until Ctrl-C.
pub async fn run(app: &App) -> Result<()> {
    let updates = app.manager.subscribe();
    let scheduler = RefreshScheduler::spawn(
        Arc::clone(&app.manager),
        app.config.refresh_interval(),
        app.config.refresh.enabled,
    );
    if !scheduler.is_enabled() {
        warn!("Periodic refresh is disabled, showing a single refresh");
    }

    let manager = Arc::clone(&app.manager);
    tokio::spawn(async move { manager.refresh().await });

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    print_updates(&app.manager, updates, interrupted).await;
    info!("Interrupted, stopping refresh");

    scheduler.shutdown();
    Ok(())
}

/// Prints each published state until `shutdown` completes. Returns how many
/// states were printed.
async fn print_updates(
    manager: &RateSnapshotManager,
    mut updates: watch::Receiver<FeedState>,
    shutdown: impl Future<Output = ()>,
) -> usize {
    tokio::pin!(shutdown);
    let mut printed = 0;

    loop {
        tokio::select! {
            biased;
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                ui::print_separator();
                println!("{}", rates::render(&state, manager.supported()));
                printed += 1;
            }
            _ = &mut shutdown => break,
        }
    }
    printed
}
