use super::ui;
use crate::App;
use crate::core::{FeedState, RefreshOutcome, SupportedSet, cross_rate};
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Table of every supported currency priced in the base currency.
pub fn render(state: &FeedState, supported: &SupportedSet) -> String {
    let base = supported.base();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Kind"),
        ui::header_cell(&format!("Per 1 {base}")),
        ui::header_cell(&format!("In {base}")),
    ]);

    let codes = supported.fiat_codes().chain(supported.crypto_codes());
    for code in codes {
        let Ok(currency) = supported.lookup(code) else {
            continue;
        };
        if currency == base {
            continue;
        }
        let per_base = cross_rate(&base, &currency, &state.snapshot).ok();
        let in_base = cross_rate(&currency, &base, &state.snapshot).ok();
        let kind = if currency.is_fiat() { "fiat" } else { "crypto" };

        table.add_row(vec![
            Cell::new(code),
            Cell::new(kind),
            ui::rate_cell(per_base),
            ui::rate_cell(in_base),
        ]);
    }

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table,
        ui::status_line(&state.status)
    )
}

pub async fn run(app: &App) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let outcome = app.manager.refresh().await;
    pb.finish_and_clear();

    if let RefreshOutcome::Failed(reason) = &outcome {
        warn!(%reason, "Showing last known rates");
    }

    let state = app.manager.state();
    if state.snapshot.is_empty() {
        anyhow::bail!("No exchange rates available: {}", state.status);
    }
    println!("{}", render(&state, app.manager.supported()));
    Ok(())
}
