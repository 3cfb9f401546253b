use super::ui;
use crate::App;
use crate::core::convert::parse_amount;
use crate::core::{ConversionRecord, RefreshOutcome};
use anyhow::{Context, Result};
use tracing::warn;

/// Single-line summary, also used as the message body.
pub fn describe(record: &ConversionRecord) -> String {
    format!(
        "{} {} = {} {} (rate {})",
        record.amount,
        record.from,
        ui::format_rate(record.result),
        record.to,
        ui::format_rate(record.rate)
    )
}

pub async fn run(
    app: &App,
    amount: &str,
    from: &str,
    to: &str,
    email: Option<&str>,
    subject: Option<&str>,
) -> Result<()> {
    let amount = parse_amount(amount)?;

    let pb = ui::new_spinner("Fetching rates...");
    let outcome = app.manager.refresh().await;
    pb.finish_and_clear();
    if let RefreshOutcome::Failed(reason) = &outcome {
        warn!(%reason, "Converting with last known rates");
    }

    let record = app.converter.convert(amount, from, to).await?;
    let line = describe(&record);
    println!("{}", ui::style_text(&line, ui::StyleType::TotalValue));
    println!("{}", ui::status_line(&app.manager.status()));

    if let Some(address) = email {
        let subject = subject.unwrap_or("Currency conversion");
        app.notifier
            .send(address, subject, &line)
            .await
            .with_context(|| format!("Failed to send result to {address}"))?;
        println!("Result sent to {address}");
    }
    Ok(())
}
