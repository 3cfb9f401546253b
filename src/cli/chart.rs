use super::ui;
use crate::App;
use crate::core::RateSeries;
use anyhow::Result;
use comfy_table::Cell;

/// Renders a series as a dated table followed by a min/max/change footer.
pub fn render(from: &str, to: &str, days: u32, series: &RateSeries) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("{from}/{to}")),
    ]);
    for (date, rate) in series.iter() {
        table.add_row(vec![
            Cell::new(date.format("%Y-%m-%d")),
            ui::rate_cell(Some(rate)),
        ]);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text(&format!("{from} to {to}, last {days} days"), ui::StyleType::Title),
        table
    );

    if let (Some((_, first)), Some((_, last)), Some(min), Some(max)) =
        (series.first(), series.last(), series.min(), series.max())
    {
        let mut summary = ui::new_styled_table();
        summary.set_header(vec![
            ui::header_cell("Min"),
            ui::header_cell("Max"),
            ui::header_cell("Last"),
            ui::header_cell("Change"),
        ]);
        let change = if first != 0.0 {
            ui::change_cell((last - first) / first * 100.0)
        } else {
            ui::rate_cell(None)
        };
        summary.add_row(vec![
            ui::rate_cell(Some(min)),
            ui::rate_cell(Some(max)),
            ui::rate_cell(Some(last)),
            change,
        ]);
        output.push_str(&format!("\n\n{summary}"));
    }
    output
}

pub async fn run(app: &App, from: &str, to: &str, days: u32) -> Result<()> {
    if !app.config.chart_days.contains(&days) {
        anyhow::bail!(
            "Unsupported window of {days} days, choose one of {:?}",
            app.config.chart_days
        );
    }
    let supported = app.manager.supported();
    let from = supported.lookup(from)?;
    let to = supported.lookup(to)?;

    let pb = ui::new_spinner("Fetching history...");
    let result = app.timeseries.resolve(&from, &to, days).await;
    pb.finish_and_clear();

    let series = result?;
    println!("{}", render(from.code(), to.code(), days, &series));
    Ok(())
}
