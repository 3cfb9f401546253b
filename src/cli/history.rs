use super::ui;
use crate::App;
use crate::core::ConversionRecord;
use anyhow::Result;
use comfy_table::Cell;

pub fn render(records: &[ConversionRecord]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
        ui::header_cell("Result"),
    ]);
    // newest first
    for record in records.iter().rev() {
        table.add_row(vec![
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
            ui::rate_cell(Some(record.amount)),
            Cell::new(&record.from),
            Cell::new(&record.to),
            ui::rate_cell(Some(record.rate)),
            ui::rate_cell(Some(record.result)),
        ]);
    }
    table.to_string()
}

pub async fn run(app: &App, search: Option<&str>) -> Result<()> {
    let records = match search {
        Some(text) => app.history.query(text).await?,
        None => app.history.query_all().await?,
    };

    if records.is_empty() {
        println!(
            "{}",
            ui::style_text("No conversions recorded", ui::StyleType::Subtle)
        );
        return Ok(());
    }
    println!("{}", render(&records));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(hour: u32, to: &str) -> ConversionRecord {
        ConversionRecord {
            timestamp: Local.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap(),
            amount: 10.0,
            from: "USD".to_string(),
            to: to.to_string(),
            rate: 2.0,
            result: 20.0,
        }
    }

    #[test]
    fn test_render_lists_newest_first() {
        let output = render(&[record(9, "EUR"), record(10, "GBP")]);

        let newer = output.find("GBP").unwrap();
        let older = output.find("EUR").unwrap();
        assert!(newer < older);
        assert!(output.contains("20.0000"));
    }
}
