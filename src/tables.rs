use chrono::DateTime;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{bill::BillEstimate, classification::Classification, row::HourlyPrice},
    quantity::{money::Kronor, price::OrePerKilowattHour},
};

const BAR_WIDTH: usize = 30;

pub const fn classification_color(classification: Classification) -> Color {
    match classification {
        Classification::Cheap => Color::Green,
        Classification::Caution => Color::DarkYellow,
        Classification::Expensive => Color::Red,
    }
}

pub fn build_prices_table(rows: &[HourlyPrice], now: &DateTime<Tz>) -> Table {
    let max_total_price =
        rows.iter().map(|row| row.total_price).max().unwrap_or(OrePerKilowattHour::ZERO);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Date", "Start", "End", "Spot", "Total", "Class", "Peak", ""]);
    for row in rows {
        let color = classification_color(row.classification);
        let mut start = Cell::new(row.interval.start.format("%H:%M"));
        if row.contains(now) {
            start = start.add_attribute(Attribute::Bold).add_attribute(Attribute::Underlined);
        }
        let mut bar = Cell::new(build_bar(row.total_price, max_total_price)).fg(color);
        if !row.is_peak_risk {
            bar = bar.add_attribute(Attribute::Dim);
        }
        table.add_row(vec![
            Cell::new(row.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            start,
            Cell::new(row.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(row.spot_price).set_alignment(CellAlignment::Right),
            Cell::new(row.total_price).set_alignment(CellAlignment::Right).fg(color),
            Cell::new(row.classification).fg(color),
            if row.is_peak_risk {
                Cell::new("risk").fg(Color::Red)
            } else {
                Cell::new("").add_attribute(Attribute::Dim)
            },
            bar,
        ]);
    }
    table
}

/// Horizontal bar proportional to the price, empty for non-positive prices.
fn build_bar(price: OrePerKilowattHour, max_price: OrePerKilowattHour) -> String {
    if price <= OrePerKilowattHour::ZERO || max_price <= OrePerKilowattHour::ZERO {
        return String::new();
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let width = ((price.0 / max_price.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.clamp(1, BAR_WIDTH))
}

pub fn build_bill_table(estimates: &[(&str, BillEstimate)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Household", "Energy", "Grid", "Fixed", "Peak", "Total"]);
    for (name, estimate) in estimates {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(estimate.energy).set_alignment(CellAlignment::Right),
            Cell::new(estimate.grid).set_alignment(CellAlignment::Right),
            Cell::new(estimate.fixed).set_alignment(CellAlignment::Right),
            Cell::new(estimate.peak).set_alignment(CellAlignment::Right),
            Cell::new(estimate.total()).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        ]);
    }
    if estimates.len() > 1 {
        let total: Kronor = estimates.iter().map(|(_, estimate)| estimate.total()).sum();
        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_bar() {
        assert_eq!(build_bar(OrePerKilowattHour(100.0), OrePerKilowattHour(100.0)).chars().count(), BAR_WIDTH);
        assert_eq!(build_bar(OrePerKilowattHour(50.0), OrePerKilowattHour(100.0)).chars().count(), 15);
        assert_eq!(build_bar(OrePerKilowattHour(0.1), OrePerKilowattHour(100.0)).chars().count(), 1);
        assert!(build_bar(OrePerKilowattHour(-5.0), OrePerKilowattHour(100.0)).is_empty());
        assert!(build_bar(OrePerKilowattHour(-5.0), OrePerKilowattHour(-1.0)).is_empty());
    }

    #[test]
    fn test_build_prices_table_empty() {
        let now = DateTime::parse_from_rfc3339("2025-10-20T12:00:00+02:00")
            .unwrap()
            .with_timezone(&chrono_tz::Europe::Stockholm);
        assert_eq!(build_prices_table(&[], &now).row_count(), 0);
    }
}
