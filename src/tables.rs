use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    catalog::{Catalog, MatchKind},
    cli::Outcome,
    core::Comparison,
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_comparison_table(comparison: &Comparison) -> Table {
    let current_total = comparison.current_plan.rounded_total();
    let mut table = new_table();
    table.set_header(vec![
        "Code",
        "Description",
        "Peak rate",
        "Off-peak rate",
        "Peak cost",
        "Off-peak cost",
        "Total",
        "Yearly",
        "vs current",
    ]);
    for plan in &comparison.all_plans {
        let is_best = plan.tariff_code == comparison.best_plan.tariff_code;
        let is_current = plan.tariff_code == comparison.current_plan.tariff_code;
        let difference = plan.rounded_total() - current_total;

        let mut code = Cell::new(&plan.tariff_code);
        if is_current {
            code = code.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            code.fg(if is_best { Color::Green } else { Color::Reset }),
            Cell::new(&plan.description).add_attribute(Attribute::Dim),
            Cell::new(plan.peak_rate).set_alignment(CellAlignment::Right),
            Cell::new(plan.off_peak_rate).set_alignment(CellAlignment::Right),
            Cell::new(plan.peak_cost).set_alignment(CellAlignment::Right),
            Cell::new(plan.off_peak_cost).set_alignment(CellAlignment::Right),
            Cell::new(plan.total_cost)
                .set_alignment(CellAlignment::Right)
                .fg(if is_best { Color::Green } else { Color::Reset }),
            Cell::new(plan.rounded_total() * 12.0).set_alignment(CellAlignment::Right),
            Cell::new(if is_current { String::from("current") } else { difference.to_string() })
                .set_alignment(CellAlignment::Right)
                .fg(if is_current {
                    Color::Reset
                } else if difference <= -Cost::ONE_CENT {
                    Color::Green
                } else if difference >= Cost::ONE_CENT {
                    Color::Red
                } else {
                    Color::DarkYellow
                }),
        ]);
    }
    table
}

pub fn build_summary_table(comparison: &Comparison) -> Table {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Declared tariff"),
        Cell::new(if comparison.declared_tariff_code.is_empty() {
            "(none)"
        } else {
            comparison.declared_tariff_code.as_str()
        }),
    ]);
    table.add_row(vec![
        Cell::new("Current plan"),
        Cell::new(format!(
            "{} ({}{})",
            comparison.current_plan.tariff_code,
            comparison.current_plan_match,
            if comparison.current_plan_is_assumed { ", assumed" } else { "" },
        ))
        .fg(match comparison.current_plan_match {
            MatchKind::Exact | MatchKind::Alias => Color::Reset,
            MatchKind::Substring => Color::DarkYellow,
            MatchKind::Unknown => Color::Red,
        }),
    ]);
    table.add_row(vec![
        Cell::new("Best plan"),
        Cell::new(format!(
            "{} {}",
            comparison.best_plan.tariff_code, comparison.best_plan.description
        ))
        .fg(Color::Green),
    ]);
    let savings_color =
        if comparison.is_switch_recommended() { Color::Green } else { Color::Reset };
    table.add_row(vec![
        Cell::new("Monthly savings"),
        Cell::new(comparison.monthly_savings).fg(savings_color),
    ]);
    table.add_row(vec![
        Cell::new("Yearly savings"),
        Cell::new(comparison.yearly_savings).fg(savings_color),
    ]);
    if let Some(charge_check) = &comparison.charge_check {
        table.add_row(vec![Cell::new("Observed charge"), Cell::new(charge_check.observed)]);
        table.add_row(vec![
            Cell::new("Difference"),
            Cell::new(charge_check.difference).fg(
                if charge_check.difference.round_to_cents() == Cost::ZERO {
                    Color::Green
                } else {
                    Color::DarkYellow
                },
            ),
        ]);
    }
    if let Some(average_daily_usage) = comparison.average_daily_usage {
        table.add_row(vec![Cell::new("Daily usage"), Cell::new(average_daily_usage)]);
    }
    table
}

pub fn build_catalog_table(catalog: &Catalog) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Code", "Description", "Peak rate", "Off-peak rate", "Alias of"]);
    for tariff in catalog.iter() {
        match &tariff.alias_of {
            Some(target_code) => table.add_row(vec![
                Cell::new(&tariff.code).add_attribute(Attribute::Dim),
                Cell::new(&tariff.description).add_attribute(Attribute::Dim),
                Cell::new(""),
                Cell::new(""),
                Cell::new(target_code).fg(Color::DarkYellow),
            ]),
            None => table.add_row(vec![
                Cell::new(&tariff.code).add_attribute(Attribute::Bold),
                Cell::new(&tariff.description),
                Cell::new(tariff.peak_rate).set_alignment(CellAlignment::Right),
                Cell::new(tariff.off_peak_rate).set_alignment(CellAlignment::Right),
                Cell::new(""),
            ]),
        };
    }
    table
}

pub fn build_batch_table(outcomes: &[Outcome]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Bill", "Declared", "Current", "Best", "Monthly", "Yearly"]);
    for outcome in outcomes {
        match &outcome.result {
            Ok(comparison) => table.add_row(vec![
                Cell::new(&outcome.label),
                Cell::new(&comparison.declared_tariff_code).add_attribute(Attribute::Dim),
                Cell::new(&comparison.current_plan.tariff_code).fg(
                    if comparison.current_plan_is_assumed { Color::Red } else { Color::Reset },
                ),
                Cell::new(&comparison.best_plan.tariff_code).fg(Color::Green),
                Cell::new(comparison.monthly_savings).set_alignment(CellAlignment::Right),
                Cell::new(comparison.yearly_savings).set_alignment(CellAlignment::Right),
            ]),
            Err(error) => table.add_row(vec![
                Cell::new(&outcome.label),
                Cell::new(format!("{error:#}")).fg(Color::Red),
            ]),
        };
    }
    table
}
