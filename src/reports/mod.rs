use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keyheat::analysis::{UsageAnalysis, UsageCounts, ZoneReport};
use keyheat::error::HmResult;
use keyheat::geometry::KeyLayout;
use std::collections::HashMap;
use std::fmt::Write;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportFormat {
    Text,
    Table,
    Json,
}

/// Plain `name: pct%` lines per zone, in declared order.
pub fn format_text_report(analysis: &UsageAnalysis) -> String {
    let mut out = String::new();
    write_zone_lines(&mut out, &analysis.rows);
    out.push('\n');
    write_zone_lines(&mut out, &analysis.columns);
    out
}

fn write_zone_lines(out: &mut String, report: &ZoneReport) {
    let _ = writeln!(out, "{} distribution (% of total):", report.title);
    for r in report.iter() {
        let _ = writeln!(out, " {}{}: {:.1}%", report.label_prefix, r.name, r.percentage);
    }
}

pub fn print_zone_table(report: &ZoneReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new(format!("{} zone", report.title)).add_attribute(Attribute::Bold),
        Cell::new("Presses"),
        Cell::new("Share").fg(Color::Cyan),
        Cell::new("Cells"),
        Cell::new("Anchor"),
    ]);

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in report.iter() {
        let name_cell = if r.matched_positions == 0 {
            Cell::new(&r.name).fg(Color::DarkGrey)
        } else {
            Cell::new(&r.name).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            name_cell,
            Cell::new(r.total),
            Cell::new(format!("{:.1}%", r.percentage)).fg(Color::Cyan),
            Cell::new(r.matched_positions),
            Cell::new(format!("{:.1}", r.anchor)),
        ]);
    }
    println!("\n{}", table);
}

/// Most pressed keys; keys absent from the layout are flagged.
pub fn print_top_keys(counts: &UsageCounts, layout: &KeyLayout, top: usize) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#"),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Presses"),
        Cell::new("Share"),
    ]);
    for i in [0, 2, 3] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let total = counts.total_presses() as f64;
    for (rank, (key, count)) in counts.ranked().into_iter().take(top).enumerate() {
        let key_cell = if layout.get(key).is_some() {
            Cell::new(key).add_attribute(Attribute::Bold)
        } else {
            Cell::new(format!("{} (off-layout)", key)).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            key_cell,
            Cell::new(count),
            Cell::new(format!("{:.1}%", count as f64 / total * 100.0)),
        ]);
    }
    println!("\n{}", table);
}

/// Terminal rendition of the chart: one table cell per grid cell, top row first.
pub fn print_keyboard_grid(analysis: &UsageAnalysis) {
    let Some(bounds) = analysis.bounds else {
        println!("\n(layout has no visible keys)");
        return;
    };

    let by_pos: HashMap<(i32, i32), &keyheat::analysis::HeatCell> = analysis
        .cells
        .iter()
        .map(|c| ((c.pos.x, c.pos.y), c))
        .collect();

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for y in (bounds.min_y..=bounds.max_y).rev() {
        let row: Vec<Cell> = (bounds.min_x..=bounds.max_x)
            .map(|x| match by_pos.get(&(x, y)) {
                Some(cell) => Cell::new(&cell.key)
                    .set_alignment(CellAlignment::Center)
                    .fg(Color::White)
                    .bg(Color::Rgb {
                        r: cell.color.r,
                        g: cell.color.g,
                        b: cell.color.b,
                    }),
                None => Cell::new(" "),
            })
            .collect();
        table.add_row(row);
    }
    println!("\n{}", table);
}

pub fn print_report(
    analysis: &UsageAnalysis,
    counts: &UsageCounts,
    layout: &KeyLayout,
    format: ReportFormat,
    top: usize,
) -> HmResult<()> {
    match format {
        ReportFormat::Text => print!("{}", format_text_report(analysis)),
        ReportFormat::Table => {
            print_keyboard_grid(analysis);
            print_zone_table(&analysis.rows);
            print_zone_table(&analysis.columns);
            if top > 0 {
                print_top_keys(counts, layout, top);
            }
            println!("\nTotal presses: {}", analysis.total_presses);
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
    }
    Ok(())
}
