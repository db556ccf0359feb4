//! Output formatting

use frame_core::layout::StudLayout;
use frame_core::{FrameError, FrameResult, OutputBundle, Wall};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

pub fn print_json<T: Serialize>(data: &T) -> FrameResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn rule(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {title}");
    println!("═══════════════════════════════════════");
}

fn print_issues(issues: &[FrameError]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("Issues ({}):", issues.len());
    for issue in issues {
        println!("  [{}] {}", issue.error_code(), issue);
    }
}

pub fn print_plan(output: &OutputBundle) {
    rule("FRAME PLAN");
    println!();
    println!("Walls:");
    for wall in &output.walls {
        match output.member_counts.get(&wall.id) {
            Some(c) => println!(
                "  {:<10} {:>6.0} x {:>6.0} mm  {:>3} studs  {} plates  {:>2} noggins",
                wall.name, wall.length_mm, wall.height_mm, c.studs, c.plates, c.noggins
            ),
            None => println!("  {:<10} not framed", wall.name),
        }
    }

    println!();
    println!("Cut List:");
    for (i, plan) in output.cut_list.iter().enumerate() {
        let cuts: Vec<String> = plan
            .cuts
            .iter()
            .map(|c| format!("{} x {:.0} {}", c.quantity, c.length_mm, c.member_type))
            .collect();
        println!(
            "  {:>3}. {:.0} mm {}: {}  (waste {:.0} mm, {:.1}%)",
            i + 1,
            plan.stock_length_mm,
            plan.section_name,
            cuts.join(", "),
            plan.waste_mm,
            plan.waste_percentage()
        );
    }
    println!(
        "  Total waste: {:.0} mm ({:.1}%)",
        output.total_waste_mm, output.waste_percentage
    );

    println!();
    println!("Buy List:");
    for item in &output.buy_list {
        let price = match (item.total_price, item.currency.as_deref()) {
            (Some(total), Some(currency)) => format!("{total:.2} {currency}"),
            _ => "unpriced".to_string(),
        };
        println!("  {:<32} {:>4} {:<8} {}", item.description, item.quantity, item.unit, price);
    }
    for (currency, total) in &output.cost_totals {
        println!("  Total ({currency}): {total:.2}");
    }

    println!();
    println!("Hardware:");
    for item in &output.hardware_list {
        println!("  {:<32} {:>4} {}", item.description, item.quantity, item.unit);
    }

    print_issues(&output.issues);
}

pub fn print_layout(wall: &Wall, layout: &StudLayout) {
    rule(&format!("STUD LAYOUT: {}", wall.name));
    println!();
    println!("  Length:      {:.0} mm", wall.length_mm);
    println!("  Height:      {:.0} mm", wall.height_mm);
    println!("  Stud gap:    {:.0} mm", wall.stud_gap_mm);

    let join = |positions: &[f64]| {
        positions
            .iter()
            .map(|p| format!("{p:.0}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!();
    println!("  Standard:    {}", join(&layout.standard_stud_positions_mm));
    println!("  Decorative:  {}", join(&layout.decorative_stud_positions_mm));
    println!("  Resolved:    {}", join(&layout.resolved_stud_positions_mm));

    for section in &layout.sections {
        println!(
            "  {:<13} {:>6.0} .. {:>6.0} mm  {}",
            section.kind.to_string(),
            section.span.start_mm,
            section.span.end_mm(),
            join(&section.resolved_stud_positions_mm)
        );
    }

    println!();
    println!("Members:");
    for m in &wall.members {
        println!(
            "  {:<28} {:<7} at {:>6.0}  length {:>6.0} mm",
            m.id,
            m.member_type.to_string(),
            m.position_mm,
            m.length_mm
        );
    }
}
