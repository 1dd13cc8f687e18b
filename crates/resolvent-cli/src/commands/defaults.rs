use miette::{IntoDiagnostic, Result};
use resolvent_core::{DefaultsReport, MainField, OutputFormat, Platform};

/// Run the defaults command.
///
/// Without a target, prints the derived orders for every platform/format
/// pair. With one, prints the single matching row.
pub fn run(target: Option<(Platform, OutputFormat)>, json: bool) -> Result<()> {
    let report = match target {
        Some((platform, format)) => DefaultsReport::for_target(platform, format),
        None => DefaultsReport::all(),
    };

    if json {
        print_json(&report)?;
    } else {
        print_human(&report);
    }

    Ok(())
}

fn print_json(report: &DefaultsReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &DefaultsReport) {
    for row in &report.rows {
        println!("{}/{}", row.platform.as_str(), row.format.as_str());
        println!(
            "  Main fields: {}",
            row.main_fields
                .iter()
                .map(MainField::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Conditions:  {}", row.conditions.join(", "));
        println!();
    }
}
