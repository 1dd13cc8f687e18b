use miette::{IntoDiagnostic, Result};
use resolvent_core::{
    read_descriptor, resolve_with_trace, BuildConfig, ExplainReport, ImportRequest, MainField,
};
use std::path::{Path, PathBuf};

/// Run the explain command.
///
/// When `json` is true, outputs a single JSON object to stdout.
/// Otherwise, outputs human-readable formatted text to stdout.
/// Exits with code 2 when the specifier does not resolve.
pub fn run(
    cwd: &Path,
    specifier: &str,
    manifest: Option<&Path>,
    config: &BuildConfig,
    json: bool,
) -> Result<()> {
    let manifest_path = manifest_path(cwd, manifest);
    let descriptor = read_descriptor(&manifest_path).into_diagnostic()?;

    let request = build_request(specifier, &descriptor.name);
    let traced = resolve_with_trace(&descriptor, &request, config);

    let package = if descriptor.name.is_empty() {
        request.specifier.clone()
    } else {
        descriptor.name.clone()
    };
    let report = ExplainReport::new(&package, &request, config, &traced);

    if json {
        print_json(&report)?;
    } else {
        print_human(&report);
    }

    if !report.is_resolved() {
        std::process::exit(2);
    }
    Ok(())
}

fn manifest_path(cwd: &Path, manifest: Option<&Path>) -> PathBuf {
    match manifest {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd.join("package.json"),
    }
}

/// Turn the command-line specifier into an import request.
///
/// A specifier starting with "." addresses a subpath of the loaded
/// manifest's own package; anything else is parsed as a bare specifier.
fn build_request(specifier: &str, package_name: &str) -> ImportRequest {
    if specifier == "." {
        return ImportRequest::root(package_name);
    }
    if let Some(rest) = specifier.strip_prefix('.') {
        if rest.starts_with('/') {
            return ImportRequest::new(package_name, specifier);
        }
        eprintln!("error: invalid subpath {specifier:?} (expected \".\" or \"./...\")");
        std::process::exit(2);
    }
    ImportRequest::parse(specifier).unwrap_or_else(|| {
        eprintln!("error: invalid specifier {specifier:?}");
        std::process::exit(2);
    })
}

fn print_json(report: &ExplainReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &ExplainReport) {
    println!("Package: {}", report.package);
    println!("Specifier: {}", report.specifier);
    println!("Subpath: {}", report.subpath);
    println!("Platform: {}", report.platform.as_str());
    println!("Format: {}", report.format.as_str());
    println!("Conditions: {}", report.conditions.join(", "));
    println!("Main fields: {}", join_fields(&report.main_fields));
    println!();

    if let Some(ref resolved) = report.resolved {
        println!("Resolved: {resolved}");
        if let Some(mechanism) = report.mechanism {
            println!("Mechanism: {}", mechanism.as_str());
        }
        if let Some(field) = report.field {
            println!("Field: {}", field.as_str());
        }
        if let Some(ref condition) = report.condition {
            println!("Condition: {condition}");
        }
    } else {
        println!("Status: UNRESOLVED");
        if let Some(code) = report.error_code {
            println!("Error: {code}");
        }
        if let Some(ref msg) = report.error_message {
            println!("Message: {msg}");
        }
    }
    println!();

    println!("Resolution trace:");
    for (i, step) in report.trace.iter().enumerate() {
        let status = if step.ok { "OK" } else { "FAIL" };
        println!("  {}. [{}] {}: {}", i + 1, status, step.step, step.detail);

        if let Some(ref key) = step.key {
            println!("      key: {key}");
        }
        if let Some(ref condition) = step.condition {
            println!("      condition: {condition}");
        }
        if let Some(ref target) = step.target {
            println!("      target: {target}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  [{}] {}", warning.code, warning.message);
        }
    }
}

fn join_fields(fields: &[MainField]) -> String {
    fields
        .iter()
        .map(MainField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
