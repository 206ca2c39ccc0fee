//! CLI entry point for the data cleaning engine.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_cleaning::io::{read_csv, write_csv};
use lex_cleaning::utils::truncate_str;
use lex_cleaning::{
    CleaningConfig, CleaningEngine, CleaningError, CleaningReport, DataProfiler, Dataset,
    FillStrategy, NumericFill, OutlierStrategy, ReportGenerator, ReportParams, TargetType,
    TextFill, TypeCorrector,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// CLI-compatible conversion target enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTargetType {
    /// Whole numbers; fails on missing values
    Integer,
    /// Floating point numbers
    Float,
    /// Text
    Text,
    /// true/false
    Boolean,
}

impl From<CliTargetType> for TargetType {
    fn from(cli: CliTargetType) -> Self {
        match cli {
            CliTargetType::Integer => TargetType::Integer,
            CliTargetType::Float => TargetType::Float,
            CliTargetType::Text => TargetType::Text,
            CliTargetType::Boolean => TargetType::Boolean,
        }
    }
}

/// `OLD:NEW`
#[derive(Debug, Clone)]
struct RenameSpec {
    from: String,
    to: String,
}

/// `COLUMN:TYPE`
#[derive(Debug, Clone)]
struct ConvertSpec {
    column: String,
    target: TargetType,
}

/// `COLUMN:STRATEGY[:VALUE]`
#[derive(Debug, Clone)]
struct FillSpec {
    column: String,
    strategy: FillStrategy,
}

/// `COLUMN:STRATEGY[:VALUE]`
#[derive(Debug, Clone)]
struct RemediateSpec {
    column: String,
    strategy: OutlierStrategy,
}

fn split_spec(spec: &str) -> Result<(&str, &str, Option<&str>), String> {
    let mut parts = spec.splitn(3, ':');
    let column = parts.next().filter(|c| !c.is_empty());
    let action = parts.next().filter(|a| !a.is_empty());
    match (column, action) {
        (Some(column), Some(action)) => Ok((column, action, parts.next())),
        _ => Err(format!("expected COLUMN:ACTION, got '{}'", spec)),
    }
}

fn parse_number(value: Option<&str>, spec: &str) -> Result<f64, String> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .ok_or_else(|| format!("'{}' needs a numeric value, e.g. price:value:9.5", spec))
}

fn parse_rename(spec: &str) -> Result<RenameSpec, String> {
    match spec.split_once(':') {
        Some((from, to)) if !from.is_empty() => Ok(RenameSpec {
            from: from.to_string(),
            to: to.to_string(),
        }),
        _ => Err(format!("expected OLD:NEW, got '{}'", spec)),
    }
}

fn parse_convert(spec: &str) -> Result<ConvertSpec, String> {
    let (column, target, _) = split_spec(spec)?;
    let target = CliTargetType::from_str(target, true)?;
    Ok(ConvertSpec {
        column: column.to_string(),
        target: target.into(),
    })
}

fn parse_fill(spec: &str) -> Result<FillSpec, String> {
    let (column, action, value) = split_spec(spec)?;
    let strategy = match action.to_ascii_lowercase().as_str() {
        "mean" => NumericFill::Mean.into(),
        "median" => NumericFill::Median.into(),
        "mode" => NumericFill::Mode.into(),
        "value" => NumericFill::Value(parse_number(value, spec)?).into(),
        "most-frequent" => TextFill::MostFrequent.into(),
        "text" => TextFill::Value(value.unwrap_or_default().to_string()).into(),
        other => {
            return Err(format!(
                "unknown fill strategy '{}' (mean, median, mode, value:N, most-frequent, text:S)",
                other
            ));
        }
    };
    Ok(FillSpec {
        column: column.to_string(),
        strategy,
    })
}

fn parse_remediate(spec: &str) -> Result<RemediateSpec, String> {
    let (column, action, value) = split_spec(spec)?;
    let strategy = match action.to_ascii_lowercase().as_str() {
        "mean" => OutlierStrategy::Mean,
        "median" => OutlierStrategy::Median,
        "mode" => OutlierStrategy::Mode,
        "custom" => OutlierStrategy::Custom(parse_number(value, spec)?),
        other => {
            return Err(format!(
                "unknown outlier strategy '{}' (mean, median, mode, custom:N)",
                other
            ));
        }
    };
    Ok(RemediateSpec {
        column: column.to_string(),
        strategy,
    })
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Interactive-style data cleaning for CSV files",
    long_about = "Cleans a CSV file step by step: column names, types, missing values, \
                  duplicates and IQR outliers.\n\n\
                  Steps run in a fixed order: normalize, rename, drop columns, infer types, \
                  convert, drop duplicates, drop missing rows, fills, outlier remediation.\n\n\
                  EXAMPLES:\n  \
                  # Inspect a file\n  \
                  lex-cleaning -i data.csv --dry-run\n\n  \
                  # Typical cleaning session\n  \
                  lex-cleaning -i data.csv --normalize-schema --infer-types --drop-duplicates \\\n    \
                  --fill age:median --fill city:most-frequent --remediate price:custom:0\n\n  \
                  # Machine-readable report\n  \
                  lex-cleaning -i data.csv --infer-types --json"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "<input_name>_cleaned"
    #[arg(long)]
    output_name: Option<String>,

    /// Normalize column names to snake_case
    #[arg(long)]
    normalize_schema: bool,

    /// Rename a column (OLD:NEW); repeatable
    #[arg(long, value_parser = parse_rename)]
    rename: Vec<RenameSpec>,

    /// Remove a column; repeatable
    #[arg(long = "drop-column")]
    drop_columns: Vec<String>,

    /// Lowercase text and convert mostly-numeric text columns
    #[arg(long)]
    infer_types: bool,

    /// Convert a column (COLUMN:integer|float|text|boolean); repeatable
    #[arg(long, value_parser = parse_convert)]
    convert: Vec<ConvertSpec>,

    /// Remove duplicate rows
    #[arg(long)]
    drop_duplicates: bool,

    /// Remove rows with any missing value
    #[arg(long)]
    drop_missing: bool,

    /// Fill missing values (COLUMN:mean|median|mode|value:N|most-frequent|text:S); repeatable
    #[arg(long, value_parser = parse_fill)]
    fill: Vec<FillSpec>,

    /// Replace outliers (COLUMN:mean|median|mode|custom:N); repeatable
    #[arg(long, value_parser = parse_remediate)]
    remediate: Vec<RemediateSpec>,

    /// Numeric share above which a text column becomes numeric (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    numeric_threshold: f64,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Show the profile, type inference preview and outlier counts without
    /// changing anything
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = CleaningConfig::builder()
        .numeric_threshold(args.numeric_threshold)
        .iqr_multiplier(args.iqr_multiplier)
        .build()?;
    let engine = CleaningEngine::new(config)?;

    info!("Loading dataset from: {}", args.input);
    let dataset = read_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", dataset.shape());

    if args.dry_run {
        return run_dry_run(&args, &engine, &dataset);
    }

    run_cleaning(&args, engine, dataset)
}

/// Apply the requested steps in their fixed order.
///
/// A failing step is logged and recorded as a warning; later steps still run.
fn run_cleaning(args: &Args, mut engine: CleaningEngine, mut dataset: Dataset) -> Result<()> {
    let original_shape = dataset.shape();
    let mut warnings: Vec<String> = Vec::new();

    if args.normalize_schema {
        let report = engine.normalize_schema(&mut dataset);
        for collision in &report.collisions {
            let message = format!(
                "'{}' and '{}' both normalize to '{}'",
                collision.first, collision.second, collision.normalized
            );
            warnings.push(message);
        }
    }

    for spec in &args.rename {
        if let Err(e) = engine.rename_column(&mut dataset, &spec.from, &spec.to) {
            note_failure(&mut warnings, format!("rename '{}'", spec.from), e);
        }
    }

    if !args.drop_columns.is_empty() {
        let names: Vec<&str> = args.drop_columns.iter().map(String::as_str).collect();
        if let Err(e) = engine.drop_columns(&mut dataset, &names) {
            note_failure(&mut warnings, "drop columns".to_string(), e);
        }
    }

    if args.infer_types {
        engine.infer_and_coerce_types(&mut dataset);
    }

    for spec in &args.convert {
        if let Err(e) = engine.convert_column_type(&mut dataset, &spec.column, spec.target) {
            note_failure(&mut warnings, format!("convert '{}'", spec.column), e);
        }
    }

    if args.drop_duplicates {
        engine.drop_duplicates(&mut dataset);
    }

    if args.drop_missing {
        engine.drop_rows_with_missing(&mut dataset);
    }

    for spec in &args.fill {
        if let Err(e) = engine.fill_missing(&mut dataset, &spec.column, &spec.strategy) {
            note_failure(&mut warnings, format!("fill '{}'", spec.column), e);
        }
    }

    for spec in &args.remediate {
        if let Err(e) = engine.remediate_outliers(&mut dataset, &spec.column, spec.strategy) {
            note_failure(&mut warnings, format!("remediate '{}'", spec.column), e);
        }
    }

    let input_stem = extract_file_stem(&args.input);

    // Export is only offered for a dataset that was actually cleaned
    let output_file = if engine.is_cleaned() {
        let name = args
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{}_cleaned", input_stem));
        let path = PathBuf::from(&args.output).join(format!("{}.csv", name));
        match write_csv(&dataset, &path) {
            Ok(()) => Some(path.display().to_string()),
            Err(e) => {
                note_failure(&mut warnings, "export".to_string(), e);
                None
            }
        }
    } else {
        info!("No cleaning steps applied; nothing written");
        None
    };

    let report = ReportGenerator::build_report(ReportParams {
        input_file: &args.input,
        output_file: output_file.as_deref(),
        engine: &engine,
        original_shape,
        dataset: &dataset,
        warnings: &warnings,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(PathBuf::from(&args.output));
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Log a failed step and keep it for the report.
fn note_failure(warnings: &mut Vec<String>, step: String, e: CleaningError) {
    if e.is_warning() {
        warn!("{} refused: {}", step, e);
    } else {
        error!("{} failed: {}", step, e);
    }
    warnings.push(format!("{}: {}", step, e));
}

/// Run dry-run mode - show the dataset without changing it.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_dry_run(args: &Args, engine: &CleaningEngine, dataset: &Dataset) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Dataset inspection");
    println!("{}\n", "=".repeat(80));

    let profile = DataProfiler::profile_dataset(dataset);

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", profile.shape.0);
    println!("  Columns: {}", profile.shape.1);
    println!("  Missing cells: {}", profile.missing_cells);
    println!(
        "  Duplicate rows: {} ({:.1}%)",
        profile.duplicate_count, profile.duplicate_percentage
    );
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<12} {:<10} {:<8} {:<25}",
        "Column", "Type", "Missing %", "Unique", "Top value"
    );
    println!("{}", "-".repeat(78));
    for col in &profile.column_profiles {
        let top = col
            .top_values
            .first()
            .map(|v| format!("{} ({})", truncate_str(&v.value, 15), v.count))
            .unwrap_or_default();
        println!(
            "{:<20} {:<12} {:<10.1} {:<8} {:<25}",
            truncate_str(&col.name, 19),
            col.dtype,
            col.missing_percentage,
            col.unique_count,
            top
        );
    }
    println!();

    let numeric: Vec<_> = profile
        .column_profiles
        .iter()
        .filter_map(|c| c.numeric_summary.map(|s| (&c.name, s)))
        .collect();
    if !numeric.is_empty() {
        println!("NUMERIC SUMMARY");
        println!("{}", "-".repeat(40));
        println!(
            "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Column", "Mean", "Min", "Median", "Max", "Std"
        );
        for (name, s) in numeric {
            println!(
                "{:<20} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10}",
                truncate_str(name, 19),
                s.mean,
                s.min,
                s.median,
                s.max,
                s.std.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string())
            );
        }
        println!();
    }

    println!("TYPE INFERENCE PREVIEW");
    println!("{}", "-".repeat(40));
    let candidates = TypeCorrector.detect_numeric_candidates(dataset, engine.config());
    if candidates.is_empty() {
        println!("  No text columns");
    } else {
        for candidate in &candidates {
            println!(
                "  - {}: {:.0}% numeric -> {}",
                candidate.column,
                candidate.numeric_fraction * 100.0,
                candidate.outcome
            );
        }
    }
    println!();

    println!("OUTLIERS (IQR x {})", engine.config().iqr_multiplier);
    println!("{}", "-".repeat(40));
    match engine.detect_outliers(dataset, &[]) {
        Ok(report) => {
            for column in &report.columns {
                let confidence = if column.low_confidence {
                    " (low confidence)"
                } else {
                    ""
                };
                println!(
                    "  - {}: {} outliers{}",
                    column.column, column.outlier_count, confidence
                );
            }
        }
        Err(e) => println!("  {}", e),
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To clean, run without --dry-run and choose steps, e.g. --infer-types");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the cleaning session.
fn print_human_readable_summary(report: &CleaningReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, report.original_shape.0, report.original_shape.1
    );
    match &report.output_file {
        Some(output_file) => println!(
            "Output: {} ({} rows x {} columns)",
            output_file, report.final_shape.0, report.final_shape.1
        ),
        None if report.is_cleaned() => println!("Output: none (export failed, see warnings)"),
        None => println!("Output: none (no cleaning steps applied)"),
    }
    println!();

    println!("Summary:");
    println!(
        "  Rows: {} -> {} ({} removed)",
        report.original_shape.0, report.final_shape.0, report.rows_removed
    );
    println!(
        "  Columns: {} -> {} ({} removed)",
        report.original_shape.1, report.final_shape.1, report.columns_removed
    );
    println!("  Missing cells: {}", report.final_profile.missing_cells);
    if let Some(outliers) = &report.outliers {
        println!("  Outliers remaining: {}", outliers.total_outliers());
    }
    println!();

    if !report.actions.is_empty() {
        println!("Actions Taken:");
        for action in &report.actions {
            println!(
                "  - [{}] {}: {}",
                action.action_type.display_name(),
                action.target,
                action.description
            );
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_export_failure_still_reports() {
        let input = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/colliding_names.csv");
        let output =
            std::env::temp_dir().join(format!("lex_cleaning_cli_{}", std::process::id()));
        let args = Args::parse_from([
            "lex-cleaning",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--normalize-schema",
            "--emit-report",
            "--quiet",
        ]);

        let dataset = read_csv(&args.input).unwrap();
        run_cleaning(&args, CleaningEngine::default(), dataset).unwrap();

        assert!(!output.join("colliding_names_cleaned.csv").exists());
        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(output.join("colliding_names_report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["cleaned"], true);
        assert!(report["output_file"].is_null());

        let warnings = report["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].as_str().unwrap().contains("total_cost"));
        assert!(warnings[1].as_str().unwrap().starts_with("export:"));

        fs::remove_dir_all(output).ok();
    }
}
