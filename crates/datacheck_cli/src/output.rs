use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use datacheck_core::ConstraintSet;
use datacheck_store::to_json_string;
use datacheck_validator::{CheckOutcome, Verifier};
use serde_json::{Map, Value as JsonValue, json};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_verification_report(verifier: &Verifier, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_report(verifier),
        OutputFormat::Text => {
            print_text_report(verifier);
            Ok(())
        }
    }
}

fn print_text_report(verifier: &Verifier) {
    let summary = verifier.summary();

    println!("\n{}", "═".repeat(60));
    println!("{}", "  VERIFICATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if verifier.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Verification PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Verification FAILED".red().bold()
        );
    }

    for (column, outcomes) in summary.iter() {
        println!("\n{}", column.bold());
        for (kind, outcome) in outcomes {
            let line = format!("  {:<12} {}", kind.as_str(), outcome);
            if outcome.passed() {
                println!("{}", line);
            } else {
                println!("{}", line.red());
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total breaks:    {}", verifier.total_breaks());
    println!("  Type mismatches: {}", summary.type_mismatches());
    println!("  Violating rows:  {}", verifier.violations().height());
    println!("{}", "═".repeat(60));
}

fn outcome_json(outcome: CheckOutcome) -> JsonValue {
    match outcome {
        CheckOutcome::Breaks(n) => json!(n),
        CheckOutcome::TypeMismatch(mismatch) => json!(mismatch),
    }
}

fn print_json_report(verifier: &Verifier) -> Result<()> {
    let summary = verifier.summary();
    let columns: Map<String, JsonValue> = summary
        .iter()
        .map(|(column, outcomes)| {
            let checks: Map<String, JsonValue> = outcomes
                .iter()
                .map(|(kind, outcome)| (kind.to_string(), outcome_json(*outcome)))
                .collect();
            (column.to_string(), JsonValue::Object(checks))
        })
        .collect();

    let output = json!({
        "passed": verifier.passed(),
        "columns": columns,
        "summary": {
            "total_breaks": verifier.total_breaks(),
            "type_mismatches": summary.type_mismatches(),
            "violating_rows": verifier.violations().height(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_constraints(constraints: &ConstraintSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json_string(constraints)?),
        OutputFormat::Text => {
            for (column, record) in constraints.iter() {
                println!("{}", column.bold());
                for (kind, value) in record.iter() {
                    println!("  {:<12} {}", kind.as_str(), value);
                }
            }
            println!("\n{} columns", constraints.len());
        }
    }
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
