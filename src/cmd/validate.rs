//! Validate command - surface request problems without calculating a schedule

use crate::cmd::RequestArgs;
use clap::Args;
use propdep::core::{validate_financing, DepreciationError};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    input: RequestArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    field: String,
    message: String,
}

impl From<&DepreciationError> for ValidationIssue {
    fn from(err: &DepreciationError) -> Self {
        ValidationIssue {
            field: err.field(),
            message: err.to_string(),
        }
    }
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let request = self.input.load_request()?;
        let engine = self.input.engine()?;

        let mut errors = engine.validate(&request);
        errors.extend(validate_financing(&request));
        let issues: Vec<ValidationIssue> = errors.iter().map(ValidationIssue::from).collect();

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues, request.assets.len());
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue], asset_count: usize) {
        println!();
        println!("VALIDATION RESULTS ({} assets)", asset_count);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.field, issue.message);
            }
            println!();
        }
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
