//! `ghost validate`: check a mock file for errors.
//!
//! Parses and validates the mock file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::error::GhostError;
use crate::mock::bundle::parse_mock_file_str;
use crate::mock::validation;

pub fn execute(args: &ValidateArgs) -> Result<(), GhostError> {
    let path = &args.file;

    if !path.exists() {
        return Err(GhostError::MockFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let path_display = path.display().to_string();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let file = parse_mock_file_str(ext, &content, &path_display)?;

    if let Err(errors) = validation::validate(&file.mocks) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "mock": e.mock,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(GhostError::MockValidation {
            path: path_display,
            errors,
        });
    }

    let name = file.name.as_deref().unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mocks")
    });

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path_display, name, &file.mocks)
            );
        }
        ValidateFormat::Json => {
            let keys: Vec<String> = file.mocks.iter().map(crate::mock::Mock::key).collect();
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "name": name,
                    "mocks": keys,
                })
            );
        }
    }

    Ok(())
}
