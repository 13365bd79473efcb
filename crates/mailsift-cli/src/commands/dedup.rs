//! Dedup command implementation.

use crate::cli::DedupArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use mailsift_dedup::DuplicateDetector;
use std::fs;
use std::io::{self, Read};

/// Execute the dedup command.
pub fn execute_dedup(args: DedupArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let threshold = args.threshold.unwrap_or(config.triage.duplicate_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::InvalidInput(format!(
            "threshold must be between 0 and 1, got {}",
            threshold
        )));
    }

    let stdin = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    let texts = collect_texts(&args, stdin.as_deref())?;
    let pairs = DuplicateDetector::new().with_threshold(threshold).detect(&texts);

    println!("{}", formatter.format_duplicates(&pairs)?);
    Ok(())
}

/// Positional texts followed by those from `--file` and stdin.
fn collect_texts(args: &DedupArgs, stdin: Option<&str>) -> Result<Vec<String>> {
    let mut texts = args.texts.clone();

    if let Some(path) = &args.file {
        texts.extend(parse_text_array(&fs::read_to_string(path)?)?);
    }
    if let Some(json) = stdin {
        texts.extend(parse_text_array(json)?);
    }

    if texts.is_empty() {
        return Err(CliError::InvalidInput("No email texts provided".to_string()));
    }
    Ok(texts)
}

fn parse_text_array(json: &str) -> Result<Vec<String>> {
    serde_json::from_str(json)
        .map_err(|e| CliError::InvalidInput(format!("Expected a JSON array of strings: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(texts: &[&str]) -> DedupArgs {
        DedupArgs {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            file: None,
            stdin: false,
            threshold: None,
        }
    }

    #[test]
    fn test_collect_positional_texts() {
        let texts = collect_texts(&args(&["a", "b"]), None).unwrap();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_collect_from_file_and_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.json");
        fs::write(&path, r#"["from file"]"#).unwrap();

        let mut dedup_args = args(&["positional"]);
        dedup_args.file = Some(path);

        let texts = collect_texts(&dedup_args, Some(r#"["from stdin"]"#)).unwrap();
        assert_eq!(texts, vec!["positional", "from file", "from stdin"]);
    }

    #[test]
    fn test_no_texts() {
        let result = collect_texts(&args(&[]), None);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_json() {
        let result = collect_texts(&args(&[]), Some(r#"{"email_texts": []}"#));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut dedup_args = args(&["a", "a"]);
        dedup_args.threshold = Some(2.0);
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);

        let result = execute_dedup(dedup_args, &Config::default(), &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
