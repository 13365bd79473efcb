//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use mailsift_llm::LlmBackend;
use mailsift_triage::Triage;
use tracing::info;

/// Execute the process command.
pub async fn execute_process(args: ProcessArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    config.triage.validate().map_err(CliError::Config)?;

    let attachment_dir = args
        .attachment_dir
        .unwrap_or_else(|| config.settings.attachment_dir.clone());

    let backend = LlmBackend::from_config(&config.llm)?;
    let triage = Triage::new(backend, config.triage.clone());

    info!("Processing {} email(s) with {}", args.files.len(), triage.model_name());
    let batch = triage.process_batch(&args.files, &attachment_dir).await;

    println!("{}", formatter.format_batch(&batch)?);

    if batch.entries.is_empty() {
        return Err(CliError::Processing(format!(
            "none of the {} email(s) could be processed",
            batch.failures.len()
        )));
    }

    Ok(())
}
