//! Extract command implementation

use crate::cli::error::CliError;
use crate::config::ParserConfig;
use crate::extract::{Extractor, PathInput, RunSummary};
use crate::output::JsonLinesOutput;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the extract command
#[derive(Debug, Clone)]
pub struct ExtractArgs {
    pub config: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub force: bool,
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }
    Ok(())
}

/// Load and validate the configuration file
pub fn load_extractor(config_path: &Path) -> Result<Extractor, CliError> {
    if !config_path.exists() {
        return Err(CliError::FileNotFound(config_path.to_path_buf()));
    }
    let config = ParserConfig::load(config_path)?;
    Ok(Extractor::new(config)?)
}

fn open_writer(output: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CliError::FileWriteError(
                        path.to_path_buf(),
                        format!("Failed to create directory: {}", e),
                    )
                })?;
            }
            let file = File::create(path)
                .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

/// Handle the extract command
pub fn handle_extract(args: &ExtractArgs) -> Result<RunSummary, CliError> {
    if args.inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "At least one input file is required".to_string(),
        ));
    }
    if let Some(output) = &args.output {
        check_file_overwrite(output, args.force)?;
    }
    for input in &args.inputs {
        if !input.exists() {
            return Err(CliError::FileNotFound(input.clone()));
        }
    }

    let extractor = load_extractor(&args.config)?;
    let writer = open_writer(args.output.as_deref())?;
    let output = JsonLinesOutput::new(writer, extractor.schema().clone());
    let mut input = PathInput::new(args.inputs.iter().cloned());

    let summary = extractor.run(&mut input, output)?;

    eprintln!(
        "Extracted {} records from {} files",
        summary.records, summary.files
    );
    if summary.discarded_partial_records > 0 {
        eprintln!(
            "Discarded {} partial records at document end",
            summary.discarded_partial_records
        );
    }
    Ok(summary)
}
