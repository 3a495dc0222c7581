//! Check command implementation

use crate::cli::commands::extract::load_extractor;
use crate::cli::error::CliError;
use std::path::Path;

/// Render the resolved root and schema of a valid configuration
pub fn describe_config(config_path: &Path) -> Result<String, CliError> {
    let extractor = load_extractor(config_path)?;
    let schema = serde_yaml::to_string(extractor.schema())
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    Ok(format!(
        "root: {}\npage_size: {}\n{}",
        extractor.root(),
        extractor.page_size(),
        schema
    ))
}

/// Handle the check command
pub fn handle_check(config_path: &Path) -> Result<(), CliError> {
    let description = describe_config(config_path)?;
    print!("{}", description);
    println!("Configuration is valid");
    Ok(())
}
