//! Parse command - dump parsed statements as JSON

use anyhow::{Context, Result};
use cmtport_syntax::parse_file;
use std::path::Path;

/// Parse one requirements file and print the statement list to stdout
pub fn run(path: &Path) -> Result<()> {
    let req = parse_file(path).with_context(|| format!("Failed to parse {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&req)?);
    Ok(())
}
