use snafu::ResultExt;
use std::{fs, path::PathBuf};

use crate::Result;
use crate::docs::{api_info, create_api_registry};
use crate::error::{JsonSerializeSnafu, WriteFileSnafu};

/// Renders the OpenAPI document to stdout or to the given file
pub fn run_openapi(output: Option<PathBuf>) -> Result<()> {
    let registry = create_api_registry()?;
    let doc = registry.document(&api_info());
    let contents = serde_json::to_string_pretty(&doc).context(JsonSerializeSnafu)?;

    match output {
        Some(path) => {
            fs::write(&path, contents).context(WriteFileSnafu { path: path.clone() })?;
            println!("OpenAPI document written to {}", path.display());
        }
        None => println!("{}", contents),
    }

    Ok(())
}

pub fn run_keygen() -> Result<()> {
    println!("{}", cipher::generate_key());
    Ok(())
}
