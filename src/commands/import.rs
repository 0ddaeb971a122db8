use std::path::Path;

use super::{print_json, CommandError, Context};
use crate::pipeline::import::sanitize_filename;
use crate::pipeline::processor::{status_for_error, Ingestor};

/// `healthlog ingest <category> <file>`
pub fn ingest(ctx: &Context, category: &str, file: &Path) -> Result<(), CommandError> {
    let file_name = sanitize_filename(&file.to_string_lossy());

    let outcome = Ingestor::open(&ctx.data_dir)
        .and_then(|mut ingestor| ingestor.ingest_path(file, category))
        .map_err(|source| CommandError::Ingest {
            status: status_for_error(&file_name, &source),
            source,
        })?;

    if ctx.json {
        print_json(&outcome)
    } else {
        println!("{}", outcome.status_message());
        Ok(())
    }
}
