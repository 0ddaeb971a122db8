use std::path::PathBuf;

use super::{print_json, CommandError, Context};
use crate::config;
use crate::pipeline::storage::export_to;

/// `healthlog export [--output DIR]`
pub fn export(ctx: &Context, output: Option<PathBuf>) -> Result<(), CommandError> {
    let dir = output.unwrap_or_else(|| config::exports_dir(&ctx.data_dir));
    let store = ctx.load_store()?;
    let result = export_to(&store, &dir)?;

    if ctx.json {
        print_json(&result)
    } else {
        println!(
            "Exported {} records to {}",
            result.records, result.path
        );
        Ok(())
    }
}
