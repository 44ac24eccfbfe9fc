use super::utils::write_output;
use anyhow::{Context, Result};
use garden_infrastructure::dto::export_session_json;
use garden_infrastructure::sample::sample_session;
use std::path::Path;

pub fn run(out: Option<&Path>) -> Result<()> {
    let session = sample_session().context("Failed to build the sample session")?;
    let json = export_session_json(&session)?;
    write_output(out, &json)
}
