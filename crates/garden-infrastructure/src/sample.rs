//! Bundled sample workshop.

use crate::dto::parse_session_json;
use garden_core::error::Result;
use garden_core::id::generate_id;
use garden_core::session::Session;

const SAMPLE_SESSION_JSON: &str = include_str!("../fixtures/sample_session.json");

/// Builds a fresh copy of the sample workshop.
///
/// Each call yields a new session id and new node, cluster and prompt-log ids;
/// the tree is re-inserted node by node so levels come from the parent links
/// alone, and the root is whatever the rebuilt tree resolves to.
pub fn sample_session() -> Result<Session> {
    let export = parse_session_json(SAMPLE_SESSION_JSON)?;
    let session = export.into_session(generate_id("session"))?;
    tracing::info!(
        session_id = %session.id(),
        nodes = session.nodes().len(),
        "sample session loaded"
    );
    Ok(session)
}
