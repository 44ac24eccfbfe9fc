use super::utils::{build_usecase, load_config};
use anyhow::Result;
use std::path::Path;

/// Runs the response analysis in a scratch session.
pub async fn run(config: Option<&Path>, response: &str) -> Result<()> {
    let config = load_config(config)?;
    let usecase = build_usecase(&config);
    let session_id = usecase.create_session(Some("Scratch"), None, None).await?;

    let analysis = usecase.analyse_response(&session_id, response, None).await?;

    println!("Ideas ({}):", analysis.split.idea_count);
    for idea in &analysis.split.ideas {
        println!("  - {} ({:?})", idea.text, idea.idea_type);
    }
    if let Some(nudge) = analysis.vagueness.nudge.as_deref() {
        println!("Vague answer. Nudge: {nudge}");
    }
    println!("Follow-up: {}", analysis.follow_up);
    Ok(())
}
