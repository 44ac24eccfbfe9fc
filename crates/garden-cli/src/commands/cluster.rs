use super::utils::{load_config, open_session, write_output};
use anyhow::Result;
use garden_application::ClusterOutcome;
use std::path::Path;

pub async fn run(config: Option<&Path>, file: &Path, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let (usecase, session_id) = open_session(&config, file).await?;

    match usecase.suggest_clusters(&session_id).await? {
        ClusterOutcome::TooFewNodes {
            node_count,
            required,
        } => {
            eprintln!("Only {node_count} nodes; clustering needs at least {required}.");
            return Ok(());
        }
        ClusterOutcome::NoSuggestions => {
            eprintln!("No cluster suggestions; the session is unchanged.");
            return Ok(());
        }
        ClusterOutcome::Applied {
            clusters,
            assigned_nodes,
        } => eprintln!("Applied {clusters} clusters covering {assigned_nodes} nodes."),
    }

    for count in usecase.dashboard(&session_id).await?.cluster_counts {
        eprintln!("  {:<20} {}", count.label, count.node_count);
    }
    write_output(out, &usecase.export_session(&session_id).await?)
}
