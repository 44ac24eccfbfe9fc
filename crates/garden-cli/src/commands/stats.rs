use super::utils::{load_config, open_session};
use anyhow::Result;
use std::path::Path;

pub async fn run(config: Option<&Path>, file: &Path, depth: Option<u32>) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(depth) = depth {
        config.workshop.shallow_depth = depth;
    }
    let (usecase, session_id) = open_session(&config, file).await?;
    let dashboard = usecase.dashboard(&session_id).await?;
    let stats = dashboard.stats;

    println!("Session:     {}", dashboard.title);
    println!("Phase:       {}", dashboard.phase);
    println!("Nodes:       {}", stats.total_nodes);
    println!("Max depth:   {}", stats.max_depth);
    println!(
        "Shallow:     {} ({})",
        stats.shallow_nodes,
        shallow_caption(config.workshop.shallow_depth)
    );
    println!("Unclustered: {}", stats.unclustered_nodes);
    println!("Clusters:    {}", stats.total_clusters);
    for count in &dashboard.cluster_counts {
        println!("  {:<20} {}", count.label, count.node_count);
    }

    if !dashboard.shallow_nodes.is_empty() {
        println!("\nWorth deepening:");
        for node in &dashboard.shallow_nodes {
            println!("  - {} (level {})", node.text, node.level);
        }
    }
    Ok(())
}

fn shallow_caption(depth: u32) -> String {
    format!("leaves shallower than depth {depth}")
}
