use super::utils::{load_config, open_session};
use anyhow::Result;
use garden_application::Dashboard;
use garden_core::session::TreeNode;
use std::path::Path;

pub async fn run(config: Option<&Path>, file: &Path) -> Result<()> {
    let config = load_config(config)?;
    let (usecase, session_id) = open_session(&config, file).await?;
    let dashboard = usecase.dashboard(&session_id).await?;

    println!("{} ({})", dashboard.title, dashboard.phase);
    match &dashboard.tree {
        Some(tree) => print_node(&dashboard, tree, 0),
        None => println!("  (no nodes yet)"),
    }
    if !dashboard.detached.is_empty() {
        println!("\nDetached:");
        for tree in &dashboard.detached {
            print_node(&dashboard, tree, 0);
        }
    }
    Ok(())
}

fn print_node(dashboard: &Dashboard, root: &TreeNode, indent: usize) {
    let mut stack = vec![(root, indent)];
    while let Some((node, indent)) = stack.pop() {
        let agency = node
            .agency
            .map(|a| format!(" agency:{a}"))
            .unwrap_or_default();
        println!(
            "{:indent$}- {} [{}]{}",
            "",
            node.text,
            dashboard.cluster_label(node.cluster_id.as_deref()),
            agency,
            indent = indent * 2
        );
        stack.extend(node.children.iter().rev().map(|child| (child, indent + 1)));
    }
}
