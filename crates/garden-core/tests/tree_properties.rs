//! Property tests for tree construction and subtree deletion.

use garden_core::session::{NodeDraft, RootStatus, Session};
use proptest::prelude::*;
use std::collections::HashSet;

/// Builds a tree from a list of parent choices: `choices[i]` picks the parent
/// of node `i + 1` among the nodes already inserted (node 0 is the root).
fn build(choices: &[usize]) -> (Session, Vec<String>) {
    let mut session = Session::new(Some("prop"), None);
    let mut ids = vec![
        session
            .add_node(NodeDraft::root("root"))
            .unwrap()
            .id()
            .to_string(),
    ];
    for (i, choice) in choices.iter().enumerate() {
        let parent = ids[choice % ids.len()].clone();
        let id = session
            .add_node(NodeDraft::child_of(parent, format!("cause {i}")))
            .unwrap()
            .id()
            .to_string();
        ids.push(id);
    }
    (session, ids)
}

fn descendants(session: &Session, node_id: &str) -> HashSet<String> {
    let mut out = HashSet::new();
    let mut stack = vec![node_id.to_string()];
    while let Some(id) = stack.pop() {
        if let Some(node) = session.get_node(&id) {
            stack.extend(node.children().iter().cloned());
        }
        out.insert(id);
    }
    out
}

fn choices() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..64, 0..40)
}

proptest! {
    #[test]
    fn level_is_parent_level_plus_one(choices in choices()) {
        let (session, _) = build(&choices);
        for node in session.nodes() {
            match node.parent_id() {
                Some(parent_id) => {
                    let parent = session.get_node(parent_id).unwrap();
                    prop_assert_eq!(node.level(), parent.level() + 1);
                    prop_assert!(parent.children().iter().any(|c| c == node.id()));
                }
                None => prop_assert_eq!(node.level(), 0),
            }
        }
        prop_assert!(matches!(session.root_status(), RootStatus::Single(_)));
    }

    #[test]
    fn delete_removes_exactly_the_subtree(choices in choices(), pick in 0usize..64) {
        let (mut session, ids) = build(&choices);
        let target = ids[pick % ids.len()].clone();
        let expected = descendants(&session, &target);
        let parent_id = session.get_node(&target).unwrap().parent_id().map(str::to_string);
        let before: HashSet<String> = ids.iter().cloned().collect();

        let removed = session.delete_node(&target);

        let after: HashSet<String> = session.nodes().iter().map(|n| n.id().to_string()).collect();
        prop_assert_eq!(removed, expected.len());
        prop_assert_eq!(&before - &after, expected);

        if let Some(parent_id) = parent_id {
            let parent = session.get_node(&parent_id).unwrap();
            prop_assert!(!parent.children().contains(&target));
            prop_assert!(session.root_node().is_some());
        } else {
            prop_assert!(session.root_node().is_none());
            prop_assert!(session.build_tree().is_none());
        }
    }

    #[test]
    fn tree_projection_covers_every_node(choices in choices()) {
        let (session, _) = build(&choices);
        let tree = session.build_tree().unwrap();
        prop_assert_eq!(tree.size(), session.nodes().len());
        prop_assert_eq!(session.stats().max_depth, session.nodes().iter().map(|n| n.level()).max().unwrap());
    }
}
