//! Branches and the rule for folding a node into the branches found below it.

use std::collections::VecDeque;

use serde::Serialize;

use crate::network::ReactionNetwork;
use crate::node::NodeRef;

/// An ordered run of alternating clone/reaction nodes.
///
/// `parent` is the node the branch hangs off, which lives in some other
/// branch. A cycle branch ends where the traversal stepped back onto an
/// already visited node; that node is kept in `closes_at` rather than
/// repeated in `nodes`, so every node belongs to exactly one branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub nodes: VecDeque<NodeRef>,
    pub cycle: bool,
    pub closes_at: Option<NodeRef>,
    pub parent: Option<NodeRef>,
}

impl Branch {
    pub fn starting_at(node: NodeRef) -> Self {
        Self {
            nodes: VecDeque::from([node]),
            ..Self::default()
        }
    }

    /// Terminal marker for a step onto `revisited`.
    pub fn closing_at(revisited: NodeRef) -> Self {
        Self {
            cycle: true,
            closes_at: Some(revisited),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Node count, with the revisited node of a cycle counted once more.
    pub fn extent(&self) -> usize {
        self.nodes.len() + usize::from(self.closes_at.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.nodes.front().copied()
    }

    pub fn tail(&self) -> Option<NodeRef> {
        self.nodes.back().copied()
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.nodes.contains(&node)
    }

    pub fn predecessor(&self, node: NodeRef) -> Option<NodeRef> {
        let i = self.nodes.iter().position(|n| *n == node)?;
        i.checked_sub(1).and_then(|j| self.nodes.get(j)).copied()
    }

    pub fn successor(&self, node: NodeRef) -> Option<NodeRef> {
        let i = self.nodes.iter().position(|n| *n == node)?;
        self.nodes.get(i + 1).copied()
    }

    /// Human-readable dump used in diagnostics.
    pub fn describe(&self, network: &ReactionNetwork) -> String {
        let mut s = String::from(if self.cycle { "Cycle: " } else { "Branch: " });
        if let Some(parent) = self.parent {
            s.push_str(&format!("( {} ) ", network.node_label(parent)));
        }
        for node in &self.nodes {
            match node {
                NodeRef::Clone(_) => s.push_str(&network.node_label(*node)),
                NodeRef::Reaction(_) => {
                    s.push_str(&format!(" --[ {} ]--> ", network.node_label(*node)))
                }
            }
        }
        if let Some(revisited) = self.closes_at {
            s.push_str(&format!(" ~> {}", network.node_label(revisited)));
        }
        s
    }
}

/// Pick the branch `node` should extend: the longest linear branch, or the
/// longest cycle when every branch is a cycle. On equal length the earlier
/// branch wins.
pub fn find_merge_target(branches: &[Branch]) -> Option<usize> {
    longest(branches, false).or_else(|| longest(branches, true))
}

fn longest(branches: &[Branch], cycle: bool) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, branch) in branches.iter().enumerate().filter(|(_, b)| b.cycle == cycle) {
        match best {
            Some((_, len)) if branch.len() <= len => {}
            _ => best = Some((i, branch.len())),
        }
    }
    best.map(|(i, _)| i)
}

/// Fold `node` into the branches found beneath it.
///
/// With no branches, `node` starts a new one; with one, it becomes that
/// branch's head. With several, it heads the merge target and becomes the
/// parent of every other branch that has not yet been attached elsewhere.
/// The merge target is returned first, so each branch in the result comes
/// after the branch holding its parent.
pub fn merge_self_with_branches(node: NodeRef, mut branches: Vec<Branch>) -> Vec<Branch> {
    let Some(target) = find_merge_target(&branches) else {
        return vec![Branch::starting_at(node)];
    };
    let mut merged = branches.remove(target);
    merged.nodes.push_front(node);
    for branch in branches.iter_mut().filter(|b| b.parent.is_none()) {
        branch.parent = Some(node);
    }
    branches.insert(0, merged);
    branches
}
