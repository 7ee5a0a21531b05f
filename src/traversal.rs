//! Branch discovery over the bipartite species/reaction graph.
//!
//! The search is a depth-first walk from one node. A single `seen` set is
//! shared by every recursive call of one search, so no node is visited
//! twice even across different branches; stepping onto a seen node ends
//! that edge with a cycle marker. Each node folds itself into the branches
//! returned by its descendants on the way back up.

use std::collections::HashSet;

use crate::branch::{merge_self_with_branches, Branch};
use crate::network::ReactionNetwork;
use crate::node::{CloneId, NodeRef, ReactionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Follow reactions from reactants to products.
    pub forward: bool,
    /// Drop branches of fewer than two nodes from the result. A cycle's
    /// revisited node counts toward its size.
    pub extended: bool,
    /// Walk through reactions whose species span several compartments.
    pub follow_transporters: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            forward: true,
            extended: true,
            follow_transporters: false,
        }
    }
}

/// Run one search from `start` with a fresh `seen` set.
pub fn find_branches(network: &ReactionNetwork, start: NodeRef, options: &SearchOptions) -> Vec<Branch> {
    let mut seen = HashSet::new();
    let mut branches = find_branches_rec(network, start, &mut seen, options, None);
    if options.extended {
        branches.retain(|branch| branch.extent() > 1);
    }
    branches
}

/// Recursive step. `last` is the node that led here and is never stepped
/// back onto.
pub fn find_branches_rec(
    network: &ReactionNetwork,
    node: NodeRef,
    seen: &mut HashSet<NodeRef>,
    options: &SearchOptions,
    last: Option<NodeRef>,
) -> Vec<Branch> {
    seen.insert(node);
    let successors = match node {
        NodeRef::Clone(clone) => clone_successors(network, clone, options),
        NodeRef::Reaction(reaction) => {
            reaction_successors(network, reaction, last.and_then(NodeRef::as_clone), options)
        }
    };

    let mut branches = Vec::new();
    for next in successors {
        if Some(next) == last {
            continue;
        }
        if seen.contains(&next) {
            branches.push(Branch::closing_at(next));
            continue;
        }
        branches.extend(find_branches_rec(network, next, seen, options, Some(node)));
    }
    merge_self_with_branches(node, branches)
}

fn clone_successors(network: &ReactionNetwork, clone: CloneId, options: &SearchOptions) -> Vec<NodeRef> {
    let Some(species_clone) = network.get_clone(clone) else {
        return Vec::new();
    };
    let is_reversible = |r: ReactionId| network.is_reversible(r);
    let reactions = if options.forward {
        species_clone.enterable_reactions(is_reversible)
    } else {
        species_clone.exitable_reactions(is_reversible)
    };
    reactions
        .into_iter()
        .filter(|r| {
            options.follow_transporters
                || !network
                    .get_reaction(*r)
                    .is_some_and(|reaction| reaction.is_intercompartmental(network))
        })
        .map(NodeRef::Reaction)
        .collect()
}

fn reaction_successors(
    network: &ReactionNetwork,
    reaction: ReactionId,
    leading: Option<CloneId>,
    options: &SearchOptions,
) -> Vec<NodeRef> {
    let Some(reaction) = network.get_reaction(reaction) else {
        return Vec::new();
    };
    reaction
        .opposed_clones(network, leading, options.forward)
        .into_iter()
        .map(NodeRef::Clone)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkRecords, ReactionRecord, SpeciesRecord};

    fn species(ids: &[&str]) -> Vec<SpeciesRecord> {
        ids.iter().map(|id| SpeciesRecord::new(id, id, "cell")).collect()
    }

    fn three_cycle() -> ReactionNetwork {
        ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C"]),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]),
                ReactionRecord::new("R2", &["B"], &["C"]),
                ReactionRecord::new("R3", &["C"], &["A"]),
            ],
        })
        .unwrap()
    }

    fn clone_of(net: &ReactionNetwork, id: &str) -> NodeRef {
        NodeRef::Clone(net.clones_of_id(id)[0])
    }

    fn reaction_of(net: &ReactionNetwork, id: &str) -> NodeRef {
        NodeRef::Reaction(net.reaction_by_id(id).unwrap())
    }

    #[test]
    fn test_three_cycle_is_one_cycle_branch() {
        let net = three_cycle();
        let a = clone_of(&net, "A");

        let branches = find_branches(&net, a, &SearchOptions::default());

        assert_eq!(branches.len(), 1);
        let expected: Vec<NodeRef> = vec![
            a,
            reaction_of(&net, "R1"),
            clone_of(&net, "B"),
            reaction_of(&net, "R2"),
            clone_of(&net, "C"),
            reaction_of(&net, "R3"),
        ];
        assert_eq!(branches[0].nodes.iter().copied().collect::<Vec<_>>(), expected);
        assert!(branches[0].cycle);
        assert_eq!(branches[0].closes_at, Some(a));
        assert_eq!(branches[0].parent, None);
    }

    #[test]
    fn test_backward_walks_against_reactions() {
        let net = three_cycle();
        let a = clone_of(&net, "A");
        let options = SearchOptions {
            forward: false,
            ..SearchOptions::default()
        };

        let branches = find_branches(&net, a, &options);

        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].successor(a), Some(reaction_of(&net, "R3")));
        assert_eq!(branches[0].tail(), Some(reaction_of(&net, "R1")));
        assert_eq!(branches[0].closes_at, Some(a));
    }

    #[test]
    fn test_fork_yields_side_branch_with_parent() {
        // A -> R1 -> B; B -> R2 -> C -> R4 -> E; B -> R3 -> D
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C", "D", "E"]),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]),
                ReactionRecord::new("R2", &["B"], &["C"]),
                ReactionRecord::new("R3", &["B"], &["D"]),
                ReactionRecord::new("R4", &["C"], &["E"]),
            ],
        })
        .unwrap();
        let a = clone_of(&net, "A");
        let b = clone_of(&net, "B");

        let branches = find_branches(&net, a, &SearchOptions::default());

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].head(), Some(a));
        assert_eq!(branches[0].len(), 7);
        assert!(!branches[0].cycle);
        assert_eq!(branches[1].head(), Some(reaction_of(&net, "R3")));
        assert_eq!(branches[1].len(), 2);
        assert_eq!(branches[1].parent, Some(b));
    }

    #[test]
    fn test_extended_drops_single_node_branches() {
        // R1 has two dead-end products; C is left as a lone side branch.
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C"]),
            reactions: vec![ReactionRecord::new("R1", &["A"], &["B", "C"])],
        })
        .unwrap();
        let a = clone_of(&net, "A");

        let extended = find_branches(&net, a, &SearchOptions::default());
        let all = find_branches(
            &net,
            a,
            &SearchOptions {
                extended: false,
                ..SearchOptions::default()
            },
        );

        assert_eq!(all.len(), 2);
        assert_eq!(all[1].len(), 1);
        assert_eq!(extended.len(), 1);
        assert_eq!(extended[0].len(), 3);
    }

    #[test]
    fn test_extended_keeps_one_reaction_cycle() {
        // A -> R1 -> B; B -> R2 -> A; B -> R3 -> C -> R4 -> D
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C", "D"]),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]),
                ReactionRecord::new("R2", &["B"], &["A"]),
                ReactionRecord::new("R3", &["B"], &["C"]),
                ReactionRecord::new("R4", &["C"], &["D"]),
            ],
        })
        .unwrap();
        let a = clone_of(&net, "A");

        let branches = find_branches(&net, a, &SearchOptions::default());

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].len(), 7);
        assert!(!branches[0].cycle);
        let cycle = &branches[1];
        assert!(cycle.cycle);
        assert_eq!(cycle.nodes.iter().copied().collect::<Vec<_>>(), vec![reaction_of(&net, "R2")]);
        assert_eq!(cycle.closes_at, Some(a));
        assert_eq!(cycle.parent, Some(clone_of(&net, "B")));
        assert_eq!(cycle.extent(), 2);
    }

    #[test]
    fn test_extended_drops_bare_cycle_markers() {
        // A -> R1 -> B; A -> R2 -> B + C. R2 meets the already seen B and
        // leaves a marker with no nodes of its own.
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C"]),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]),
                ReactionRecord::new("R2", &["A"], &["B", "C"]),
            ],
        })
        .unwrap();
        let a = clone_of(&net, "A");
        let b = clone_of(&net, "B");

        let all = find_branches(
            &net,
            a,
            &SearchOptions {
                extended: false,
                ..SearchOptions::default()
            },
        );
        assert_eq!(all.len(), 3);
        let marker = &all[2];
        assert!(marker.is_empty());
        assert_eq!(marker.closes_at, Some(b));
        assert_eq!(marker.parent, Some(reaction_of(&net, "R2")));

        let extended = find_branches(&net, a, &SearchOptions::default());
        assert_eq!(extended.len(), 2);
        assert!(extended.iter().all(|branch| !branch.is_empty()));
        assert_eq!(extended[1].head(), Some(reaction_of(&net, "R2")));
        assert_eq!(extended[1].parent, Some(a));
    }

    #[test]
    fn test_isolated_endpoint_yields_nothing_when_extended() {
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A"]),
            reactions: Vec::new(),
        })
        .unwrap();
        let a = clone_of(&net, "A");

        assert!(find_branches(&net, a, &SearchOptions::default()).is_empty());
        let unfiltered = find_branches(
            &net,
            a,
            &SearchOptions {
                extended: false,
                ..SearchOptions::default()
            },
        );
        assert_eq!(unfiltered, vec![Branch::starting_at(a)]);
    }

    #[test]
    fn test_reversible_reaction_is_enterable_from_product() {
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B"]),
            reactions: vec![ReactionRecord::new("R1", &["A"], &["B"]).reversible(true)],
        })
        .unwrap();
        let b = clone_of(&net, "B");

        let branches = find_branches(&net, b, &SearchOptions::default());

        assert_eq!(branches.len(), 1);
        assert_eq!(
            branches[0].nodes.iter().copied().collect::<Vec<_>>(),
            vec![b, reaction_of(&net, "R1"), clone_of(&net, "A")]
        );
    }

    #[test]
    fn test_transporters_need_opt_in() {
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: vec![
                SpeciesRecord::new("out", "glucose", "outside"),
                SpeciesRecord::new("in", "glucose", "inside"),
            ],
            reactions: vec![ReactionRecord::new("T", &["out"], &["in"])],
        })
        .unwrap();
        let out = clone_of(&net, "out");

        assert!(find_branches(&net, out, &SearchOptions::default()).is_empty());
        let followed = find_branches(
            &net,
            out,
            &SearchOptions {
                follow_transporters: true,
                ..SearchOptions::default()
            },
        );
        assert_eq!(followed.len(), 1);
        assert_eq!(followed[0].len(), 3);
    }

    #[test]
    fn test_no_immediate_backtrack() {
        // Reversible chain: without the `last` guard every step would turn
        // straight back.
        let net = ReactionNetwork::from_records(NetworkRecords {
            species: species(&["A", "B", "C"]),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]).reversible(true),
                ReactionRecord::new("R2", &["B"], &["C"]).reversible(true),
            ],
        })
        .unwrap();
        let b = clone_of(&net, "B");

        let branches = find_branches(
            &net,
            b,
            &SearchOptions {
                extended: false,
                ..SearchOptions::default()
            },
        );

        for branch in &branches {
            assert!(!branch.cycle);
            let nodes: Vec<NodeRef> = branch.nodes.iter().copied().collect();
            for window in nodes.windows(3) {
                assert_ne!(window[0], window[2]);
            }
        }
        let total: usize = branches.iter().map(Branch::len).sum();
        assert_eq!(total, 5);
    }
}
