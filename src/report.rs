//! Label-based summary of an assembled pathway, for renderers and humans.

use serde::Serialize;

use crate::branch::Branch;
use crate::network::ReactionNetwork;
use crate::node::NodeRef;
use crate::pathway::{Fork, Pathway};
use crate::traversal::SearchOptions;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathwayReport {
    pub endpoint: String,
    pub direction: &'static str,
    pub branches: Vec<BranchReport>,
    pub forks: Vec<ForkReport>,
    pub skipped: Vec<SkippedReport>,
    pub loose_clones: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BranchReport {
    pub nodes: Vec<String>,
    pub cycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForkReport {
    pub clone: String,
    pub upstream: Vec<String>,
    pub downstream: Vec<String>,
    pub main_input: Option<String>,
    pub main_output: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedReport {
    pub branch: BranchReport,
    pub reason: String,
}

impl PathwayReport {
    pub fn new(network: &ReactionNetwork, pathway: &Pathway, options: &SearchOptions) -> Self {
        let label = |node: NodeRef| network.node_label(node);
        Self {
            endpoint: label(pathway.head()),
            direction: if options.forward { "forward" } else { "backward" },
            branches: pathway
                .branches()
                .iter()
                .map(|b| BranchReport::new(network, b))
                .collect(),
            forks: pathway
                .forks()
                .iter()
                .map(|f| ForkReport::new(network, f))
                .collect(),
            skipped: pathway
                .skipped()
                .iter()
                .map(|s| SkippedReport {
                    branch: BranchReport::new(network, &s.branch),
                    reason: s.issue.to_string(),
                })
                .collect(),
            loose_clones: network
                .loose_clones(pathway)
                .into_iter()
                .map(|id| label(id.into()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl BranchReport {
    pub fn new(network: &ReactionNetwork, branch: &Branch) -> Self {
        Self {
            nodes: branch.nodes.iter().map(|n| network.node_label(*n)).collect(),
            cycle: branch.cycle,
            closes_at: branch.closes_at.map(|n| network.node_label(n)),
            parent: branch.parent.map(|n| network.node_label(n)),
        }
    }
}

impl ForkReport {
    pub fn new(network: &ReactionNetwork, fork: &Fork) -> Self {
        let reaction = |id| network.node_label(NodeRef::Reaction(id));
        Self {
            clone: network.node_label(fork.centre().into()),
            upstream: fork.upstream().iter().copied().map(reaction).collect(),
            downstream: fork.downstream().iter().copied().map(reaction).collect(),
            main_input: fork.main_input().map(reaction),
            main_output: fork.main_output().map(reaction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blacklist::Blacklist;
    use crate::network::{NetworkRecords, ReactionRecord, SpeciesRecord};

    #[test]
    fn test_report_labels() {
        let mut net = ReactionNetwork::from_records(NetworkRecords {
            species: ["A", "B", "C", "D", "Z"]
                .iter()
                .map(|id| SpeciesRecord::new(id, id, "cell"))
                .collect(),
            reactions: vec![
                ReactionRecord::new("R1", &["A"], &["B"]),
                ReactionRecord::new("R2", &["B"], &["C"]),
                ReactionRecord::new("R3", &["B"], &["D"]),
                ReactionRecord::new("R4", &["C"], &["A"]),
            ],
        })
        .unwrap();
        let endpoint = net.clones_of_id("A")[0];
        let options = SearchOptions::default();
        let pathway = net
            .find_pathway(endpoint, &Blacklist::default(), &options)
            .unwrap()
            .unwrap();

        let report = PathwayReport::new(&net, &pathway, &options);

        assert_eq!(report.endpoint, "A-0");
        assert_eq!(report.direction, "forward");
        // The linear run through R3 outranks the longer cycle through R2.
        assert_eq!(report.branches[0].nodes, vec!["A-0", "R1", "B-0", "R3", "D-0"]);
        assert!(!report.branches[0].cycle);
        assert_eq!(report.branches[1].nodes, vec!["R2", "C-0", "R4"]);
        assert_eq!(report.branches[1].closes_at.as_deref(), Some("A-0"));
        assert_eq!(report.branches[1].parent.as_deref(), Some("B-0"));
        assert_eq!(report.forks.len(), 1);
        assert_eq!(report.forks[0].downstream, vec!["R3", "R2"]);
        assert_eq!(report.forks[0].main_input.as_deref(), Some("R1"));
        assert_eq!(report.forks[0].main_output.as_deref(), Some("R3"));
        assert_eq!(report.loose_clones, vec!["Z-0"]);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"loose_clones\""));
    }
}
