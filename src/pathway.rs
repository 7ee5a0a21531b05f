//! Assembly of a branch set into a tree: one main branch, side branches
//! hanging off it, and forks where several branches meet at a clone.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::branch::Branch;
use crate::error::{AssemblyIssue, PathwayError};
use crate::node::{CloneId, NodeRef, ReactionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BranchId(pub usize);

/// A clone where side branches leave the branch it sits on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fork {
    centre: CloneId,
    upstream: Vec<ReactionId>,
    downstream: Vec<ReactionId>,
    main_input: Option<ReactionId>,
    main_output: Option<ReactionId>,
}

impl Fork {
    pub fn new(centre: CloneId) -> Self {
        Self {
            centre,
            upstream: Vec::new(),
            downstream: Vec::new(),
            main_input: None,
            main_output: None,
        }
    }

    pub fn centre(&self) -> CloneId {
        self.centre
    }

    pub fn upstream(&self) -> &[ReactionId] {
        &self.upstream
    }

    pub fn downstream(&self) -> &[ReactionId] {
        &self.downstream
    }

    pub fn main_input(&self) -> Option<ReactionId> {
        self.main_input
    }

    pub fn main_output(&self) -> Option<ReactionId> {
        self.main_output
    }

    pub fn add_upstream(&mut self, reaction: ReactionId) {
        if !self.upstream.contains(&reaction) {
            self.upstream.push(reaction);
        }
    }

    pub fn add_downstream(&mut self, reaction: ReactionId) {
        if !self.downstream.contains(&reaction) {
            self.downstream.push(reaction);
        }
    }

    pub fn set_main_input(&mut self, reaction: ReactionId) {
        self.main_input = Some(reaction);
    }

    pub fn set_main_output(&mut self, reaction: ReactionId) {
        self.main_output = Some(reaction);
    }
}

/// A branch left out of the pathway, and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedBranch {
    pub branch: Branch,
    pub issue: AssemblyIssue,
}

#[derive(Clone, Debug)]
pub struct Pathway {
    head: NodeRef,
    branches: Vec<Branch>,
    all_nodes: HashSet<NodeRef>,
    branch_membership: HashMap<NodeRef, BranchId>,
    forks: Vec<Fork>,
    fork_membership: HashMap<CloneId, usize>,
    output_heads: HashMap<ReactionId, Vec<CloneId>>,
    main_inputs: HashMap<ReactionId, CloneId>,
    skipped: Vec<SkippedBranch>,
}

impl Pathway {
    /// Assemble `branches` around the one branch that starts at `head`.
    ///
    /// The remaining branches are added in list order. Branches that cannot
    /// be placed are logged and kept in [`Pathway::skipped`].
    pub fn new(head: NodeRef, branches: Vec<Branch>) -> Result<Self, PathwayError> {
        let (main, others): (Vec<Branch>, Vec<Branch>) =
            branches.into_iter().partition(|b| b.head() == Some(head));
        let main = match main.len() {
            0 => return Err(PathwayError::MissingMainBranch(head)),
            1 => main.into_iter().next().ok_or(PathwayError::MissingMainBranch(head))?,
            count => return Err(PathwayError::AmbiguousMainBranch { head, count }),
        };

        let mut pathway = Pathway {
            head,
            branches: Vec::new(),
            all_nodes: HashSet::new(),
            branch_membership: HashMap::new(),
            forks: Vec::new(),
            fork_membership: HashMap::new(),
            output_heads: HashMap::new(),
            main_inputs: HashMap::new(),
            skipped: Vec::new(),
        };
        pathway.set_first_branch(main);
        for branch in others {
            if let Err(issue) = pathway.add_branch(branch.clone()) {
                tracing::warn!("skipping branch: {issue}");
                pathway.skipped.push(SkippedBranch { branch, issue });
            }
        }
        Ok(pathway)
    }

    /// Reset every membership structure and install `branch` as the main
    /// branch.
    pub fn set_first_branch(&mut self, branch: Branch) {
        self.branches.clear();
        self.all_nodes.clear();
        self.branch_membership.clear();
        self.forks.clear();
        self.fork_membership.clear();
        self.output_heads.clear();
        self.main_inputs.clear();
        self.skipped.clear();
        if let Some(head) = branch.head() {
            self.head = head;
        }
        self.register(branch);
    }

    /// Attach a side branch at its parent node.
    ///
    /// A branch hanging off a reaction is recorded as one of that
    /// reaction's output heads. A branch hanging off a clone joins the
    /// clone's fork, created on first use, and the clone becomes the main
    /// input of the branch's head reaction.
    pub fn add_branch(&mut self, branch: Branch) -> Result<BranchId, AssemblyIssue> {
        let head = branch.head().ok_or(AssemblyIssue::EmptyBranch)?;
        let parent = branch.parent.ok_or(AssemblyIssue::Orphan)?;
        if !self.all_nodes.contains(&parent) {
            return Err(AssemblyIssue::MissingParent { parent });
        }
        if let Some(node) = branch.nodes.iter().find(|n| self.all_nodes.contains(n)) {
            return Err(AssemblyIssue::NodeAlreadyAssigned { node: *node });
        }

        match (parent, head) {
            (NodeRef::Reaction(reaction), NodeRef::Clone(clone)) => {
                self.output_heads.entry(reaction).or_default().push(clone);
            }
            (NodeRef::Clone(clone), NodeRef::Reaction(reaction)) => {
                let fork = self.fork_entry(clone);
                self.forks[fork].add_downstream(reaction);
                self.main_inputs.insert(reaction, clone);
            }
            _ => return Err(AssemblyIssue::UnexpectedHead { parent, head }),
        }
        Ok(self.register(branch))
    }

    fn register(&mut self, branch: Branch) -> BranchId {
        let id = BranchId(self.branches.len());
        for node in &branch.nodes {
            self.all_nodes.insert(*node);
            self.branch_membership.insert(*node, id);
        }
        self.branches.push(branch);
        id
    }

    fn fork_entry(&mut self, clone: CloneId) -> usize {
        if let Some(index) = self.fork_membership.get(&clone) {
            return *index;
        }
        let mut fork = Fork::new(clone);
        if let Some(branch) = self.branch_of(NodeRef::Clone(clone)) {
            let node = NodeRef::Clone(clone);
            if let Some(upstream) = branch.predecessor(node).and_then(NodeRef::as_reaction) {
                fork.add_upstream(upstream);
                fork.set_main_input(upstream);
            }
            if let Some(downstream) = branch.successor(node).and_then(NodeRef::as_reaction) {
                fork.add_downstream(downstream);
                fork.set_main_output(downstream);
            }
        }
        self.forks.push(fork);
        let index = self.forks.len() - 1;
        self.fork_membership.insert(clone, index);
        index
    }

    pub fn head(&self) -> NodeRef {
        self.head
    }

    pub fn main_branch(&self) -> &Branch {
        &self.branches[0]
    }

    /// Placed branches; the main branch comes first.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id.0)
    }

    pub fn branch_id_of(&self, node: NodeRef) -> Option<BranchId> {
        self.branch_membership.get(&node).copied()
    }

    pub fn branch_of(&self, node: NodeRef) -> Option<&Branch> {
        self.branch_id_of(node).and_then(|id| self.branch(id))
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.all_nodes.contains(&node)
    }

    pub fn forks(&self) -> &[Fork] {
        &self.forks
    }

    pub fn fork_of(&self, clone: CloneId) -> Option<&Fork> {
        self.fork_membership.get(&clone).map(|i| &self.forks[*i])
    }

    /// Heads of side branches leaving `reaction` on its product side.
    pub fn output_heads(&self, reaction: ReactionId) -> &[CloneId] {
        self.output_heads
            .get(&reaction)
            .map(|heads| heads.as_slice())
            .unwrap_or(&[])
    }

    /// The fork clone feeding `reaction`, if it heads a side branch.
    pub fn main_input(&self, reaction: ReactionId) -> Option<CloneId> {
        self.main_inputs.get(&reaction).copied()
    }

    pub fn skipped(&self) -> &[SkippedBranch] {
        &self.skipped
    }

    /// Number of placed branches attached at each parent node.
    pub fn branch_points(&self) -> BTreeMap<NodeRef, usize> {
        let mut counts = BTreeMap::new();
        for branch in self.branches.iter().skip(1) {
            if let Some(parent) = branch.parent {
                *counts.entry(parent).or_insert(0) += 1;
            }
        }
        counts
    }
}
