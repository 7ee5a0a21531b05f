use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::node::{CloneId, NodeRef};

/// Errors that abort network construction or pathway assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathwayError {
    DuplicateSpecies(String),
    DuplicateReaction(String),
    /// A reaction names a species that was never declared.
    UnknownSpecies { reaction: String, species: String },
    /// The clone handle is retired or was never allocated.
    UnknownClone(CloneId),
    /// No branch starts at the pathway's head node.
    MissingMainBranch(NodeRef),
    AmbiguousMainBranch { head: NodeRef, count: usize },
}

impl Error for PathwayError {}

impl fmt::Display for PathwayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathwayError::DuplicateSpecies(id) => write!(f, "species '{id}' declared twice"),
            PathwayError::DuplicateReaction(id) => write!(f, "reaction '{id}' declared twice"),
            PathwayError::UnknownSpecies { reaction, species } => write!(
                f,
                "reaction '{reaction}' refers to undeclared species '{species}'"
            ),
            PathwayError::UnknownClone(id) => write!(f, "clone {} does not exist", id.0),
            PathwayError::MissingMainBranch(head) => {
                write!(f, "malformed branch set: no branch starts at {head:?}")
            }
            PathwayError::AmbiguousMainBranch { head, count } => write!(
                f,
                "malformed branch set: {count} branches start at {head:?}"
            ),
        }
    }
}

/// Why a branch was left out of a pathway. Assembly carries on without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum AssemblyIssue {
    /// The branch's parent is not placed in the pathway.
    MissingParent { parent: NodeRef },
    /// The branch has no parent at all.
    Orphan,
    /// A cycle marker with no nodes of its own.
    EmptyBranch,
    /// The head is not of the kind that can hang off the parent.
    UnexpectedHead { parent: NodeRef, head: NodeRef },
    /// A node of the branch already belongs to another branch.
    NodeAlreadyAssigned { node: NodeRef },
}

impl Error for AssemblyIssue {}

impl fmt::Display for AssemblyIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssemblyIssue::MissingParent { parent } => {
                write!(f, "parent {parent:?} is not in the pathway")
            }
            AssemblyIssue::Orphan => write!(f, "branch has no parent"),
            AssemblyIssue::EmptyBranch => write!(f, "branch has no nodes"),
            AssemblyIssue::UnexpectedHead { parent, head } => {
                write!(f, "head {head:?} cannot attach to {parent:?}")
            }
            AssemblyIssue::NodeAlreadyAssigned { node } => {
                write!(f, "node {node:?} already belongs to another branch")
            }
        }
    }
}
