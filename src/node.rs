use serde::Serialize;

/// Handle of a species in a [`crate::ReactionNetwork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpeciesId(pub usize);

/// Handle of a clone in the network's clone arena.
///
/// Handles are never reused: re-cloning a species retires its old clones
/// and allocates fresh slots, so a stale handle resolves to nothing instead
/// of to some other clone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CloneId(pub usize);

/// Handle of a reaction in a [`crate::ReactionNetwork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReactionId(pub usize);

/// A traversable graph node: either a species clone or a reaction.
///
/// The species/reaction graph is bipartite, so every branch alternates
/// between the two variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum NodeRef {
    Clone(CloneId),
    Reaction(ReactionId),
}

impl NodeRef {
    pub fn as_clone(self) -> Option<CloneId> {
        match self {
            NodeRef::Clone(id) => Some(id),
            NodeRef::Reaction(_) => None,
        }
    }

    pub fn as_reaction(self) -> Option<ReactionId> {
        match self {
            NodeRef::Reaction(id) => Some(id),
            NodeRef::Clone(_) => None,
        }
    }

    pub fn is_clone(self) -> bool {
        matches!(self, NodeRef::Clone(_))
    }
}

impl From<CloneId> for NodeRef {
    fn from(id: CloneId) -> Self {
        NodeRef::Clone(id)
    }
}

impl From<ReactionId> for NodeRef {
    fn from(id: ReactionId) -> Self {
        NodeRef::Reaction(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_accessors() {
        let clone = NodeRef::from(CloneId(3));
        let reaction = NodeRef::from(ReactionId(3));

        assert_eq!(clone.as_clone(), Some(CloneId(3)));
        assert_eq!(clone.as_reaction(), None);
        assert_eq!(reaction.as_reaction(), Some(ReactionId(3)));
        assert!(clone.is_clone());
        assert!(!reaction.is_clone());
        assert_ne!(clone, reaction);
    }
}
