//! Species and their clones.
//!
//! A species records every reaction it takes part in, by role. The graph
//! nodes the traversal actually walks are its clones: each clone carries a
//! subset of those roles, and together the clones of a species cover all of
//! them. Which subset each clone gets is decided by the cloning strategy.

use crate::node::{CloneId, ReactionId, SpeciesId};

/// How a species' reaction roles are spread across its clones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloningStrategy {
    /// One clone holding every role.
    Trivial,
    /// One clone per individual role occurrence.
    Discrete,
}

#[derive(Clone, Debug)]
pub struct Species {
    handle: SpeciesId,
    id: String,
    name: String,
    compartment: String,
    reactions_entered: Vec<ReactionId>,
    reactions_exited: Vec<ReactionId>,
    reactions_modified: Vec<ReactionId>,
    clones: Vec<CloneId>,
    next_clone_num: u32,
    cloning: Option<CloningStrategy>,
}

impl Species {
    pub fn new(handle: SpeciesId, id: &str, name: &str, compartment: &str) -> Self {
        Self {
            handle,
            id: id.to_string(),
            name: name.to_string(),
            compartment: compartment.to_string(),
            reactions_entered: Vec::new(),
            reactions_exited: Vec::new(),
            reactions_modified: Vec::new(),
            clones: Vec::new(),
            next_clone_num: 0,
            cloning: None,
        }
    }

    pub fn handle(&self) -> SpeciesId {
        self.handle
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compartment_name(&self) -> &str {
        &self.compartment
    }

    pub fn reactions_entered(&self) -> &[ReactionId] {
        &self.reactions_entered
    }

    pub fn reactions_exited(&self) -> &[ReactionId] {
        &self.reactions_exited
    }

    pub fn reactions_modified(&self) -> &[ReactionId] {
        &self.reactions_modified
    }

    /// Live clones, in creation order.
    pub fn clones(&self) -> &[CloneId] {
        &self.clones
    }

    /// The strategy last applied, if any.
    pub fn cloning(&self) -> Option<CloningStrategy> {
        self.cloning
    }

    pub(crate) fn add_reaction_entered(&mut self, reaction: ReactionId) {
        self.reactions_entered.push(reaction);
    }

    pub(crate) fn add_reaction_exited(&mut self, reaction: ReactionId) {
        self.reactions_exited.push(reaction);
    }

    pub(crate) fn add_reaction_modified(&mut self, reaction: ReactionId) {
        self.reactions_modified.push(reaction);
    }

    /// Replace all clones with a single clone carrying every role.
    pub fn set_trivial_cloning(&mut self, arena: &mut CloneArena) {
        self.delete_clones(arena);
        let mut clone = self.next_clone();
        clone.reactions_entered = self.reactions_entered.clone();
        clone.reactions_exited = self.reactions_exited.clone();
        clone.reactions_modified = self.reactions_modified.clone();
        self.clones.push(arena.alloc(clone));
        self.cloning = Some(CloningStrategy::Trivial);
        self.set_clone_markers(arena);
    }

    /// Replace all clones with one clone per role occurrence: entered
    /// reactions first, then exited, then modified.
    pub fn set_discrete_cloning(&mut self, arena: &mut CloneArena) {
        self.delete_clones(arena);
        let entered = self.reactions_entered.clone();
        let exited = self.reactions_exited.clone();
        let modified = self.reactions_modified.clone();
        for reaction in entered {
            let mut clone = self.next_clone();
            clone.reactions_entered.push(reaction);
            self.clones.push(arena.alloc(clone));
        }
        for reaction in exited {
            let mut clone = self.next_clone();
            clone.reactions_exited.push(reaction);
            self.clones.push(arena.alloc(clone));
        }
        for reaction in modified {
            let mut clone = self.next_clone();
            clone.reactions_modified.push(reaction);
            self.clones.push(arena.alloc(clone));
        }
        self.cloning = Some(CloningStrategy::Discrete);
        self.set_clone_markers(arena);
    }

    pub fn apply_cloning(&mut self, strategy: CloningStrategy, arena: &mut CloneArena) {
        match strategy {
            CloningStrategy::Trivial => self.set_trivial_cloning(arena),
            CloningStrategy::Discrete => self.set_discrete_cloning(arena),
        }
    }

    fn delete_clones(&mut self, arena: &mut CloneArena) {
        for id in self.clones.drain(..) {
            arena.retire(id);
        }
        self.next_clone_num = 0;
    }

    fn next_clone(&mut self) -> SpeciesClone {
        let clone = SpeciesClone::new(self.handle, self.next_clone_num);
        self.next_clone_num += 1;
        clone
    }

    // Every copy of a species with more than one clone is marked.
    fn set_clone_markers(&self, arena: &mut CloneArena) {
        let is_cloned = self.clones.len() > 1;
        for id in &self.clones {
            if let Some(clone) = arena.get_mut(*id) {
                clone.is_cloned = is_cloned;
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesClone {
    species: SpeciesId,
    num: u32,
    reactions_entered: Vec<ReactionId>,
    reactions_exited: Vec<ReactionId>,
    reactions_modified: Vec<ReactionId>,
    is_cloned: bool,
}

impl SpeciesClone {
    fn new(species: SpeciesId, num: u32) -> Self {
        Self {
            species,
            num,
            reactions_entered: Vec::new(),
            reactions_exited: Vec::new(),
            reactions_modified: Vec::new(),
            is_cloned: false,
        }
    }

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    /// Per-species clone number.
    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn reactions_entered(&self) -> &[ReactionId] {
        &self.reactions_entered
    }

    pub fn reactions_exited(&self) -> &[ReactionId] {
        &self.reactions_exited
    }

    pub fn reactions_modified(&self) -> &[ReactionId] {
        &self.reactions_modified
    }

    pub fn is_cloned(&self) -> bool {
        self.is_cloned
    }

    pub fn role_count(&self) -> usize {
        self.reactions_entered.len() + self.reactions_exited.len() + self.reactions_modified.len()
    }

    /// True if this clone is a reactant of `reaction`.
    pub fn enters(&self, reaction: ReactionId) -> bool {
        self.reactions_entered.contains(&reaction)
    }

    /// True if this clone is a product of `reaction`.
    pub fn exits(&self, reaction: ReactionId) -> bool {
        self.reactions_exited.contains(&reaction)
    }

    pub fn modifies(&self, reaction: ReactionId) -> bool {
        self.reactions_modified.contains(&reaction)
    }

    /// Reactions this clone can flow into: those it enters, plus reversible
    /// ones it exits.
    pub fn enterable_reactions<F>(&self, is_reversible: F) -> Vec<ReactionId>
    where
        F: Fn(ReactionId) -> bool,
    {
        let reversed = self.reactions_exited.iter().copied().filter(|r| is_reversible(*r));
        unique(self.reactions_entered.iter().copied().chain(reversed))
    }

    /// Reactions this clone can be reached from: those it exits, plus
    /// reversible ones it enters.
    pub fn exitable_reactions<F>(&self, is_reversible: F) -> Vec<ReactionId>
    where
        F: Fn(ReactionId) -> bool,
    {
        let reversed = self.reactions_entered.iter().copied().filter(|r| is_reversible(*r));
        unique(self.reactions_exited.iter().copied().chain(reversed))
    }
}

fn unique(items: impl Iterator<Item = ReactionId>) -> Vec<ReactionId> {
    let mut out: Vec<ReactionId> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Owning store for every clone in a network.
///
/// Retired slots stay empty forever so a [`CloneId`] always means the same
/// clone or nothing.
#[derive(Clone, Debug, Default)]
pub struct CloneArena {
    slots: Vec<Option<SpeciesClone>>,
}

impl CloneArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, clone: SpeciesClone) -> CloneId {
        self.slots.push(Some(clone));
        CloneId(self.slots.len() - 1)
    }

    fn retire(&mut self, id: CloneId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn get(&self, id: CloneId) -> Option<&SpeciesClone> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, id: CloneId) -> Option<&mut SpeciesClone> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn is_live(&self, id: CloneId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CloneId, &SpeciesClone)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|clone| (CloneId(i), clone)))
    }

    pub fn live_count(&self) -> usize {
        self.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species_with_roles() -> Species {
        let mut species = Species::new(SpeciesId(0), "s1", "glucose", "cytosol");
        species.add_reaction_entered(ReactionId(0));
        species.add_reaction_entered(ReactionId(1));
        species.add_reaction_exited(ReactionId(2));
        species.add_reaction_modified(ReactionId(3));
        species
    }

    #[test]
    fn test_discrete_cloning_partitions_roles() {
        let mut arena = CloneArena::new();
        let mut species = species_with_roles();
        species.set_discrete_cloning(&mut arena);

        assert_eq!(species.clones().len(), 4);
        for id in species.clones() {
            let clone = arena.get(*id).unwrap();
            assert_eq!(clone.role_count(), 1);
            assert!(clone.is_cloned());
        }
        let first = arena.get(species.clones()[0]).unwrap();
        assert_eq!(first.reactions_entered(), &[ReactionId(0)]);
        let last = arena.get(species.clones()[3]).unwrap();
        assert_eq!(last.reactions_modified(), &[ReactionId(3)]);
        assert_eq!(species.cloning(), Some(CloningStrategy::Discrete));
    }

    #[test]
    fn test_trivial_cloning_holds_every_role() {
        let mut arena = CloneArena::new();
        let mut species = species_with_roles();
        species.set_trivial_cloning(&mut arena);

        assert_eq!(species.clones().len(), 1);
        let clone = arena.get(species.clones()[0]).unwrap();
        assert_eq!(clone.role_count(), 4);
        assert!(!clone.is_cloned());
        assert!(clone.enters(ReactionId(1)));
        assert!(clone.exits(ReactionId(2)));
        assert!(clone.modifies(ReactionId(3)));
    }

    #[test]
    fn test_recloning_retires_old_handles() {
        let mut arena = CloneArena::new();
        let mut species = species_with_roles();
        species.set_discrete_cloning(&mut arena);
        let old: Vec<CloneId> = species.clones().to_vec();

        species.set_trivial_cloning(&mut arena);

        for id in old {
            assert!(!arena.is_live(id));
        }
        assert_eq!(arena.live_count(), 1);
        let clone = arena.get(species.clones()[0]).unwrap();
        assert_eq!(clone.num(), 0);
        assert!(species.clones()[0].0 >= 4);
    }

    #[test]
    fn test_clone_numbers_are_sequential() {
        let mut arena = CloneArena::new();
        let mut species = species_with_roles();
        species.set_discrete_cloning(&mut arena);

        let nums: Vec<u32> = species
            .clones()
            .iter()
            .map(|id| arena.get(*id).unwrap().num())
            .collect();
        assert_eq!(nums, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_enterable_includes_reversible_exits() {
        let mut arena = CloneArena::new();
        let mut species = species_with_roles();
        species.set_trivial_cloning(&mut arena);
        let clone = arena.get(species.clones()[0]).unwrap();

        let irreversible = clone.enterable_reactions(|_| false);
        assert_eq!(irreversible, vec![ReactionId(0), ReactionId(1)]);

        let reversible = clone.enterable_reactions(|r| r == ReactionId(2));
        assert_eq!(reversible, vec![ReactionId(0), ReactionId(1), ReactionId(2)]);

        let exitable = clone.exitable_reactions(|r| r == ReactionId(1));
        assert_eq!(exitable, vec![ReactionId(2), ReactionId(1)]);
    }
}
