//! The reaction network: owning arena for species, clones and reactions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::blacklist::Blacklist;
use crate::branch::Branch;
use crate::error::PathwayError;
use crate::node::{CloneId, NodeRef, ReactionId, SpeciesId};
use crate::pathway::Pathway;
use crate::reaction::Reaction;
use crate::species::{CloneArena, CloningStrategy, Species, SpeciesClone};
use crate::traversal::{self, SearchOptions};

/// Loader output: flat species and reaction records, cross-referenced by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecords {
    #[serde(default)]
    pub species: Vec<SpeciesRecord>,
    #[serde(default)]
    pub reactions: Vec<ReactionRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: String,
    /// Falls back to `id` when empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub compartment: String,
}

impl SpeciesRecord {
    pub fn new(id: &str, name: &str, compartment: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            compartment: compartment.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// When empty, the compartment of the first participant is used.
    #[serde(default)]
    pub compartment: String,
    /// Absent means reversible, as in SBML.
    #[serde(default = "reversible_by_default")]
    pub reversible: bool,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

fn reversible_by_default() -> bool {
    true
}

impl ReactionRecord {
    /// An irreversible reaction; use [`ReactionRecord::reversible`] to
    /// change that.
    pub fn new(id: &str, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            compartment: String::new(),
            reversible: false,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[&str]) -> Self {
        self.modifiers = modifiers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn in_compartment(mut self, compartment: &str) -> Self {
        self.compartment = compartment.to_string();
        self
    }
}

/// Species and reactions sharing a compartment name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compartment {
    name: String,
    species: Vec<SpeciesId>,
    reactions: Vec<ReactionId>,
}

impl Compartment {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            species: Vec::new(),
            reactions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &[SpeciesId] {
        &self.species
    }

    pub fn reactions(&self) -> &[ReactionId] {
        &self.reactions
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReactionNetwork {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    clones: CloneArena,
    compartments: Vec<Compartment>,
    species_index: HashMap<String, SpeciesId>,
    reaction_index: HashMap<String, ReactionId>,
}

impl ReactionNetwork {
    /// Build and doubly link the network, then give every species trivial
    /// cloning.
    pub fn from_records(records: NetworkRecords) -> Result<Self, PathwayError> {
        let mut network = ReactionNetwork::default();

        for record in &records.species {
            if network.species_index.contains_key(&record.id) {
                return Err(PathwayError::DuplicateSpecies(record.id.clone()));
            }
            let handle = SpeciesId(network.species.len());
            let name = if record.name.is_empty() { &record.id } else { &record.name };
            network
                .species
                .push(Species::new(handle, &record.id, name, &record.compartment));
            network.species_index.insert(record.id.clone(), handle);
            network.compartment_entry(&record.compartment).species.push(handle);
        }

        for record in &records.reactions {
            if network.reaction_index.contains_key(&record.id) {
                return Err(PathwayError::DuplicateReaction(record.id.clone()));
            }
            let handle = ReactionId(network.reactions.len());
            let name = if record.name.is_empty() { &record.id } else { &record.name };
            let mut reaction =
                Reaction::new(handle, &record.id, name, &record.compartment, record.reversible);

            for species_id in &record.inputs {
                let species = network.resolve_participant(&record.id, species_id)?;
                reaction.add_input(species);
                network.species[species.0].add_reaction_entered(handle);
            }
            for species_id in &record.outputs {
                let species = network.resolve_participant(&record.id, species_id)?;
                reaction.add_output(species);
                network.species[species.0].add_reaction_exited(handle);
            }
            for species_id in &record.modifiers {
                let species = network.resolve_participant(&record.id, species_id)?;
                reaction.add_modifier(species);
                network.species[species.0].add_reaction_modified(handle);
            }

            if reaction.compartment_name().is_empty() {
                let inherited = reaction
                    .participants()
                    .next()
                    .map(|id| network.species[id.0].compartment_name().to_string());
                if let Some(compartment) = inherited {
                    reaction.set_compartment_name(&compartment);
                }
            }
            network
                .compartment_entry(reaction.compartment_name())
                .reactions
                .push(handle);
            network.reaction_index.insert(record.id.clone(), handle);
            network.reactions.push(reaction);
        }

        network.set_trivial_cloning_all();
        tracing::debug!(
            species = network.species.len(),
            reactions = network.reactions.len(),
            compartments = network.compartments.len(),
            "reaction network linked"
        );
        Ok(network)
    }

    fn resolve_participant(&self, reaction: &str, species: &str) -> Result<SpeciesId, PathwayError> {
        self.species_index
            .get(species)
            .copied()
            .ok_or_else(|| PathwayError::UnknownSpecies {
                reaction: reaction.to_string(),
                species: species.to_string(),
            })
    }

    fn compartment_entry(&mut self, name: &str) -> &mut Compartment {
        let index = match self.compartments.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.compartments.push(Compartment::new(name));
                self.compartments.len() - 1
            }
        };
        &mut self.compartments[index]
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    pub fn compartment(&self, name: &str) -> Option<&Compartment> {
        self.compartments.iter().find(|c| c.name == name)
    }

    pub fn clones(&self) -> &CloneArena {
        &self.clones
    }

    pub fn get_species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(id.0)
    }

    pub fn get_reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(id.0)
    }

    /// `None` for retired or unknown handles.
    pub fn get_clone(&self, id: CloneId) -> Option<&SpeciesClone> {
        self.clones.get(id)
    }

    pub fn species_by_id(&self, id: &str) -> Option<SpeciesId> {
        self.species_index.get(id).copied()
    }

    pub fn reaction_by_id(&self, id: &str) -> Option<ReactionId> {
        self.reaction_index.get(id).copied()
    }

    /// All species carrying `name`; names need not be unique across
    /// compartments.
    pub fn species_named(&self, name: &str) -> Vec<SpeciesId> {
        self.species
            .iter()
            .filter(|s| s.name() == name)
            .map(|s| s.handle())
            .collect()
    }

    /// Live clones of the species with model id `id`.
    pub fn clones_of_id(&self, id: &str) -> &[CloneId] {
        self.species_by_id(id)
            .and_then(|handle| self.get_species(handle))
            .map(|species| species.clones())
            .unwrap_or(&[])
    }

    pub fn is_reversible(&self, id: ReactionId) -> bool {
        self.get_reaction(id).is_some_and(|r| r.is_reversible())
    }

    pub fn set_trivial_cloning(&mut self, id: SpeciesId) {
        self.apply_cloning(id, CloningStrategy::Trivial);
    }

    pub fn set_discrete_cloning(&mut self, id: SpeciesId) {
        self.apply_cloning(id, CloningStrategy::Discrete);
    }

    pub fn apply_cloning(&mut self, id: SpeciesId, strategy: CloningStrategy) {
        if let Some(species) = self.species.get_mut(id.0) {
            species.apply_cloning(strategy, &mut self.clones);
        }
    }

    pub fn set_trivial_cloning_all(&mut self) {
        for species in &mut self.species {
            species.set_trivial_cloning(&mut self.clones);
        }
    }

    /// Force discrete cloning on every blacklisted species except the one
    /// the endpoint belongs to, which keeps its current cloning. Returns the
    /// species that were re-cloned.
    pub fn apply_blacklist(
        &mut self,
        blacklist: &Blacklist,
        endpoint: CloneId,
    ) -> Result<Vec<SpeciesId>, PathwayError> {
        let endpoint_name = self.endpoint_species(endpoint)?.name().to_string();
        let mut recloned = Vec::new();
        for species in &mut self.species {
            if blacklist.contains(species.name()) && species.name() != endpoint_name {
                species.set_discrete_cloning(&mut self.clones);
                recloned.push(species.handle());
            }
        }
        tracing::info!(
            blacklisted = recloned.len(),
            "applied discrete cloning to blacklisted species"
        );
        Ok(recloned)
    }

    fn endpoint_species(&self, endpoint: CloneId) -> Result<&Species, PathwayError> {
        self.get_clone(endpoint)
            .and_then(|clone| self.get_species(clone.species()))
            .ok_or(PathwayError::UnknownClone(endpoint))
    }

    /// Apply the blacklist, then search for branches from `endpoint`.
    pub fn find_branches(
        &mut self,
        endpoint: CloneId,
        blacklist: &Blacklist,
        options: &SearchOptions,
    ) -> Result<Vec<Branch>, PathwayError> {
        self.apply_blacklist(blacklist, endpoint)?;
        let branches = traversal::find_branches(self, NodeRef::Clone(endpoint), options);
        for branch in &branches {
            tracing::debug!("{}", branch.describe(self));
        }
        Ok(branches)
    }

    /// Search from `endpoint` and assemble the result. `Ok(None)` means the
    /// search produced nothing worth a pathway.
    pub fn find_pathway(
        &mut self,
        endpoint: CloneId,
        blacklist: &Blacklist,
        options: &SearchOptions,
    ) -> Result<Option<Pathway>, PathwayError> {
        let branches = self.find_branches(endpoint, blacklist, options)?;
        if branches.is_empty() {
            tracing::info!(endpoint = %self.node_label(endpoint.into()), "no branches found");
            return Ok(None);
        }
        let pathway = Pathway::new(NodeRef::Clone(endpoint), branches)?;
        tracing::info!(
            branches = pathway.branches().len(),
            forks = pathway.forks().len(),
            skipped = pathway.skipped().len(),
            "pathway assembled"
        );
        Ok(Some(pathway))
    }

    /// `name-num` for clones, the model id for reactions.
    pub fn node_label(&self, node: NodeRef) -> String {
        match node {
            NodeRef::Clone(id) => match self
                .get_clone(id)
                .and_then(|clone| self.get_species(clone.species()).map(|s| (s, clone)))
            {
                Some((species, clone)) => format!("{}-{}", species.name(), clone.num()),
                None => format!("<retired clone {}>", id.0),
            },
            NodeRef::Reaction(id) => match self.get_reaction(id) {
                Some(reaction) => reaction.id().to_string(),
                None => format!("<unknown reaction {}>", id.0),
            },
        }
    }

    /// Live clones the pathway does not place.
    pub fn loose_clones(&self, pathway: &Pathway) -> Vec<CloneId> {
        self.clones
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !pathway.contains(NodeRef::Clone(*id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glycolysis_fragment() -> NetworkRecords {
        NetworkRecords {
            species: vec![
                SpeciesRecord::new("glc", "glucose", "cytosol"),
                SpeciesRecord::new("atp", "ATP", "cytosol"),
                SpeciesRecord::new("adp", "ADP", "cytosol"),
                SpeciesRecord::new("g6p", "G6P", "cytosol"),
                SpeciesRecord::new("f6p", "F6P", "cytosol"),
                SpeciesRecord::new("hk", "", "cytosol"),
            ],
            reactions: vec![
                ReactionRecord::new("hexokinase", &["glc", "atp"], &["g6p", "adp"])
                    .with_modifiers(&["hk"]),
                ReactionRecord::new("pgi", &["g6p"], &["f6p"]).reversible(true),
            ],
        }
    }

    #[test]
    fn test_doubly_linked() {
        let net = ReactionNetwork::from_records(glycolysis_fragment()).unwrap();
        let hexokinase = net.reaction_by_id("hexokinase").unwrap();
        let atp = net.species_by_id("atp").unwrap();
        let hk = net.get_species(net.species_by_id("hk").unwrap()).unwrap();

        assert_eq!(net.get_species(atp).unwrap().reactions_entered(), &[hexokinase]);
        assert_eq!(hk.reactions_modified(), &[hexokinase]);
        assert_eq!(hk.name(), "hk");
        assert_eq!(net.get_reaction(hexokinase).unwrap().compartment_name(), "cytosol");
        assert_eq!(net.compartments().len(), 1);
        assert_eq!(net.compartment("cytosol").unwrap().reactions().len(), 2);
        // Every species starts out trivially cloned.
        assert_eq!(net.clones().live_count(), 6);
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let mut records = glycolysis_fragment();
        records.reactions.push(ReactionRecord::new("pfk", &["f6p", "missing"], &[]));

        let err = ReactionNetwork::from_records(records).unwrap_err();
        assert_eq!(
            err,
            PathwayError::UnknownSpecies {
                reaction: "pfk".to_string(),
                species: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut records = glycolysis_fragment();
        records.species.push(SpeciesRecord::new("glc", "glucose", "cytosol"));
        assert_eq!(
            ReactionNetwork::from_records(records).unwrap_err(),
            PathwayError::DuplicateSpecies("glc".to_string())
        );

        let mut records = glycolysis_fragment();
        records.reactions.push(ReactionRecord::new("pgi", &[], &[]));
        assert_eq!(
            ReactionNetwork::from_records(records).unwrap_err(),
            PathwayError::DuplicateReaction("pgi".to_string())
        );
    }

    #[test]
    fn test_blacklist_recloning_spares_endpoint_species() {
        let mut net = ReactionNetwork::from_records(glycolysis_fragment()).unwrap();
        let atp = net.species_by_id("atp").unwrap();
        let glc = net.species_by_id("glc").unwrap();
        let endpoint = net.clones_of_id("atp")[0];
        let blacklist = Blacklist::new(["ATP", "ADP", "glucose"]);

        let recloned = net.apply_blacklist(&blacklist, endpoint).unwrap();

        assert!(!recloned.contains(&atp));
        assert!(recloned.contains(&glc));
        assert_eq!(net.get_species(atp).unwrap().cloning(), Some(CloningStrategy::Trivial));
        assert!(net.get_clone(endpoint).is_some());
    }

    #[test]
    fn test_blacklist_with_retired_endpoint() {
        let mut net = ReactionNetwork::from_records(glycolysis_fragment()).unwrap();
        let endpoint = net.clones_of_id("glc")[0];
        net.set_discrete_cloning(net.species_by_id("glc").unwrap());

        let err = net.apply_blacklist(&Blacklist::default(), endpoint).unwrap_err();
        assert_eq!(err, PathwayError::UnknownClone(endpoint));
    }

    #[test]
    fn test_node_labels() {
        let net = ReactionNetwork::from_records(glycolysis_fragment()).unwrap();
        let g6p = net.clones_of_id("g6p")[0];
        let pgi = net.reaction_by_id("pgi").unwrap();

        assert_eq!(net.node_label(g6p.into()), "G6P-0");
        assert_eq!(net.node_label(pgi.into()), "pgi");
    }
}
