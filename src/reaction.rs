use crate::network::ReactionNetwork;
use crate::node::{CloneId, ReactionId, SpeciesId};
use crate::species::SpeciesClone;

#[derive(Clone, Debug)]
pub struct Reaction {
    handle: ReactionId,
    id: String,
    name: String,
    compartment: String,
    reversible: bool,
    inputs: Vec<SpeciesId>,
    outputs: Vec<SpeciesId>,
    modifiers: Vec<SpeciesId>,
}

impl Reaction {
    pub fn new(handle: ReactionId, id: &str, name: &str, compartment: &str, reversible: bool) -> Self {
        Self {
            handle,
            id: id.to_string(),
            name: name.to_string(),
            compartment: compartment.to_string(),
            reversible,
            inputs: Vec::new(),
            outputs: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn handle(&self) -> ReactionId {
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

    pub(crate) fn set_compartment_name(&mut self, compartment: &str) {
        self.compartment = compartment.to_string();
    }

    pub fn is_reversible(&self) -> bool {
        self.reversible
    }

    pub fn inputs(&self) -> &[SpeciesId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SpeciesId] {
        &self.outputs
    }

    pub fn modifiers(&self) -> &[SpeciesId] {
        &self.modifiers
    }

    pub(crate) fn add_input(&mut self, species: SpeciesId) {
        self.inputs.push(species);
    }

    pub(crate) fn add_output(&mut self, species: SpeciesId) {
        self.outputs.push(species);
    }

    pub(crate) fn add_modifier(&mut self, species: SpeciesId) {
        self.modifiers.push(species);
    }

    /// Every species taking part, in input/output/modifier order.
    pub fn participants(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .chain(self.modifiers.iter())
            .copied()
    }

    /// True when the participating species live in more than one
    /// compartment, i.e. the reaction is a transporter.
    pub fn is_intercompartmental(&self, network: &ReactionNetwork) -> bool {
        let mut first: Option<&str> = None;
        for species in self.participants().filter_map(|id| network.get_species(id)) {
            match first {
                None => first = Some(species.compartment_name()),
                Some(name) if name != species.compartment_name() => return true,
                Some(_) => {}
            }
        }
        false
    }

    /// Clones that are reactants of this reaction.
    pub fn input_clones(&self, network: &ReactionNetwork) -> Vec<CloneId> {
        self.side_clones(network, &self.inputs, |clone| clone.enters(self.handle))
    }

    /// Clones that are products of this reaction.
    pub fn output_clones(&self, network: &ReactionNetwork) -> Vec<CloneId> {
        self.side_clones(network, &self.outputs, |clone| clone.exits(self.handle))
    }

    /// Clones on the far side of this reaction from `leading`.
    ///
    /// A leading clone that is only a product sees the reactants, one that
    /// is only a reactant sees the products. When the leading clone is both,
    /// or when there is no leading clone, the side in the direction of travel
    /// is opposed: products going forward, reactants going backward. A
    /// leading clone with neither role (a modifier) has nothing opposed.
    pub fn opposed_clones(
        &self,
        network: &ReactionNetwork,
        leading: Option<CloneId>,
        forward: bool,
    ) -> Vec<CloneId> {
        let roles = leading
            .and_then(|id| network.get_clone(id))
            .map(|clone| (clone.enters(self.handle), clone.exits(self.handle)));
        let take_outputs = match roles {
            Some((true, false)) => true,
            Some((false, true)) => false,
            Some((false, false)) => return Vec::new(),
            Some((true, true)) | None => forward,
        };
        if take_outputs {
            self.output_clones(network)
        } else {
            self.input_clones(network)
        }
    }

    fn side_clones<F>(&self, network: &ReactionNetwork, side: &[SpeciesId], has_role: F) -> Vec<CloneId>
    where
        F: Fn(&SpeciesClone) -> bool,
    {
        let mut visited: Vec<SpeciesId> = Vec::new();
        let mut clones = Vec::new();
        for species_id in side {
            if visited.contains(species_id) {
                continue;
            }
            visited.push(*species_id);
            let Some(species) = network.get_species(*species_id) else {
                continue;
            };
            for clone_id in species.clones() {
                if network.get_clone(*clone_id).is_some_and(&has_role) {
                    clones.push(*clone_id);
                }
            }
        }
        clones
    }
}
