//! Branch discovery and pathway assembly for biochemical reaction networks.
//!
//! A network of species and reactions is loaded (from SBML or JSON
//! records), a species clone is picked as endpoint, and a depth-first
//! search decomposes everything reachable from it into linear branches and
//! cycles. The branches are then assembled into a [`Pathway`]: a main
//! branch starting at the endpoint, side branches attached at their parent
//! nodes, and forks at clones where several branches meet.
//!
//! ```no_run
//! use pathway_branches_rs::{load_network, Blacklist, SearchOptions};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut network = load_network(Path::new("model.xml"))?;
//! let species = network.species_by_id("glc").expect("species");
//! let endpoint = network.get_species(species).expect("species").clones()[0];
//! let pathway = network.find_pathway(
//!     endpoint,
//!     &Blacklist::currency_molecules(),
//!     &SearchOptions::default(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod blacklist;
pub mod branch;
pub mod error;
pub mod loader;
pub mod network;
pub mod node;
pub mod pathway;
pub mod reaction;
pub mod report;
pub mod species;
pub mod traversal;

pub use blacklist::Blacklist;
pub use branch::{find_merge_target, merge_self_with_branches, Branch};
pub use error::{AssemblyIssue, PathwayError};
pub use loader::{load_network, read_records};
pub use network::{Compartment, NetworkRecords, ReactionNetwork, ReactionRecord, SpeciesRecord};
pub use node::{CloneId, NodeRef, ReactionId, SpeciesId};
pub use pathway::{BranchId, Fork, Pathway, SkippedBranch};
pub use reaction::Reaction;
pub use report::PathwayReport;
pub use species::{CloningStrategy, Species, SpeciesClone};
pub use traversal::{find_branches, SearchOptions};
