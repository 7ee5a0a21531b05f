use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pathway_branches_rs::{
    load_network, Blacklist, CloneId, PathwayReport, ReactionNetwork, SearchOptions, SpeciesId,
};

#[derive(Parser)]
#[command(author, version, about = "Find branches and assemble pathways in reaction networks", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "find_branches")]
    FindBranches {
        /// SBML model, or JSON network records
        #[arg(long)]
        input: PathBuf,
        /// Species id, or species name when no id matches
        #[arg(long)]
        endpoint: String,
        /// Which clone of the endpoint species to start from
        #[arg(long, default_value_t = 0)]
        clone: usize,
        #[arg(long, value_enum, default_value_t = Direction::Forward)]
        direction: Direction,
        /// Extra species names to split into discrete clones
        #[arg(long, value_delimiter = ',')]
        blacklist: Vec<String>,
        /// File of species names to blacklist, one per line
        #[arg(long)]
        blacklist_file: Option<PathBuf>,
        /// Do not blacklist the usual currency molecules (ATP, NADH, ...)
        #[arg(long)]
        no_default_blacklist: bool,
        /// Walk through reactions spanning several compartments
        #[arg(long)]
        follow_transporters: bool,
        /// Keep single-node branches
        #[arg(long)]
        keep_short: bool,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    #[command(name = "list_species")]
    ListSpecies {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::FindBranches {
            input,
            endpoint,
            clone,
            direction,
            blacklist,
            blacklist_file,
            no_default_blacklist,
            follow_transporters,
            keep_short,
            output,
        } => {
            let blacklist = build_blacklist(no_default_blacklist, &blacklist, blacklist_file.as_deref())?;
            let options = SearchOptions {
                forward: direction == Direction::Forward,
                extended: !keep_short,
                follow_transporters,
            };
            find_branches(&input, &endpoint, clone, &blacklist, &options, output.as_deref())
        }
        Command::ListSpecies { input } => list_species(&input),
    }
}

fn build_blacklist(no_default: bool, names: &[String], file: Option<&Path>) -> Result<Blacklist> {
    let mut blacklist = if no_default {
        Blacklist::default()
    } else {
        Blacklist::currency_molecules()
    };
    blacklist.extend(names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()));
    if let Some(path) = file {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        blacklist.extend(Blacklist::parse(&text).names().iter().cloned());
    }
    Ok(blacklist)
}

fn find_branches(
    input: &Path,
    endpoint: &str,
    clone: usize,
    blacklist: &Blacklist,
    options: &SearchOptions,
    output: Option<&Path>,
) -> Result<()> {
    let mut network = load_network(input)?;
    let endpoint = resolve_endpoint(&network, endpoint, clone)?;

    let pathway = network
        .find_pathway(endpoint, blacklist, options)
        .context("Failed to assemble pathway")?;
    let Some(pathway) = pathway else {
        tracing::warn!("no pathway found");
        return Ok(());
    };

    let json = PathwayReport::new(&network, &pathway, options)
        .to_json()
        .context("Failed to serialise report")?;
    match output {
        Some(path) => fs::write(path, json).with_context(|| format!("Failed to write {:?}", path)),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// Look the endpoint up by species id first, then by name. A name shared
/// by several species resolves to the first, with a warning naming the
/// others.
fn resolve_endpoint(network: &ReactionNetwork, endpoint: &str, clone: usize) -> Result<CloneId> {
    let species = match network.species_by_id(endpoint) {
        Some(species) => species,
        None => pick_named_species(network, endpoint)?,
    };
    let clones = network
        .get_species(species)
        .map(|s| s.clones())
        .unwrap_or(&[]);
    clones.get(clone).copied().ok_or_else(|| {
        anyhow!(
            "Species {endpoint:?} has {} clone(s), no clone {clone}",
            clones.len()
        )
    })
}

fn pick_named_species(network: &ReactionNetwork, name: &str) -> Result<SpeciesId> {
    let named = network.species_named(name);
    let (first, others) = named
        .split_first()
        .ok_or_else(|| anyhow!("No species with id or name {name:?}"))?;
    if !others.is_empty() {
        let id_of = |handle: &SpeciesId| {
            network
                .get_species(*handle)
                .map(|s| s.id().to_string())
                .unwrap_or_default()
        };
        let ignored: Vec<String> = others.iter().map(id_of).collect();
        tracing::warn!(
            name,
            chosen = %id_of(first),
            ignored = %ignored.join(", "),
            "species name is ambiguous; pass a species id to pick another"
        );
    }
    Ok(*first)
}

fn list_species(input: &Path) -> Result<()> {
    let network = load_network(input)?;
    for species in network.species() {
        println!(
            "{}\t{}\t{}\t{}",
            species.id(),
            species.name(),
            species.compartment_name(),
            species.clones().len()
        );
    }
    Ok(())
}
