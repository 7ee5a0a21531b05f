//! Reading reaction networks from SBML or from JSON records.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use roxmltree::{Document, Node};

use crate::network::{NetworkRecords, ReactionNetwork, ReactionRecord, SpeciesRecord};

/// Read records from `path`: `.json` files hold serialised
/// [`NetworkRecords`], anything else is parsed as SBML.
pub fn read_records(path: &Path) -> Result<NetworkRecords> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON records in {:?}", path))
    } else {
        let doc = Document::parse(&text).context("Failed to parse SBML XML")?;
        parse_sbml(&doc).with_context(|| format!("Invalid SBML model in {:?}", path))
    }
}

pub fn load_network(path: &Path) -> Result<ReactionNetwork> {
    let records = read_records(path)?;
    ReactionNetwork::from_records(records).with_context(|| format!("Failed to link network from {:?}", path))
}

/// Extract species and reactions from an SBML document.
pub fn parse_sbml(doc: &Document) -> Result<NetworkRecords> {
    let model = doc
        .descendants()
        .find(|node| node.has_tag_name("model"))
        .ok_or_else(|| anyhow!("SBML file missing model element"))?;

    let mut records = NetworkRecords::default();
    if let Some(list) = child(&model, "listOfSpecies") {
        for node in list.children().filter(|node| node.has_tag_name("species")) {
            records.species.push(parse_species(&node)?);
        }
    }
    if let Some(list) = child(&model, "listOfReactions") {
        for node in list.children().filter(|node| node.has_tag_name("reaction")) {
            records.reactions.push(parse_reaction(&node)?);
        }
    }
    Ok(records)
}

fn parse_species(node: &Node) -> Result<SpeciesRecord> {
    let id = node
        .attribute("id")
        .ok_or_else(|| anyhow!("Species missing id"))?;
    Ok(SpeciesRecord::new(
        id,
        node.attribute("name").unwrap_or(id),
        node.attribute("compartment").unwrap_or_default(),
    ))
}

fn parse_reaction(node: &Node) -> Result<ReactionRecord> {
    let id = node
        .attribute("id")
        .ok_or_else(|| anyhow!("Reaction missing id"))?;
    // SBML level 2 treats an absent flag as reversible.
    let reversible = match node.attribute("reversible") {
        None | Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        Some(other) => return Err(anyhow!("Reaction {id}: bad reversible value {other:?}")),
    };
    Ok(ReactionRecord {
        id: id.to_string(),
        name: node.attribute("name").unwrap_or(id).to_string(),
        compartment: node.attribute("compartment").unwrap_or_default().to_string(),
        reversible,
        inputs: species_refs(node, "listOfReactants", "speciesReference", id)?,
        outputs: species_refs(node, "listOfProducts", "speciesReference", id)?,
        modifiers: species_refs(node, "listOfModifiers", "modifierSpeciesReference", id)?,
    })
}

fn species_refs(reaction: &Node, list: &str, tag: &str, reaction_id: &str) -> Result<Vec<String>> {
    let Some(list) = child(reaction, list) else {
        return Ok(Vec::new());
    };
    list.children()
        .filter(|node| node.has_tag_name(tag))
        .map(|node| {
            node.attribute("species")
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("Reaction {reaction_id}: {tag} missing species"))
        })
        .collect()
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}
