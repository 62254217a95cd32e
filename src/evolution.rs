//! Evolution chain linearization.
//!
//! Upstream chains are trees: a base form may evolve into several species.
//! The viewer shows a single line and always follows the first branch.

use serde::Deserialize;

/// Upper bound on the number of stages walked from a chain root.
pub const MAX_CHAIN_DEPTH: usize = 32;

#[derive(Clone, Debug, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChainLink {
    pub species: ChainSpecies,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChainSpecies {
    pub name: String,
}

/// Walk `root` along the first entry of `evolves_to` at every stage.
pub fn linearize(root: &ChainLink) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(root);
    while let Some(link) = current {
        if path.len() == MAX_CHAIN_DEPTH {
            break;
        }
        path.push(link.species.name.clone());
        current = link.evolves_to.first();
    }
    path
}
