use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::PAGE_SIZE;
use crate::evolution::{self, EvolutionChainResponse};
use crate::state::{CatalogEntry, EntryDetail, EntryStat, MoveDetail, SpeciesRef};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const THUMBNAIL_CONCURRENCY: usize = 12;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    name: String,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveDetailResponse {
    name: String,
    power: Option<u16>,
    accuracy: Option<u16>,
    pp: Option<u16>,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

/// Fetch one catalog page and resolve every entry's thumbnail.
///
/// The page is all-or-nothing: if any entry fails to resolve, the whole page
/// fails with that entry's error.
pub async fn fetch_catalog_page(offset: usize) -> Result<Vec<CatalogEntry>, ApiError> {
    let url = format!("{API_BASE}/pokemon?limit={PAGE_SIZE}&offset={offset}");
    let response: ListResponse = fetch_json(&url).await?;

    let semaphore = Arc::new(Semaphore::new(THUMBNAIL_CONCURRENCY));
    let mut join_set = JoinSet::new();
    for (index, entry) in response.results.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| ApiError::Network("thumbnail semaphore closed".to_string()))?;
            let response: PokemonResponse = fetch_json(&entry.url).await?;
            let thumbnail_url = front_sprite(&response.sprites, &entry.name)?;
            Ok::<_, ApiError>((
                index,
                CatalogEntry {
                    name: entry.name,
                    thumbnail_url,
                    detail_url: entry.url,
                },
            ))
        });
    }

    collect_page(join_set).await
}

/// Drain thumbnail lookups; the first failure aborts the rest and fails the page.
async fn collect_page(
    mut join_set: JoinSet<Result<(usize, CatalogEntry), ApiError>>,
) -> Result<Vec<CatalogEntry>, ApiError> {
    let mut resolved = Vec::with_capacity(join_set.len());
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Ok(entry)) => resolved.push(entry),
            Ok(Err(error)) => {
                join_set.abort_all();
                return Err(error);
            }
            Err(error) => {
                join_set.abort_all();
                return Err(ApiError::Network(error.to_string()));
            }
        }
    }
    Ok(assemble_page(resolved))
}

pub async fn fetch_entry_detail(url: &str) -> Result<EntryDetail, ApiError> {
    let response: PokemonResponse = fetch_json(url).await?;
    entry_detail_from_response(response)
}

pub async fn fetch_species(name: &str) -> Result<SpeciesRef, ApiError> {
    let url = format!("{API_BASE}/pokemon-species/{name}");
    let response: PokemonSpeciesResponse = fetch_json(&url).await?;
    species_from_response(response)
}

pub async fn fetch_evolution_path(url: &str) -> Result<Vec<String>, ApiError> {
    let response: EvolutionChainResponse = fetch_json(url).await?;
    Ok(evolution::linearize(&response.chain))
}

pub async fn fetch_move_detail(name: &str) -> Result<MoveDetail, ApiError> {
    let url = format!("{API_BASE}/move/{name}");
    let response: MoveDetailResponse = fetch_json(&url).await?;
    move_from_response(response)
}

fn assemble_page(mut resolved: Vec<(usize, CatalogEntry)>) -> Vec<CatalogEntry> {
    resolved.sort_by_key(|(index, _)| *index);
    resolved.into_iter().map(|(_, entry)| entry).collect()
}

fn entry_detail_from_response(response: PokemonResponse) -> Result<EntryDetail, ApiError> {
    let sprite_url = front_sprite(&response.sprites, &response.name)?;
    Ok(EntryDetail {
        id: response.id,
        name: response.name,
        sprite_url,
        height: response.height,
        weight: response.weight,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| EntryStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
    })
}

fn species_from_response(response: PokemonSpeciesResponse) -> Result<SpeciesRef, ApiError> {
    let Some(chain) = response.evolution_chain else {
        return Err(ApiError::Malformed(format!(
            "species {} has no evolution chain",
            response.name
        )));
    };
    Ok(SpeciesRef {
        name: response.name,
        evolution_chain_url: chain.url,
    })
}

fn move_from_response(response: MoveDetailResponse) -> Result<MoveDetail, ApiError> {
    let Some(power_points) = response.pp else {
        return Err(ApiError::Malformed(format!(
            "move {} has no pp",
            response.name
        )));
    };
    Ok(MoveDetail {
        name: response.name,
        power: response.power,
        accuracy: response.accuracy,
        power_points,
        type_name: response.type_info.name,
    })
}

fn front_sprite(sprites: &serde_json::Value, name: &str) -> Result<String, ApiError> {
    pointer_string(sprites, "/front_default")
        .ok_or_else(|| ApiError::Malformed(format!("{name} has no front sprite")))
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let bytes = fetch_bytes(url).await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        tracing::warn!(%url, error = %err, "malformed response");
        ApiError::Malformed(format!("{url}: {err}"))
    })
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    tracing::debug!(%url, "GET");
    let response = http_client().get(url).send().await.map_err(|err| {
        tracing::warn!(%url, error = %err, "request failed");
        ApiError::Network(err.to_string())
    })?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        tracing::warn!(%url, "not found");
        return Err(ApiError::NotFound(url.to_string()));
    }
    let response = response.error_for_status().map_err(|err| {
        tracing::warn!(%url, error = %err, "error status");
        ApiError::Network(err.to_string())
    })?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    Ok(bytes.to_vec())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}
