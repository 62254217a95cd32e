use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api::ApiError;
use crate::catalog;
use crate::effect::Effect;
use crate::state::{AppState, CatalogEntry, Enrichment, SpeciesInfo};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.page = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPage {
                offset: state.offset,
            })
        }

        Action::PageNext => change_page(state, catalog::next_offset(state.offset)),
        Action::PagePrev => change_page(state, catalog::prev_offset(state.offset)),

        Action::PageDidLoad { offset, entries } => {
            if offset != state.offset {
                tracing::debug!(offset, current = state.offset, "dropping stale page");
                return DispatchResult::unchanged();
            }
            state.page = DataResource::Loaded(entries);
            state.list_index = 0;
            state.message = None;
            DispatchResult::changed()
        }

        Action::PageDidError { offset, error } => {
            if offset != state.offset {
                return DispatchResult::unchanged();
            }
            tracing::warn!(offset, %error, "page unavailable");
            state.message = Some(format!("Page error: {error}"));
            state.page = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        Action::EntrySelect(index) => {
            let Some(entry) = state.entry_at(index).cloned() else {
                return DispatchResult::unchanged();
            };
            state.list_index = index;
            DispatchResult::changed_with(select_entry(state, entry))
        }

        Action::EntryDidLoad { token, detail } => {
            if is_stale(state, token, "entry detail") {
                return DispatchResult::unchanged();
            }
            let name = detail.name.clone();
            state.detail = DataResource::Loaded(detail);
            state.move_detail = DataResource::Empty;
            state.move_index = 0;
            state.enrichment = Enrichment::ResolvingSpecies;
            DispatchResult::changed_with(Effect::LoadSpecies { token, name })
        }

        Action::EntryDidError { token, error } => {
            if is_stale(state, token, "entry detail error") {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("{} unavailable: {error}", selected_name(state)));
            state.detail = DataResource::Failed(error.to_string());
            state.enrichment = Enrichment::Idle;
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { token, species } => {
            if is_stale(state, token, "species") {
                return DispatchResult::unchanged();
            }
            let url = species.evolution_chain_url.clone();
            state.enrichment = Enrichment::ResolvingChain(species);
            DispatchResult::changed_with(Effect::LoadEvolutionChain { token, url })
        }

        Action::SpeciesDidError { token, error } => {
            if is_stale(state, token, "species error") {
                return DispatchResult::unchanged();
            }
            enrichment_failed(state, error)
        }

        Action::EvolutionDidLoad { token, path } => {
            if is_stale(state, token, "evolution chain") {
                return DispatchResult::unchanged();
            }
            let Enrichment::ResolvingChain(species) = &state.enrichment else {
                return DispatchResult::unchanged();
            };
            state.species = Some(SpeciesInfo {
                name: species.name.clone(),
                evolution_chain_url: species.evolution_chain_url.clone(),
                evolution_path: path,
            });
            state.enrichment = Enrichment::Ready;
            DispatchResult::changed()
        }

        Action::EvolutionDidError { token, error } => {
            if is_stale(state, token, "evolution chain error") {
                return DispatchResult::unchanged();
            }
            enrichment_failed(state, error)
        }

        Action::MoveSelect(index) => {
            let Some(name) = state.move_shortcuts().get(index).cloned() else {
                return DispatchResult::unchanged();
            };
            state.move_index = index;
            state.move_detail = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadMoveDetail {
                token: state.selection_token,
                name,
            })
        }

        Action::MoveDidLoad { token, detail } => {
            if is_stale(state, token, "move detail") {
                return DispatchResult::unchanged();
            }
            state.move_detail = DataResource::Loaded(detail);
            DispatchResult::changed()
        }

        Action::MoveDidError { token, name, error } => {
            if is_stale(state, token, "move detail error") {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%name, %error, "move unavailable");
            state.message = Some(format!("Move {name} error: {error}"));
            state.move_detail = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        Action::FocusNext => {
            state.focus_next();
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Start the detail pipeline for `entry`, superseding any selection in flight.
fn select_entry(state: &mut AppState, entry: CatalogEntry) -> Effect {
    state.selection_token = state.selection_token.wrapping_add(1);
    state.move_detail = DataResource::Empty;
    state.move_index = 0;
    state.detail = DataResource::Loading;
    state.enrichment = Enrichment::ResolvingSpecies;
    state.message = None;
    let url = entry.detail_url.clone();
    state.selected = Some(entry);
    Effect::LoadEntryDetail {
        token: state.selection_token,
        url,
    }
}

fn change_page(state: &mut AppState, offset: usize) -> DispatchResult<Effect> {
    if offset == state.offset {
        return DispatchResult::unchanged();
    }
    state.offset = offset;
    state.page = DataResource::Loading;
    state.list_index = 0;
    clear_selection(state);
    DispatchResult::changed_with(Effect::LoadPage { offset })
}

fn clear_selection(state: &mut AppState) {
    state.selection_token = state.selection_token.wrapping_add(1);
    state.selected = None;
    state.detail = DataResource::Empty;
    state.enrichment = Enrichment::Idle;
    state.move_detail = DataResource::Empty;
    state.move_index = 0;
    state.message = None;
}

fn enrichment_failed(state: &mut AppState, error: ApiError) -> DispatchResult<Effect> {
    tracing::warn!(entry = %selected_name(state), %error, "evolution data unavailable");
    state.message = Some(format!("Evolution error: {error}"));
    state.enrichment = Enrichment::Unavailable(error.to_string());
    DispatchResult::changed()
}

fn is_stale(state: &AppState, token: u64, what: &str) -> bool {
    if token == state.selection_token {
        return false;
    }
    tracing::debug!(token, current = state.selection_token, what, "dropping stale result");
    true
}

fn selected_name(state: &AppState) -> String {
    state
        .selected
        .as_ref()
        .map(|entry| entry.name.clone())
        .unwrap_or_default()
}
