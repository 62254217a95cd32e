//! Detail pipeline ordering tests.
//!
//! Async completions are simulated by dispatching result actions in the
//! order a slow or fast network could deliver them.

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::EffectStore;

use pokedex::action::Action;
use pokedex::api::ApiError;
use pokedex::effect::Effect;
use pokedex::reducer::reducer;
use pokedex::state::{
    AppState, CatalogEntry, EntryDetail, Enrichment, MoveDetail, SpeciesRef, ViewPhase,
};

fn entry(name: &str) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        thumbnail_url: format!("https://raw.example/{name}.png"),
        detail_url: format!("https://pokeapi.co/api/v2/pokemon/{name}/"),
    }
}

fn detail(name: &str) -> EntryDetail {
    EntryDetail {
        id: 7,
        name: name.to_string(),
        sprite_url: format!("https://raw.example/{name}.png"),
        height: 5,
        weight: 90,
        types: vec!["water".to_string()],
        stats: Vec::new(),
        moves: vec!["tackle".to_string(), "water-gun".to_string()],
    }
}

fn species(name: &str, chain: u32) -> SpeciesRef {
    SpeciesRef {
        name: name.to_string(),
        evolution_chain_url: format!("https://pokeapi.co/api/v2/evolution-chain/{chain}/"),
    }
}

fn path(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn tackle() -> MoveDetail {
    MoveDetail {
        name: "tackle".to_string(),
        power: Some(40),
        accuracy: Some(100),
        power_points: 35,
        type_name: "normal".to_string(),
    }
}

fn store_with_page() -> EffectStore<AppState, Action, Effect> {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::PageDidLoad {
        offset: 0,
        entries: vec![entry("squirtle"), entry("bulbasaur")],
    });
    store
}

fn entry_token(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::LoadEntryDetail { token, .. }] => *token,
        other => panic!("expected a single detail effect, got {other:?}"),
    }
}

#[test]
fn later_selection_wins_when_earlier_chain_resolves_last() {
    let mut store = store_with_page();

    let a = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: a,
        detail: detail("squirtle"),
    });
    store.dispatch(Action::SpeciesDidLoad {
        token: a,
        species: species("squirtle", 3),
    });

    let b = entry_token(&store.dispatch(Action::EntrySelect(1)).effects);
    assert_ne!(a, b);

    store.dispatch(Action::EntryDidLoad {
        token: b,
        detail: detail("bulbasaur"),
    });
    store.dispatch(Action::SpeciesDidLoad {
        token: b,
        species: species("bulbasaur", 1),
    });
    store.dispatch(Action::EvolutionDidLoad {
        token: b,
        path: path(&["bulbasaur", "ivysaur", "venusaur"]),
    });

    // A's chain arrives after B is fully enriched.
    let late = store.dispatch(Action::EvolutionDidLoad {
        token: a,
        path: path(&["squirtle", "wartortle", "blastoise"]),
    });
    assert!(!late.changed);

    let state = store.state();
    assert_eq!(state.phase(), ViewPhase::EntryEnriched);
    assert_eq!(state.current_detail().unwrap().name, "bulbasaur");
    let species = state.current_species().unwrap();
    assert_eq!(species.name, "bulbasaur");
    assert_eq!(
        species.evolution_path,
        path(&["bulbasaur", "ivysaur", "venusaur"])
    );
}

#[test]
fn earlier_detail_arriving_after_reselection_is_dropped() {
    let mut store = store_with_page();

    let a = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    let b = entry_token(&store.dispatch(Action::EntrySelect(1)).effects);

    let stale = store.dispatch(Action::EntryDidLoad {
        token: a,
        detail: detail("squirtle"),
    });
    assert!(!stale.changed);
    assert!(stale.effects.is_empty());
    assert_eq!(store.state().phase(), ViewPhase::EntryLoading);

    let fresh = store.dispatch(Action::EntryDidLoad {
        token: b,
        detail: detail("bulbasaur"),
    });
    assert_eq!(
        fresh.effects,
        vec![Effect::LoadSpecies {
            token: b,
            name: "bulbasaur".to_string(),
        }]
    );
}

#[test]
fn previous_evolution_path_is_not_shown_under_new_selection() {
    let mut store = store_with_page();

    let a = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: a,
        detail: detail("squirtle"),
    });
    store.dispatch(Action::SpeciesDidLoad {
        token: a,
        species: species("squirtle", 3),
    });
    store.dispatch(Action::EvolutionDidLoad {
        token: a,
        path: path(&["squirtle", "wartortle", "blastoise"]),
    });
    assert!(store.state().current_species().is_some());

    let b = entry_token(&store.dispatch(Action::EntrySelect(1)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: b,
        detail: detail("bulbasaur"),
    });

    let state = store.state();
    assert_eq!(state.phase(), ViewPhase::EntrySelected);
    assert!(state.current_species().is_none());
    assert_eq!(state.evolution_line(), None);
    // The old record is kept until the new one replaces it.
    assert_eq!(state.species.as_ref().unwrap().name, "squirtle");
}

#[test]
fn selecting_same_entry_twice_matches_single_selection() {
    let mut once = store_with_page();
    let token = entry_token(&once.dispatch(Action::EntrySelect(0)).effects);
    once.dispatch(Action::EntryDidLoad {
        token,
        detail: detail("squirtle"),
    });
    once.dispatch(Action::SpeciesDidLoad {
        token,
        species: species("squirtle", 3),
    });
    once.dispatch(Action::EvolutionDidLoad {
        token,
        path: path(&["squirtle", "wartortle", "blastoise"]),
    });

    let mut twice = store_with_page();
    let first = entry_token(&twice.dispatch(Action::EntrySelect(0)).effects);
    let second = entry_token(&twice.dispatch(Action::EntrySelect(0)).effects);
    for token in [first, second] {
        twice.dispatch(Action::EntryDidLoad {
            token,
            detail: detail("squirtle"),
        });
        twice.dispatch(Action::SpeciesDidLoad {
            token,
            species: species("squirtle", 3),
        });
        twice.dispatch(Action::EvolutionDidLoad {
            token,
            path: path(&["squirtle", "wartortle", "blastoise"]),
        });
    }

    assert_eq!(once.state().current_detail(), twice.state().current_detail());
    assert_eq!(
        once.state().current_species(),
        twice.state().current_species()
    );
    assert_eq!(once.state().phase(), twice.state().phase());
}

#[test]
fn selecting_entry_clears_move_synchronously() {
    let mut store = store_with_page();
    let token = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token,
        detail: detail("squirtle"),
    });
    store.dispatch(Action::MoveSelect(0));
    store.dispatch(Action::MoveDidLoad {
        token,
        detail: tackle(),
    });
    assert!(store.state().is_move_inspecting());

    store.dispatch(Action::EntrySelect(1));

    assert!(!store.state().is_move_inspecting());
    assert!(store.state().move_detail.is_empty());
}

#[test]
fn move_result_for_previous_entry_is_not_attributed_to_new_one() {
    let mut store = store_with_page();
    let a = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: a,
        detail: detail("squirtle"),
    });
    let requested = store.dispatch(Action::MoveSelect(0));
    assert_eq!(
        requested.effects,
        vec![Effect::LoadMoveDetail {
            token: a,
            name: "tackle".to_string(),
        }]
    );

    let b = entry_token(&store.dispatch(Action::EntrySelect(1)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: b,
        detail: detail("bulbasaur"),
    });

    let late = store.dispatch(Action::MoveDidLoad {
        token: a,
        detail: tackle(),
    });
    assert!(!late.changed);
    assert!(store.state().current_move().is_none());
}

#[test]
fn move_and_species_resolve_independently() {
    let mut store = store_with_page();
    let token = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token,
        detail: detail("squirtle"),
    });

    store.dispatch(Action::MoveSelect(1));
    store.dispatch(Action::SpeciesDidLoad {
        token,
        species: species("squirtle", 3),
    });
    store.dispatch(Action::MoveDidLoad {
        token,
        detail: MoveDetail {
            name: "water-gun".to_string(),
            power: Some(40),
            accuracy: Some(100),
            power_points: 25,
            type_name: "water".to_string(),
        },
    });
    store.dispatch(Action::EvolutionDidLoad {
        token,
        path: path(&["squirtle", "wartortle", "blastoise"]),
    });

    let state = store.state();
    assert_eq!(state.phase(), ViewPhase::EntryEnriched);
    assert_eq!(state.current_move().unwrap().name, "water-gun");
}

#[test]
fn species_failure_keeps_detail_and_marks_evolution_unavailable() {
    let mut store = store_with_page();
    let token = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token,
        detail: detail("squirtle"),
    });

    let failed = store.dispatch(Action::SpeciesDidError {
        token,
        error: ApiError::NotFound("pokemon-species/squirtle".to_string()),
    });
    assert!(failed.changed);
    assert!(failed.effects.is_empty());

    let state = store.state();
    assert_eq!(state.phase(), ViewPhase::EntrySelected);
    assert_eq!(state.current_detail().unwrap().name, "squirtle");
    assert!(matches!(state.enrichment, Enrichment::Unavailable(_)));
    assert_eq!(
        state.evolution_line().as_deref(),
        Some("Evolution data unavailable")
    );
}

#[test]
fn chain_failure_keeps_detail_and_marks_evolution_unavailable() {
    let mut store = store_with_page();
    let token = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token,
        detail: detail("squirtle"),
    });
    store.dispatch(Action::SpeciesDidLoad {
        token,
        species: species("squirtle", 3),
    });

    store.dispatch(Action::EvolutionDidError {
        token,
        error: ApiError::Network("timed out".to_string()),
    });

    let state = store.state();
    assert_eq!(state.current_detail().unwrap().name, "squirtle");
    assert!(state.current_species().is_none());
    assert_eq!(
        state.evolution_line().as_deref(),
        Some("Evolution data unavailable")
    );
}

#[test]
fn enrichment_error_for_previous_selection_is_dropped() {
    let mut store = store_with_page();
    let a = entry_token(&store.dispatch(Action::EntrySelect(0)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: a,
        detail: detail("squirtle"),
    });
    let b = entry_token(&store.dispatch(Action::EntrySelect(1)).effects);
    store.dispatch(Action::EntryDidLoad {
        token: b,
        detail: detail("bulbasaur"),
    });

    let species_error = store.dispatch(Action::SpeciesDidError {
        token: a,
        error: ApiError::Network("connection reset".to_string()),
    });
    let chain_error = store.dispatch(Action::EvolutionDidError {
        token: a,
        error: ApiError::Network("connection reset".to_string()),
    });
    assert!(!species_error.changed);
    assert!(!chain_error.changed);

    let state = store.state();
    assert_eq!(state.enrichment, Enrichment::ResolvingSpecies);
    assert_eq!(state.current_detail().unwrap().name, "bulbasaur");
    assert_eq!(state.evolution_line(), None);
}

#[test]
fn failed_page_shows_no_partial_entries() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    let _ = harness.drain_effects();

    harness.complete_action(Action::PageDidError {
        offset: 0,
        error: ApiError::Malformed("pokemon missingno has no front sprite".to_string()),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));

    harness.assert_state(|s| s.page.is_failed());
    harness.assert_state(|s| s.entries().is_empty());
    harness.assert_state(|s| s.phase() == ViewPhase::Browsing);
}

#[test]
fn page_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.page.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 0 }));

    harness.complete_action(Action::PageDidLoad {
        offset: 0,
        entries: vec![entry("bulbasaur"), entry("ivysaur")],
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.entries().len() == 2);
    harness.assert_state(|s| s.phase() == ViewPhase::Browsing);
}

#[test]
fn page_navigation_clamps_at_last_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(950, Default::default()), reducer);

    let results = harness.dispatch_all([Action::PageNext, Action::PagePrev]);
    assert_eq!(results, vec![false, true]);
    harness.assert_state(|s| s.offset == 900);
    harness.assert_state(|s| s.page_label() == "Page 19 of 20");
}
