use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::state::{CatalogEntry, EntryDetail, MoveDetail, SpeciesRef};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    PageNext,
    PagePrev,
    PageDidLoad { offset: usize, entries: Vec<CatalogEntry> },
    PageDidError { offset: usize, error: ApiError },

    /// Select the catalog row at the given index on the current page.
    EntrySelect(usize),
    EntryDidLoad { token: u64, detail: EntryDetail },
    EntryDidError { token: u64, error: ApiError },
    SpeciesDidLoad { token: u64, species: SpeciesRef },
    SpeciesDidError { token: u64, error: ApiError },
    EvolutionDidLoad { token: u64, path: Vec<String> },
    EvolutionDidError { token: u64, error: ApiError },

    /// Inspect the move shortcut at the given index.
    MoveSelect(usize),
    MoveDidLoad { token: u64, detail: MoveDetail },
    MoveDidError { token: u64, name: String, error: ApiError },

    FocusNext,

    UiTerminalResize(u16, u16),
    Quit,
}
