use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::catalog;

/// Number of move shortcuts offered for the selected entry.
pub const MOVE_SHORTCUTS: usize = 6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub thumbnail_url: String,
    pub detail_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub id: u16,
    pub name: String,
    pub sprite_url: String,
    pub height: u16,
    pub weight: u16,
    pub types: Vec<String>,
    pub stats: Vec<EntryStat>,
    pub moves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryStat {
    pub name: String,
    pub value: u16,
}

/// Species metadata before its evolution chain has been walked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub name: String,
    pub evolution_chain_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub name: String,
    pub evolution_chain_url: String,
    pub evolution_path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveDetail {
    pub name: String,
    pub power: Option<u16>,
    pub accuracy: Option<u16>,
    pub power_points: u16,
    pub type_name: String,
}

impl MoveDetail {
    pub fn power_label(&self) -> String {
        self.power
            .filter(|power| *power > 0)
            .map(|power| power.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn accuracy_label(&self) -> String {
        self.accuracy
            .map(|accuracy| accuracy.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Progress of the species/evolution half of the current selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Enrichment {
    Idle,
    ResolvingSpecies,
    ResolvingChain(SpeciesRef),
    Ready,
    Unavailable(String),
}

impl Enrichment {
    pub fn is_resolving(&self) -> bool {
        matches!(
            self,
            Enrichment::ResolvingSpecies | Enrichment::ResolvingChain(_)
        )
    }
}

/// What the evolution section shows while the path is still resolving.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionPlaceholder {
    #[default]
    Hidden,
    Loading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    CatalogList,
    Moves,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewPhase {
    Browsing,
    EntryLoading,
    EntryUnavailable,
    EntrySelected,
    EntryEnriched,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,

    pub offset: usize,
    pub page: DataResource<Vec<CatalogEntry>>,
    pub list_index: usize,

    /// Incremented on every entry selection; results tagged with an older
    /// value are dropped.
    pub selection_token: u64,
    pub selected: Option<CatalogEntry>,
    pub detail: DataResource<EntryDetail>,
    pub species: Option<SpeciesInfo>,
    pub enrichment: Enrichment,

    pub move_index: usize,
    pub move_detail: DataResource<MoveDetail>,

    pub evolution_placeholder: EvolutionPlaceholder,
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(0, EvolutionPlaceholder::default())
    }
}

impl AppState {
    pub fn new(offset: usize, evolution_placeholder: EvolutionPlaceholder) -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::CatalogList,
            offset: catalog::clamp_offset(offset),
            page: DataResource::Empty,
            list_index: 0,
            selection_token: 0,
            selected: None,
            detail: DataResource::Empty,
            species: None,
            enrichment: Enrichment::Idle,
            move_index: 0,
            move_detail: DataResource::Empty,
            evolution_placeholder,
            message: None,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        if self.selected.is_none() {
            return ViewPhase::Browsing;
        }
        match &self.detail {
            DataResource::Loaded(_) if self.current_species().is_some() => {
                ViewPhase::EntryEnriched
            }
            DataResource::Loaded(_) => ViewPhase::EntrySelected,
            DataResource::Failed(_) => ViewPhase::EntryUnavailable,
            DataResource::Empty | DataResource::Loading => ViewPhase::EntryLoading,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        self.page.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry_at(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries().get(index)
    }

    pub fn current_detail(&self) -> Option<&EntryDetail> {
        self.detail.data()
    }

    /// Species info of the current selection; a record left over from a
    /// previous selection is never returned.
    pub fn current_species(&self) -> Option<&SpeciesInfo> {
        if self.enrichment != Enrichment::Ready {
            return None;
        }
        self.species.as_ref()
    }

    pub fn current_move(&self) -> Option<&MoveDetail> {
        self.move_detail.data()
    }

    pub fn is_move_inspecting(&self) -> bool {
        self.move_detail.is_loaded()
    }

    pub fn move_shortcuts(&self) -> &[String] {
        let Some(detail) = self.current_detail() else {
            return &[];
        };
        let len = detail.moves.len().min(MOVE_SHORTCUTS);
        &detail.moves[..len]
    }

    /// Text for the evolution section, or `None` when it should be omitted.
    pub fn evolution_line(&self) -> Option<String> {
        if let Some(species) = self.current_species() {
            return Some(species.evolution_path.join(" → "));
        }
        match &self.enrichment {
            Enrichment::Unavailable(_) => Some("Evolution data unavailable".to_string()),
            enrichment
                if enrichment.is_resolving()
                    && self.evolution_placeholder == EvolutionPlaceholder::Loading =>
            {
                Some("Loading evolution data...".to_string())
            }
            _ => None,
        }
    }

    pub fn page_label(&self) -> String {
        catalog::page_label(self.offset)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::CatalogList => FocusArea::Moves,
            FocusArea::Moves => FocusArea::CatalogList,
        };
    }
}

/// Human-readable form of an upstream identifier such as `thunder-punch`.
pub fn display_name(name: &str) -> String {
    name.replace('-', " ")
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("offset", ron_string(&self.offset))
                .entry("page", ron_string(&self.page_label()))
                .entry("entries", ron_string(&self.entries().len()))
                .entry("cursor", ron_string(&self.list_index))
                .entry("loading", ron_string(&self.page.is_loading())),
            DebugSection::new("Selection")
                .entry("token", ron_string(&self.selection_token))
                .entry("phase", ron_string(&self.phase()))
                .entry(
                    "selected",
                    ron_string(&self.selected.as_ref().map(|entry| entry.name.clone())),
                )
                .entry(
                    "detail",
                    ron_string(&self.current_detail().map(|detail| detail.name.clone())),
                )
                .entry("enrichment", ron_string(&self.enrichment))
                .entry(
                    "evolution",
                    ron_string(
                        &self
                            .current_species()
                            .map(|species| species.evolution_path.clone()),
                    ),
                ),
            DebugSection::new("Moves")
                .entry("cursor", ron_string(&self.move_index))
                .entry(
                    "inspecting",
                    ron_string(&self.current_move().map(|detail| detail.name.clone())),
                )
                .entry("loading", ron_string(&self.move_detail.is_loading())),
            DebugSection::new("Status")
                .entry("focus", ron_string(&self.focus))
                .entry("placeholder", ron_string(&self.evolution_placeholder))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
