/// Side effects declared by the reducer.
///
/// Entry pipeline effects carry the selection token they were issued for;
/// the matching result actions echo it back.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPage { offset: usize },
    LoadEntryDetail { token: u64, url: String },
    LoadSpecies { token: u64, name: String },
    LoadEvolutionChain { token: u64, url: String },
    LoadMoveDetail { token: u64, name: String },
}
