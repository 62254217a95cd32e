//! Pokedex viewer: paged catalog browsing with evolution and move details.

pub mod action;
pub mod api;
pub mod catalog;
pub mod effect;
pub mod evolution;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod ui;
