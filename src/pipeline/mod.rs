pub mod catalog;
pub mod lyrics;
pub mod notes;
pub mod persistence;
pub mod song;
pub mod tempo;
