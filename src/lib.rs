//! Song player for a buzzer + 2-row lcd + indicator light box.
//!
//! Songs live in a compiled-in [`pipeline::catalog::Catalog`] as parallel
//! per-note tracks. [`player::PlaybackEngine`] walks them note by note,
//! keeping the lyric display, the lights and the buzzer in step.

pub mod audio_api;
pub mod logger;
pub mod pipeline;
pub mod player;
pub mod shared;
