//! Rhyme-scheme detection and annotation for song lyrics.

pub mod config;
pub mod error;
pub mod language;
pub mod lines;
pub mod lookup;
pub mod rhyme;
pub mod session;
pub mod store;
pub mod types;

pub use language::syllables::count_syllables;
pub use language::tokenize::tokenize;
pub use rhyme::reconcile::reconcile_annotations;
pub use rhyme::scheme::{detect_rhyme_schemes, detect_rhyme_schemes_with};
