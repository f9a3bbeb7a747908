pub mod brackets;
pub mod phonetic;
pub mod syllables;
pub mod tokenize;
