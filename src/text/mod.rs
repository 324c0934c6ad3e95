pub mod ability_words;
pub mod classify;
pub mod segment;
