// Recommendation generation: scores active postings for a candidate and
// records the ones above threshold. Storage access goes through MatchStore.

pub mod generator;
pub mod handlers;
#[cfg(test)]
pub mod memory_store;
pub mod store;
