// Match scoring: candidate profile vs job posting.
// Pure and synchronous. Storage lookups live in crate::recommendations.

pub mod experience;
pub mod scorer;
pub mod skills;
