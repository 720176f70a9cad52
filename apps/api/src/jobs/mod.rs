// Job postings, applications and bookmarks.

pub mod applications;
pub mod handlers;
pub mod saved;
