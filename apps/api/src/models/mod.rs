pub mod application;
pub mod job;
pub mod profile;
pub mod recommendation;
pub mod user;
