pub mod access;
pub mod handlers;
