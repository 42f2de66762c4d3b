//! The presentation side: local collection state and the HTTP client that keeps it in
//! step with the API.

pub mod client;
pub mod state;
