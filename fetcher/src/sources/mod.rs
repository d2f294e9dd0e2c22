//! Producers for each view, one module per service.
//!
//! A producer is what a view hands to [`crate::Fetcher::run`]: an async
//! function from the key to a typed result. Clients and sessions are passed
//! in explicitly; nothing here holds global state.

pub mod gitlab;
pub mod spotify;
