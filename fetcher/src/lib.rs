//! Cancellable data fetching for the GitLab and Spotify views.
//!
//! [`Fetcher`] tracks `{ result, error, is_loading }` for one key at a time
//! and discards outcomes of attempts that a newer key has superseded. The
//! [`sources`] module holds the producers each view plugs into it.

pub mod auth;
pub mod config;
mod error;
mod fetcher;
mod generation;
mod key;
pub mod notify;
mod poll;
pub mod sources;
mod state;
pub mod telemetry;

pub use auth::{Authorizer, Guard, NoAuth, Session};
pub use config::Config;
pub use error::{AuthError, FetchError};
pub use fetcher::{Fetcher, Settlement};
pub use generation::{Generation, GenerationCounter, Ticket};
pub use key::FetchKey;
pub use notify::{Notification, NotificationStyle, Notifier, TracingNotifier};
pub use poll::PollTicks;
pub use state::FetchState;
