//! Data shapes exchanged with the GitLab and Spotify APIs and the local
//! player bridge, plus the client traits the fetch layer calls into.

pub mod api_client;
pub mod requests;
pub mod responses;

pub use api_client::{ClientError, GitlabApi, PlayerBridge, SpotifyApi};

use derive_more::Display;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Numeric GitLab project id. Zero means "no project selected".
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl ProjectId {
    /// Parse the string value of a project dropdown. Anything that is not a
    /// positive integer maps to the unselected id `0`.
    pub fn parse_selection(selection: &str) -> Self {
        Self(selection.trim().parse().unwrap_or(0))
    }

    pub fn is_selected(&self) -> bool {
        self.0 > 0
    }
}

/// Spotify object id (artist, album, track or playlist), without the
/// `spotify:<kind>:` uri prefix.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpotifyId(pub String);

impl SpotifyId {
    const TRACK_URI_PREFIX: &'static str = "spotify:track:";

    /// Accepts either a bare id or a `spotify:track:` uri.
    pub fn from_track_uri(uri: &str) -> Self {
        Self(
            uri.strip_prefix(Self::TRACK_URI_PREFIX)
                .unwrap_or(uri)
                .to_string(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SpotifyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// OAuth access token for the Spotify Web API.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}
