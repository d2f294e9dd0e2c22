use crate::{ProjectId, SpotifyId};
use serde::{Deserialize, Serialize};

// === GitLab ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub name_with_namespace: String,
    /// Empty or missing for repositories without any commits.
    pub default_branch: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    /// The full name when GitLab has one, the username otherwise.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color such as `#ff0000`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
}

/// Everything the merge request form needs about one project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub members: Vec<User>,
    pub labels: Vec<Label>,
    pub milestones: Vec<Milestone>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    pub web_url: Option<String>,
}

// === Spotify ===

/// A page of results as returned by the Spotify Web API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub next: Option<String>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit: 0,
            offset: 0,
            next: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: SpotifyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: SpotifyId,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: SpotifyId,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: SpotifyId,
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: SpotifyId,
    pub name: String,
    pub uri: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtistSearch {
    pub artists: Paging<Artist>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlbumSearch {
    pub albums: Paging<Album>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSearch {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistSearch {
    pub playlists: Paging<Playlist>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    pub tracks: Vec<Track>,
}

/// Track reported by the desktop player bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentlyPlayingTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

impl PlayerState {
    /// Unknown or missing states read as stopped.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

/// What the player bridge reports about the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NowPlaying {
    Track(CurrentlyPlayingTrack),
    NotPlaying,
}

impl NowPlaying {
    /// Sentinel the bridge script returns when nothing is playing.
    pub const NOT_PLAYING: &'static str = "Spotify Is Not Playing";

    /// Parse the raw output of the bridge script.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let raw = raw.trim();
        if raw == Self::NOT_PLAYING {
            return Ok(Self::NotPlaying);
        }
        Ok(Self::Track(serde_json::from_str(raw)?))
    }

    pub fn track(&self) -> Option<&CurrentlyPlayingTrack> {
        match self {
            Self::Track(track) => Some(track),
            Self::NotPlaying => None,
        }
    }
}
