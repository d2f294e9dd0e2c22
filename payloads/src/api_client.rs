//! Seams to the external services.
//!
//! The GitLab and Spotify REST clients and the desktop player bridge live
//! outside this workspace; they plug in by implementing these traits. All of
//! them are single-threaded, so the returned futures carry no `Send` bound.

use crate::{AccessToken, ProjectId, SpotifyId, requests, responses};
use reqwest::StatusCode;
use std::future::Future;

pub trait GitlabApi {
    /// Projects the current user is a member of.
    fn user_projects(
        &self,
    ) -> impl Future<Output = Result<Vec<responses::Project>, ClientError>>;

    fn project_members(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<responses::User>, ClientError>>;

    fn project_labels(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<responses::Label>, ClientError>>;

    fn project_milestones(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<responses::Milestone>, ClientError>>;

    fn project_branches(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<responses::Branch>, ClientError>>;

    fn create_merge_request(
        &self,
        details: &requests::CreateMergeRequest,
    ) -> impl Future<Output = Result<responses::MergeRequest, ClientError>>;
}

/// Spotify Web API calls. Every call receives the token explicitly so the
/// client holds no session state of its own.
pub trait SpotifyApi {
    fn search_artists(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<responses::ArtistSearch, ClientError>>;

    fn search_albums(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<responses::AlbumSearch, ClientError>>;

    fn search_tracks(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<responses::TrackSearch, ClientError>>;

    fn search_playlists(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<responses::PlaylistSearch, ClientError>>;

    fn artist_albums(
        &self,
        token: &AccessToken,
        artist_id: &SpotifyId,
        limit: u32,
    ) -> impl Future<
        Output = Result<responses::Paging<responses::Album>, ClientError>,
    >;

    fn album_tracks(
        &self,
        token: &AccessToken,
        album_id: &SpotifyId,
        limit: u32,
    ) -> impl Future<
        Output = Result<responses::Paging<responses::Track>, ClientError>,
    >;

    fn save_tracks(
        &self,
        token: &AccessToken,
        track_ids: &[SpotifyId],
    ) -> impl Future<Output = Result<(), ClientError>>;

    fn recommendations(
        &self,
        token: &AccessToken,
        seed_track: &SpotifyId,
    ) -> impl Future<Output = Result<responses::Recommendations, ClientError>>;

    fn play(
        &self,
        token: &AccessToken,
        uris: &[String],
    ) -> impl Future<Output = Result<(), ClientError>>;
}

/// Local bridge to the desktop player (a scripting helper on the host).
pub trait PlayerBridge {
    fn is_installed(&self) -> impl Future<Output = bool>;

    /// Raw script output: either a JSON track object or
    /// [`responses::NowPlaying::NOT_PLAYING`].
    fn current_track(
        &self,
    ) -> impl Future<Output = Result<String, ClientError>>;

    /// Raw player state string such as `playing`.
    fn player_state(
        &self,
    ) -> impl Future<Output = Result<String, ClientError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    /// The player bridge script failed.
    #[error("{0}")]
    Script(String),
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(e) => e.status(),
            Self::Script(_) | Self::Decode(_) => None,
        }
    }
}
