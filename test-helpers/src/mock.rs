//! Mock clients for fetcher tests.
//!
//! Each mock answers from canned data, waits a configurable latency on
//! tokio's clock (pause the clock for deterministic ordering) and can be
//! told to fail for a given key. Calls are counted so tests can assert that
//! nothing was sent.

use fetcher::{AuthError, Authorizer};
use payloads::{
    AccessToken, ClientError, GitlabApi, PlayerBridge, ProjectId, SpotifyApi,
    SpotifyId, requests,
    responses::{
        Album, AlbumSearch, Artist, ArtistRef, ArtistSearch, Branch, Label,
        MergeRequest, Milestone, NowPlaying, Paging, Playlist, PlaylistSearch,
        Project, ProjectInfo, Recommendations, Track, TrackSearch, User,
    },
};
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

/// Latency and failures keyed by the string form of a request key.
#[derive(Default)]
struct Script {
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    default_delay: Duration,
}

impl Script {
    async fn reply(&self, key: &str) -> Result<(), ClientError> {
        let delay = self.delays.get(key).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;
        match self.failures.get(key) {
            Some(message) => Err(ClientError::APIError(
                StatusCode::SERVICE_UNAVAILABLE,
                message.clone(),
            )),
            None => Ok(()),
        }
    }
}

pub fn branch(name: &str) -> Branch {
    Branch { name: name.into() }
}

pub fn project(id: u64, name: &str) -> Project {
    Project {
        id: ProjectId(id),
        name: name.into(),
        name_with_namespace: format!("group / {name}"),
        default_branch: Some("main".into()),
        web_url: Some(format!("https://gitlab.example.com/group/{name}")),
    }
}

/// Project details with the given branch names and one member, label and
/// milestone.
pub fn project_info(branches: &[&str]) -> ProjectInfo {
    ProjectInfo {
        members: vec![User {
            id: 1,
            username: "alice".into(),
            name: Some("Alice".into()),
            avatar_url: None,
        }],
        labels: vec![Label {
            name: "bug".into(),
            color: "#ff0000".into(),
        }],
        milestones: vec![Milestone {
            id: 3,
            title: "v1.0".into(),
        }],
        branches: branches.iter().map(|name| branch(name)).collect(),
    }
}

#[derive(Default)]
pub struct MockGitlab {
    projects: Vec<Project>,
    info: HashMap<ProjectId, ProjectInfo>,
    script: Script,
    info_requests: Cell<usize>,
    created: RefCell<Vec<requests::CreateMergeRequest>>,
}

impl MockGitlab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: Project, info: ProjectInfo) -> Self {
        self.info.insert(project.id, info);
        self.projects.push(project);
        self
    }

    /// Every request about `project_id` takes `delay`.
    pub fn with_delay(mut self, project_id: u64, delay: Duration) -> Self {
        self.script.delays.insert(project_id.to_string(), delay);
        self
    }

    /// Requests about `project_id` fail with `message`.
    pub fn failing(mut self, project_id: u64, message: &str) -> Self {
        self.script
            .failures
            .insert(project_id.to_string(), message.into());
        self
    }

    /// Number of project detail fetches started (counted on members).
    pub fn info_requests(&self) -> usize {
        self.info_requests.get()
    }

    pub fn created(&self) -> Vec<requests::CreateMergeRequest> {
        self.created.borrow().clone()
    }

    async fn info_part<T>(
        &self,
        project_id: ProjectId,
        part: impl FnOnce(&ProjectInfo) -> T,
    ) -> Result<T, ClientError> {
        self.script.reply(&project_id.to_string()).await?;
        self.info.get(&project_id).map(part).ok_or_else(|| {
            ClientError::APIError(
                StatusCode::NOT_FOUND,
                "404 Project Not Found".into(),
            )
        })
    }
}

impl GitlabApi for MockGitlab {
    async fn user_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.script.reply("projects").await?;
        Ok(self.projects.clone())
    }

    async fn project_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<User>, ClientError> {
        self.info_requests.set(self.info_requests.get() + 1);
        self.info_part(project_id, |info| info.members.clone()).await
    }

    async fn project_labels(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Label>, ClientError> {
        self.info_part(project_id, |info| info.labels.clone()).await
    }

    async fn project_milestones(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Milestone>, ClientError> {
        self.info_part(project_id, |info| info.milestones.clone()).await
    }

    async fn project_branches(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Branch>, ClientError> {
        self.info_part(project_id, |info| info.branches.clone()).await
    }

    async fn create_merge_request(
        &self,
        details: &requests::CreateMergeRequest,
    ) -> Result<MergeRequest, ClientError> {
        self.script.reply(&details.project_id.to_string()).await?;
        let mut created = self.created.borrow_mut();
        created.push(details.clone());
        Ok(MergeRequest {
            id: 100 + created.len() as u64,
            iid: created.len() as u64,
            title: details.title.clone(),
            web_url: None,
        })
    }
}

fn paging<T>(items: Vec<T>) -> Paging<T> {
    let total = items.len() as u32;
    Paging {
        items,
        total,
        limit: 50,
        offset: 0,
        next: None,
    }
}

pub fn track(id: &str, name: &str) -> Track {
    Track {
        id: id.into(),
        name: name.into(),
        uri: format!("spotify:track:{id}"),
        duration_ms: 180_000,
        artists: vec![ArtistRef {
            id: "artist".into(),
            name: "Band".into(),
        }],
    }
}

/// Answers every search with a single item named after the query, and every
/// listing with a single item named after the id.
#[derive(Default)]
pub struct MockSpotify {
    script: Script,
    requests: Cell<usize>,
    tokens_seen: RefCell<Vec<String>>,
    limits_seen: RefCell<Vec<u32>>,
    saved: RefCell<Vec<SpotifyId>>,
    played: RefCell<Vec<String>>,
    recommendations: Vec<Track>,
}

impl MockSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for `key` (a query or an id) take `delay`.
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.script.delays.insert(key.into(), delay);
        self
    }

    pub fn failing(mut self, key: &str, message: &str) -> Self {
        self.script.failures.insert(key.into(), message.into());
        self
    }

    pub fn with_recommendations(mut self, tracks: Vec<Track>) -> Self {
        self.recommendations = tracks;
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.borrow().clone()
    }

    pub fn limits_seen(&self) -> Vec<u32> {
        self.limits_seen.borrow().clone()
    }

    pub fn saved(&self) -> Vec<SpotifyId> {
        self.saved.borrow().clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.played.borrow().clone()
    }

    async fn answer(
        &self,
        token: &AccessToken,
        key: &str,
        limit: Option<u32>,
    ) -> Result<(), ClientError> {
        self.requests.set(self.requests.get() + 1);
        self.tokens_seen.borrow_mut().push(token.expose().to_string());
        if let Some(limit) = limit {
            self.limits_seen.borrow_mut().push(limit);
        }
        self.script.reply(key).await
    }
}

impl SpotifyApi for MockSpotify {
    async fn search_artists(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> Result<ArtistSearch, ClientError> {
        self.answer(token, query, Some(limit)).await?;
        Ok(ArtistSearch {
            artists: paging(vec![Artist {
                id: SpotifyId(format!("artist-{query}")),
                name: query.into(),
                uri: format!("spotify:artist:{query}"),
                genres: Vec::new(),
            }]),
        })
    }

    async fn search_albums(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> Result<AlbumSearch, ClientError> {
        self.answer(token, query, Some(limit)).await?;
        Ok(AlbumSearch {
            albums: paging(vec![Album {
                id: SpotifyId(format!("album-{query}")),
                name: query.into(),
                uri: format!("spotify:album:{query}"),
                artists: Vec::new(),
                release_date: None,
            }]),
        })
    }

    async fn search_tracks(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> Result<TrackSearch, ClientError> {
        self.answer(token, query, Some(limit)).await?;
        Ok(TrackSearch {
            tracks: paging(vec![track(&format!("track-{query}"), query)]),
        })
    }

    async fn search_playlists(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> Result<PlaylistSearch, ClientError> {
        self.answer(token, query, Some(limit)).await?;
        Ok(PlaylistSearch {
            playlists: paging(vec![Playlist {
                id: SpotifyId(format!("playlist-{query}")),
                name: query.into(),
                uri: format!("spotify:playlist:{query}"),
                description: None,
            }]),
        })
    }

    async fn artist_albums(
        &self,
        token: &AccessToken,
        artist_id: &SpotifyId,
        limit: u32,
    ) -> Result<Paging<Album>, ClientError> {
        self.answer(token, artist_id.as_str(), Some(limit)).await?;
        Ok(paging(vec![Album {
            id: SpotifyId(format!("album-of-{artist_id}")),
            name: format!("Album by {artist_id}"),
            uri: format!("spotify:album:album-of-{artist_id}"),
            artists: vec![ArtistRef {
                id: artist_id.clone(),
                name: artist_id.to_string(),
            }],
            release_date: Some("2020-01-01".into()),
        }]))
    }

    async fn album_tracks(
        &self,
        token: &AccessToken,
        album_id: &SpotifyId,
        limit: u32,
    ) -> Result<Paging<Track>, ClientError> {
        self.answer(token, album_id.as_str(), Some(limit)).await?;
        Ok(paging(vec![
            track(&format!("{album_id}-1"), "Opening"),
            track(&format!("{album_id}-2"), "Closing"),
        ]))
    }

    async fn save_tracks(
        &self,
        token: &AccessToken,
        track_ids: &[SpotifyId],
    ) -> Result<(), ClientError> {
        for id in track_ids {
            self.answer(token, id.as_str(), None).await?;
        }
        self.saved.borrow_mut().extend(track_ids.iter().cloned());
        Ok(())
    }

    async fn recommendations(
        &self,
        token: &AccessToken,
        seed_track: &SpotifyId,
    ) -> Result<Recommendations, ClientError> {
        self.answer(token, seed_track.as_str(), None).await?;
        Ok(Recommendations {
            tracks: self.recommendations.clone(),
        })
    }

    async fn play(
        &self,
        token: &AccessToken,
        uris: &[String],
    ) -> Result<(), ClientError> {
        self.answer(token, "play", None).await?;
        self.played.borrow_mut().extend(uris.iter().cloned());
        Ok(())
    }
}

/// Desktop player bridge returning canned script output.
pub struct MockPlayer {
    installed: bool,
    current_track: RefCell<Result<String, String>>,
    state: RefCell<Result<String, String>>,
    delay: Duration,
    queries: Cell<usize>,
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self {
            installed: true,
            current_track: RefCell::new(Ok(NowPlaying::NOT_PLAYING.into())),
            state: RefCell::new(Ok("stopped".into())),
            delay: Duration::ZERO,
            queries: Cell::new(0),
        }
    }
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_installed() -> Self {
        Self {
            installed: false,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make the player report `id`, `name` and `artist` as the current track
    /// and its state as `playing`.
    pub fn play(&self, id: &str, name: &str, artist: &str) {
        self.set_output(&format!(
            r#"{{ "id": "{id}", "name": "{name}", "artist": "{artist}"}}"#
        ));
        self.state.replace(Ok("playing".into()));
    }

    pub fn stop(&self) {
        self.set_output(NowPlaying::NOT_PLAYING);
        self.state.replace(Ok("stopped".into()));
    }

    /// Raw script output for the current track.
    pub fn set_output(&self, raw: &str) {
        self.current_track.replace(Ok(raw.into()));
    }

    /// Script invocations fail with `message`.
    pub fn break_script(&self, message: &str) {
        self.current_track.replace(Err(message.into()));
        self.state.replace(Err(message.into()));
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl PlayerBridge for MockPlayer {
    async fn is_installed(&self) -> bool {
        self.installed
    }

    async fn current_track(&self) -> Result<String, ClientError> {
        self.queries.set(self.queries.get() + 1);
        tokio::time::sleep(self.delay).await;
        self.current_track.borrow().clone().map_err(ClientError::Script)
    }

    async fn player_state(&self) -> Result<String, ClientError> {
        self.state.borrow().clone().map_err(ClientError::Script)
    }
}

/// OAuth flow stand-in handing out `token-1`, `token-2`, ... on each call.
#[derive(Default)]
pub struct MockAuthorizer {
    calls: Cell<usize>,
    delay: Duration,
    failure: RefCell<Option<AuthError>>,
    empty_token: Cell<bool>,
}

impl MockAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Subsequent calls fail with `message`.
    pub fn deny(&self, message: &str) {
        self.failure.replace(Some(AuthError::Failed(message.into())));
    }

    pub fn allow(&self) {
        self.failure.replace(None);
        self.empty_token.set(false);
    }

    /// Subsequent calls succeed but yield an empty token.
    pub fn hand_out_empty_tokens(&self) {
        self.empty_token.set(true);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Authorizer for MockAuthorizer {
    async fn authorize(&self) -> Result<AccessToken, AuthError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        tokio::time::sleep(self.delay).await;
        if let Some(e) = self.failure.borrow().clone() {
            return Err(e);
        }
        if self.empty_token.get() {
            return Ok(AccessToken::new(""));
        }
        Ok(AccessToken::new(format!("token-{call}")))
    }
}
