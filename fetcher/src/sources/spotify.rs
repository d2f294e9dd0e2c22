//! Spotify player: searches, album and artist listings, the desktop player.
//!
//! Web API producers read the token from the shared [`Session`]. They are
//! meant to run behind a fetcher guarded by that same session, which has
//! refreshed the token just before.

use payloads::{
    ClientError, PlayerBridge, SpotifyApi, SpotifyId,
    responses::{
        Album, AlbumSearch, ArtistSearch, CurrentlyPlayingTrack, NowPlaying,
        Paging, PlayerState, PlaylistSearch, Track, TrackSearch,
    },
};

use crate::{
    Authorizer, FetchError, Notification, Notifier, Session,
    telemetry::log_error,
};

pub async fn search_artists<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    query: String,
    limit: u32,
) -> Result<ArtistSearch, FetchError> {
    let token = session.require_token()?;
    Ok(api.search_artists(&token, &query, limit).await?)
}

pub async fn search_albums<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    query: String,
    limit: u32,
) -> Result<AlbumSearch, FetchError> {
    let token = session.require_token()?;
    Ok(api.search_albums(&token, &query, limit).await?)
}

pub async fn search_tracks<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    query: String,
    limit: u32,
) -> Result<TrackSearch, FetchError> {
    let token = session.require_token()?;
    Ok(api.search_tracks(&token, &query, limit).await?)
}

pub async fn search_playlists<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    query: String,
    limit: u32,
) -> Result<PlaylistSearch, FetchError> {
    let token = session.require_token()?;
    Ok(api.search_playlists(&token, &query, limit).await?)
}

pub async fn artist_albums<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    artist_id: SpotifyId,
    limit: u32,
) -> Result<Paging<Album>, FetchError> {
    let token = session.require_token()?;
    Ok(api.artist_albums(&token, &artist_id, limit).await?)
}

pub async fn album_tracks<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    album_id: SpotifyId,
    limit: u32,
) -> Result<Paging<Track>, FetchError> {
    let token = session.require_token()?;
    Ok(api.album_tracks(&token, &album_id, limit).await?)
}

/// What the desktop player is playing (or paused on).
pub async fn now_playing<B: PlayerBridge>(
    bridge: &B,
) -> Result<NowPlaying, FetchError> {
    if !bridge.is_installed().await {
        return Err(FetchError::Unavailable(
            "Check if you have Spotify app installed on your Mac".into(),
        ));
    }
    let raw = bridge.current_track().await?;
    NowPlaying::parse(&raw).map_err(|e| ClientError::from(e).into())
}

/// Never fails: a player that cannot be asked counts as stopped.
pub async fn player_state<B: PlayerBridge>(bridge: &B) -> PlayerState {
    match bridge.player_state().await {
        Ok(raw) => PlayerState::parse(&raw),
        Err(e) => {
            tracing::debug!("player state unavailable: {e}");
            PlayerState::Stopped
        }
    }
}

/// Save the track the desktop player is on to the user's library.
pub async fn like_current_track<A, S, B>(
    session: &Session<A>,
    api: &S,
    bridge: &B,
) -> Result<CurrentlyPlayingTrack, FetchError>
where
    A: Authorizer,
    S: SpotifyApi,
    B: PlayerBridge,
{
    if !bridge.is_installed().await {
        return Err(FetchError::Unavailable(
            "You don't have Spotify Installed".into(),
        ));
    }
    let token = session.authorize().await?;
    let track = match now_playing(bridge).await {
        Ok(NowPlaying::Track(track)) if !track.id.is_empty() => Some(track),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("could not read the playing track: {e}");
            None
        }
    };
    let Some(track) = track else {
        return Err(FetchError::NotFound(
            "Playing song hasn't been found".into(),
        ));
    };
    let track_id = SpotifyId::from_track_uri(&track.id);
    api.save_tracks(&token, &[track_id]).await?;
    Ok(track)
}

/// Start playing tracks similar to `track_id`. Failures are reported to the
/// notifier; returns whether playback was started.
pub async fn play_similar<A, S, N>(
    session: &Session<A>,
    api: &S,
    notifier: &N,
    track_id: &SpotifyId,
) -> bool
where
    A: Authorizer,
    S: SpotifyApi,
    N: Notifier,
{
    match start_similar(session, api, track_id).await {
        Ok(()) => true,
        Err(e) => {
            notifier.notify(
                Notification::failure("Failed Playing Similar")
                    .with_message(e.to_string()),
            );
            log_error(e);
            false
        }
    }
}

async fn start_similar<A: Authorizer, S: SpotifyApi>(
    session: &Session<A>,
    api: &S,
    track_id: &SpotifyId,
) -> Result<(), FetchError> {
    let token = session.authorize().await?;
    let recommendations = api.recommendations(&token, track_id).await?;
    let uris: Vec<String> = recommendations
        .tracks
        .into_iter()
        .map(|track| track.uri)
        .collect();
    if uris.is_empty() {
        return Err(FetchError::NotFound("No similar tracks found".into()));
    }
    api.play(&token, &uris).await?;
    Ok(())
}
