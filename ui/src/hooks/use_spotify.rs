use fetcher::{Authorizer, Session, sources::spotify};
use payloads::{
    SpotifyApi, SpotifyId,
    responses::{
        Album, AlbumSearch, ArtistSearch, Paging, PlaylistSearch, Track,
        TrackSearch,
    },
};
use std::rc::Rc;
use yew::prelude::*;

use super::{FetchHookReturn, use_fetch};

/// The shared session and Web API client every Spotify view fetches with.
pub struct SpotifyClients<A, S> {
    pub session: Rc<Session<A>>,
    pub api: Rc<S>,
}

impl<A, S> Clone for SpotifyClients<A, S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            api: self.api.clone(),
        }
    }
}

impl<A, S> SpotifyClients<A, S> {
    pub fn new(session: Rc<Session<A>>, api: Rc<S>) -> Self {
        Self { session, api }
    }
}

#[hook]
pub fn use_artist_search<A, S>(
    clients: SpotifyClients<A, S>,
    query: String,
    limit: u32,
) -> FetchHookReturn<ArtistSearch>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(Some(query), session.clone(), move |query| async move {
        spotify::search_artists(&session, &*api, query, limit).await
    })
}

#[hook]
pub fn use_album_search<A, S>(
    clients: SpotifyClients<A, S>,
    query: String,
    limit: u32,
) -> FetchHookReturn<AlbumSearch>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(Some(query), session.clone(), move |query| async move {
        spotify::search_albums(&session, &*api, query, limit).await
    })
}

#[hook]
pub fn use_track_search<A, S>(
    clients: SpotifyClients<A, S>,
    query: String,
    limit: u32,
) -> FetchHookReturn<TrackSearch>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(Some(query), session.clone(), move |query| async move {
        spotify::search_tracks(&session, &*api, query, limit).await
    })
}

#[hook]
pub fn use_playlist_search<A, S>(
    clients: SpotifyClients<A, S>,
    query: String,
    limit: u32,
) -> FetchHookReturn<PlaylistSearch>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(Some(query), session.clone(), move |query| async move {
        spotify::search_playlists(&session, &*api, query, limit).await
    })
}

/// Albums of the artist picked from the search results.
#[hook]
pub fn use_artist_albums<A, S>(
    clients: SpotifyClients<A, S>,
    artist_id: Option<SpotifyId>,
    limit: u32,
) -> FetchHookReturn<Paging<Album>>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(artist_id, session.clone(), move |artist_id| async move {
        spotify::artist_albums(&session, &*api, artist_id, limit).await
    })
}

#[hook]
pub fn use_album_tracks<A, S>(
    clients: SpotifyClients<A, S>,
    album_id: Option<SpotifyId>,
    limit: u32,
) -> FetchHookReturn<Paging<Track>>
where
    A: Authorizer + 'static,
    S: SpotifyApi + 'static,
{
    let SpotifyClients { session, api } = clients;
    use_fetch(album_id, session.clone(), move |album_id| async move {
        spotify::album_tracks(&session, &*api, album_id, limit).await
    })
}
