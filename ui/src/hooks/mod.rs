pub mod use_fetch;
pub mod use_gitlab;
pub mod use_now_playing;
pub mod use_spotify;

pub use use_fetch::{FetchHookReturn, use_fetch};
pub use use_gitlab::{use_project_info, use_user_projects};
pub use use_now_playing::use_now_playing;
pub use use_spotify::{
    SpotifyClients, use_album_search, use_album_tracks, use_artist_albums,
    use_artist_search, use_playlist_search, use_track_search,
};
