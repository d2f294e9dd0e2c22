use fetcher::sources::spotify;
use fetcher::{FetchError, Fetcher, NoAuth, PollTicks, Session, Settlement};
use payloads::SpotifyId;
use payloads::responses::{
    Album, NowPlaying, Paging, PlayerState, PlaylistSearch, Track,
};
use std::rc::Rc;
use std::time::Duration;
use test_helpers::{
    MockAuthorizer, MockPlayer, MockSpotify, RecordingNotifier, init_tracing,
    mock,
};

#[tokio::test]
async fn playlist_search_uses_configured_limit() -> anyhow::Result<()> {
    init_tracing();
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new();
    let config = fetcher::Config {
        search_limit: 20,
        ..Default::default()
    };
    let playlists = Fetcher::<String, PlaylistSearch>::new();

    playlists
        .fetch(Some("focus".into()), &session, |query| {
            spotify::search_playlists(&session, &api, query, config.search_limit)
        })
        .await;

    let result = playlists.state().result.expect("playlists");
    assert_eq!(result.playlists.items[0].name, "focus");
    assert_eq!(api.limits_seen(), [20]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn artist_albums_follow_selected_artist() -> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new()
        .with_delay("artist-a", Duration::from_millis(200))
        .with_delay("artist-b", Duration::from_millis(20));
    let albums = Fetcher::<SpotifyId, Paging<Album>>::new();

    let (first, second) = tokio::join!(
        albums.fetch(Some("artist-a".into()), &session, |id| {
            spotify::artist_albums(&session, &api, id, 50)
        }),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            albums
                .fetch(Some("artist-b".into()), &session, |id| {
                    spotify::artist_albums(&session, &api, id, 50)
                })
                .await
        },
    );

    assert_eq!(first, Some(Settlement::Superseded));
    assert_eq!(second, Some(Settlement::Applied));
    let page = albums.state().result.expect("albums");
    assert_eq!(page.items[0].name, "Album by artist-b");

    Ok(())
}

#[tokio::test]
async fn album_tracks_listing() -> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new();
    let tracks = Fetcher::<SpotifyId, Paging<Track>>::new();

    let skipped = tracks
        .fetch(Some(SpotifyId::from("")), &session, |id| {
            spotify::album_tracks(&session, &api, id, 50)
        })
        .await;
    assert_eq!(skipped, None);

    tracks
        .fetch(Some("album-1".into()), &session, |id| {
            spotify::album_tracks(&session, &api, id, 50)
        })
        .await;

    let names: Vec<_> = tracks
        .state()
        .result
        .expect("tracks")
        .items
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Opening", "Closing"]);

    Ok(())
}

#[tokio::test]
async fn now_playing_poll_ticks() -> anyhow::Result<()> {
    let player = MockPlayer::new();
    let now_playing = Fetcher::<u64, NowPlaying>::new();

    player.play("spotify:track:abc", "Dancing Queen", "ABBA");
    now_playing
        .fetch(Some(1), &NoAuth, |_| spotify::now_playing(&player))
        .await;
    let state = now_playing.state();
    let track = state.result.as_ref().and_then(NowPlaying::track);
    assert_eq!(track.map(|t| t.name.as_str()), Some("Dancing Queen"));

    player.stop();
    now_playing
        .fetch(Some(2), &NoAuth, |_| spotify::now_playing(&player))
        .await;
    assert_eq!(now_playing.state().result, Some(NowPlaying::NotPlaying));

    // a broken script reports an error but keeps the last known answer
    player.break_script("Not authorized to send Apple events");
    now_playing
        .fetch(Some(3), &NoAuth, |_| spotify::now_playing(&player))
        .await;
    let state = now_playing.state();
    assert_eq!(state.result, Some(NowPlaying::NotPlaying));
    assert_eq!(
        state.error.as_deref(),
        Some("Not authorized to send Apple events")
    );
    assert_eq!(player.queries(), 3);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn player_slower_than_poll_interval_still_settles()
-> anyhow::Result<()> {
    let player =
        Rc::new(MockPlayer::new().with_delay(Duration::from_millis(1200)));
    player.play("spotify:track:abc", "Waterloo", "ABBA");
    let now_playing = Fetcher::<u64, NowPlaying>::new();
    let ticks = PollTicks::new();

    let start = |key: u64| {
        let fetcher = now_playing.clone();
        let player = player.clone();
        let ticks = ticks.clone();
        tokio::task::spawn_local(async move {
            fetcher
                .fetch(Some(key), &NoAuth, |_| {
                    ticks.track(spotify::now_playing(&*player))
                })
                .await;
        });
    };

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            start(ticks.key());
            for _ in 0..10 {
                tokio::time::sleep(Duration::from_millis(1000)).await;
                if let Some(key) = ticks.advance() {
                    start(key);
                }
            }
            tokio::time::sleep(Duration::from_millis(1300)).await;
        })
        .await;

    let state = now_playing.state();
    assert!(!state.is_loading);
    let track = state.result.as_ref().and_then(NowPlaying::track);
    assert_eq!(track.map(|t| t.name.as_str()), Some("Waterloo"));
    // every other tick is skipped while the script is still running
    assert_eq!(player.queries(), 6);

    Ok(())
}

#[tokio::test]
async fn now_playing_without_player() -> anyhow::Result<()> {
    let player = MockPlayer::not_installed();
    let now_playing = Fetcher::<u64, NowPlaying>::new();

    now_playing
        .fetch(Some(1), &NoAuth, |_| spotify::now_playing(&player))
        .await;

    assert_eq!(
        now_playing.state().error(),
        Some("Check if you have Spotify app installed on your Mac")
    );
    assert_eq!(player.queries(), 0);

    Ok(())
}

#[tokio::test]
async fn unreadable_script_output_is_an_error() -> anyhow::Result<()> {
    let player = MockPlayer::new();
    player.set_output("{ \"id\": broken");

    let err = spotify::now_playing(&player).await.unwrap_err();

    assert!(matches!(err, FetchError::Client(_)));
    assert!(err.to_string().starts_with("Unexpected response"));

    Ok(())
}

#[tokio::test]
async fn player_state_falls_back_to_stopped() -> anyhow::Result<()> {
    let player = MockPlayer::new();
    player.play("spotify:track:abc", "Song", "Band");
    assert_eq!(spotify::player_state(&player).await, PlayerState::Playing);

    player.break_script("Spotify got an error");
    assert_eq!(spotify::player_state(&player).await, PlayerState::Stopped);

    Ok(())
}

#[tokio::test]
async fn like_saves_the_playing_track() -> anyhow::Result<()> {
    let authorizer = Rc::new(MockAuthorizer::new());
    let session = Session::new(authorizer.clone());
    let api = MockSpotify::new();
    let player = MockPlayer::new();
    player.play("spotify:track:4uLU6hMCjMI75M1A2tKUQC", "Song", "Band");

    let liked = spotify::like_current_track(&session, &api, &player).await?;

    assert_eq!(liked.name, "Song");
    assert_eq!(api.saved(), [SpotifyId::from("4uLU6hMCjMI75M1A2tKUQC")]);
    assert_eq!(authorizer.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn like_needs_a_playing_track() -> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new();
    let player = MockPlayer::new();

    let err = spotify::like_current_track(&session, &api, &player)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Playing song hasn't been found");
    assert!(api.saved().is_empty());

    Ok(())
}

#[tokio::test]
async fn like_with_unreadable_player_reports_missing_track()
-> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new();
    let player = MockPlayer::new();

    player.break_script("Not authorized to send Apple events");
    let err = spotify::like_current_track(&session, &api, &player)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
    assert_eq!(err.to_string(), "Playing song hasn't been found");

    player.set_output("{ \"id\": broken");
    let err = spotify::like_current_track(&session, &api, &player)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Playing song hasn't been found");
    assert!(api.saved().is_empty());

    Ok(())
}

#[tokio::test]
async fn like_needs_the_desktop_player() -> anyhow::Result<()> {
    let authorizer = Rc::new(MockAuthorizer::new());
    let session = Session::new(authorizer.clone());
    let api = MockSpotify::new();
    let player = MockPlayer::not_installed();

    let err = spotify::like_current_track(&session, &api, &player)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "You don't have Spotify Installed");
    assert_eq!(authorizer.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn play_similar_queues_recommendations() -> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new().with_recommendations(vec![
        mock::track("t1", "One"),
        mock::track("t2", "Two"),
    ]);
    let notifier = RecordingNotifier::default();

    let started = spotify::play_similar(
        &session,
        &api,
        &notifier,
        &SpotifyId::from("seed"),
    )
    .await;

    assert!(started);
    assert_eq!(api.played(), ["spotify:track:t1", "spotify:track:t2"]);
    assert!(notifier.notifications().is_empty());

    Ok(())
}

#[tokio::test]
async fn play_similar_failure_is_notified() -> anyhow::Result<()> {
    let session = Session::new(MockAuthorizer::new());
    let api = MockSpotify::new().failing("seed", "rate limited");
    let notifier = RecordingNotifier::default();

    let started = spotify::play_similar(
        &session,
        &api,
        &notifier,
        &SpotifyId::from("seed"),
    )
    .await;

    assert!(!started);
    let notifications = notifier.notifications();
    assert_eq!(notifications[0].title, "Failed Playing Similar");
    assert_eq!(notifications[0].message.as_deref(), Some("rate limited"));

    // no recommendations at all is reported too
    let api = MockSpotify::new();
    spotify::play_similar(&session, &api, &notifier, &SpotifyId::from("x"))
        .await;
    assert_eq!(
        notifier.notifications()[1].message.as_deref(),
        Some("No similar tracks found")
    );
    assert!(api.played().is_empty());

    Ok(())
}
