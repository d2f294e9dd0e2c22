mod ordering;
mod spotify;

use fetcher::sources::gitlab as gitlab_source;
use fetcher::{FetchState, Fetcher, NoAuth, Settlement};
use payloads::ProjectId;
use payloads::responses::ProjectInfo;
use std::time::Duration;
use test_helpers::{MockGitlab, init_tracing, mock};

fn branch_names(state: &FetchState<ProjectInfo>) -> Vec<String> {
    state
        .result
        .iter()
        .flat_map(|info| info.branches.iter().map(|b| b.name.clone()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn single_key_settles_with_result() -> anyhow::Result<()> {
    init_tracing();
    let client = MockGitlab::new()
        .with_project(
            mock::project(42, "api"),
            mock::project_info(&["main", "dev"]),
        )
        .with_delay(42, Duration::from_millis(100));
    let fetcher = Fetcher::<ProjectId, ProjectInfo>::new();
    let started = tokio::time::Instant::now();

    let settlement = fetcher
        .fetch(Some(ProjectId::parse_selection("42")), &NoAuth, |id| {
            gitlab_source::project_info(&client, id)
        })
        .await;

    assert_eq!(settlement, Some(Settlement::Applied));
    assert!(started.elapsed() >= Duration::from_millis(100));
    let state = fetcher.state();
    assert_eq!(branch_names(&state), ["main", "dev"]);
    assert_eq!(state.error, None);
    assert!(!state.is_loading);

    Ok(())
}
