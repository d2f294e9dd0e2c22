use fetcher::sources::gitlab;
use fetcher::{FetchError, Fetcher, NoAuth, Settlement};
use payloads::ProjectId;
use payloads::responses::ProjectInfo;
use std::cell::Cell;
use std::time::Duration;
use test_helpers::{MockGitlab, Transitions, init_tracing, mock};
use tokio::time::sleep;

use crate::branch_names;

fn two_projects(slow: u64, fast: u64) -> MockGitlab {
    MockGitlab::new()
        .with_project(
            mock::project(42, "api"),
            mock::project_info(&["main", "dev"]),
        )
        .with_project(
            mock::project(43, "web"),
            mock::project_info(&["main", "release"]),
        )
        .with_delay(42, Duration::from_millis(slow))
        .with_delay(43, Duration::from_millis(fast))
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_one() -> anyhow::Result<()>
{
    init_tracing();
    let client = two_projects(200, 50);
    let fetcher = Fetcher::<ProjectId, ProjectInfo>::new();
    let transitions = Transitions::record(&fetcher);

    let first = async {
        let ticket = fetcher.set_key(Some(ProjectId(42))).expect("new key");
        fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await
    };
    let second = async {
        sleep(Duration::from_millis(10)).await;
        let ticket = fetcher.set_key(Some(ProjectId(43))).expect("new key");
        let settlement = fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await;
        // 43 is shown while 42 is still in flight
        assert_eq!(branch_names(&fetcher.state()), ["main", "release"]);
        settlement
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, Settlement::Superseded);
    assert_eq!(second, Settlement::Applied);
    let state = fetcher.state();
    assert_eq!(branch_names(&state), ["main", "release"]);
    assert!(!state.is_loading);
    // 42 settling late did not emit anything
    assert_eq!(transitions.loading_flags(), [true, true, false]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn in_order_responses_keep_the_latest() -> anyhow::Result<()> {
    let client = two_projects(20, 50);
    let fetcher = Fetcher::<ProjectId, ProjectInfo>::new();

    let first = async {
        let ticket = fetcher.set_key(Some(ProjectId(42))).expect("new key");
        fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await
    };
    let second = async {
        sleep(Duration::from_millis(10)).await;
        let ticket = fetcher.set_key(Some(ProjectId(43))).expect("new key");
        fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await
    };
    let (first, second) = tokio::join!(first, second);

    // 42 would have settled at 20ms, but 43 took over at 10ms
    assert_eq!(first, Settlement::Superseded);
    assert_eq!(second, Settlement::Applied);
    assert_eq!(branch_names(&fetcher.state()), ["main", "release"]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stale_failure_does_not_set_error() -> anyhow::Result<()> {
    let client = two_projects(200, 50).failing(42, "gateway timeout");
    let fetcher = Fetcher::<ProjectId, ProjectInfo>::new();

    let first = async {
        let ticket = fetcher.set_key(Some(ProjectId(42))).expect("new key");
        fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await
    };
    let second = async {
        sleep(Duration::from_millis(10)).await;
        let ticket = fetcher.set_key(Some(ProjectId(43))).expect("new key");
        fetcher
            .run(ticket, &NoAuth, |id| gitlab::project_info(&client, id))
            .await
    };
    let (first, _) = tokio::join!(first, second);

    assert_eq!(first, Settlement::Superseded);
    let state = fetcher.state();
    assert_eq!(state.error, None);
    assert_eq!(branch_names(&state), ["main", "release"]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn keys_changed_before_attempts_run_only_fetch_the_last()
-> anyhow::Result<()> {
    let fetcher = Fetcher::<String, String>::new();
    let calls = Cell::new(0);
    let producer = |query: String| {
        calls.set(calls.get() + 1);
        async move { Ok::<_, FetchError>(format!("results for {query}")) }
    };

    let tickets: Vec<_> = ["r", "ru", "rus", "rust"]
        .into_iter()
        .filter_map(|query| fetcher.set_key(Some(query.into())))
        .collect();
    assert_eq!(tickets.len(), 4);

    let mut settlements = Vec::new();
    for ticket in tickets {
        settlements.push(fetcher.run(ticket, &NoAuth, producer).await);
    }

    assert_eq!(
        settlements,
        [
            Settlement::Superseded,
            Settlement::Superseded,
            Settlement::Superseded,
            Settlement::Applied
        ]
    );
    assert_eq!(calls.get(), 1);
    assert_eq!(fetcher.state().result.as_deref(), Some("results for rust"));

    Ok(())
}
