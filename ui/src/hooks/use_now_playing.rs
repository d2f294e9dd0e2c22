use fetcher::{NoAuth, PollTicks, sources::spotify};
use gloo_timers::callback::Interval;
use payloads::{PlayerBridge, responses::NowPlaying};
use std::rc::Rc;
use yew::prelude::*;

use super::{FetchHookReturn, use_fetch};

/// Polls the desktop player every `interval_ms`.
///
/// Each poll is a new key. A tick that arrives while the previous script run
/// is still going is skipped, so a player slower than the interval still
/// settles instead of being superseded forever.
#[hook]
pub fn use_now_playing<B>(
    bridge: Rc<B>,
    interval_ms: u32,
) -> FetchHookReturn<NowPlaying>
where
    B: PlayerBridge + 'static,
{
    let ticks = use_memo((), |_| PollTicks::new());
    let update = use_force_update();

    {
        let ticks = ticks.clone();
        use_effect_with(interval_ms, move |&interval_ms| {
            let interval = Interval::new(interval_ms, move || {
                if ticks.advance().is_some() {
                    update.force_update();
                }
            });
            // Dropping the interval cancels it
            move || drop(interval)
        });
    }

    let key = ticks.key();
    let ticks = (*ticks).clone();
    use_fetch(Some(key), Rc::new(NoAuth), move |_| async move {
        ticks.track(spotify::now_playing(&*bridge)).await
    })
}
