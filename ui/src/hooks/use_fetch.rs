use fetcher::{FetchError, FetchKey, FetchState, Fetcher, Guard};
use futures::future::LocalBoxFuture;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

use crate::contexts::toast::{ToastContext, ToastHandle};

pub type FetchHookReturn<T> = FetchState<T>;

/// Cancellable fetch hook.
///
/// Fetches whenever `key` changes by value. An attempt started for an older
/// key never writes its outcome, so a slow response can't replace the result
/// of a newer one. An absent or unfetchable key leaves the state idle.
///
/// `guard` runs before every attempt; authorization failures go to the
/// nearest [`ToastProvider`](crate::contexts::toast::ToastProvider), or to
/// the log when there is none.
///
/// # Example
///
/// ```rust
/// #[hook]
/// pub fn use_branches(
///     client: Rc<GitlabClient>,
///     project_id: ProjectId,
/// ) -> FetchHookReturn<Vec<Branch>> {
///     use_fetch(Some(project_id), Rc::new(NoAuth), move |id| async move {
///         Ok(client.project_branches(id).await?)
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<K, T, G, P, Fut>(
    key: Option<K>,
    guard: Rc<G>,
    producer: P,
) -> FetchHookReturn<T>
where
    K: FetchKey,
    T: Clone + 'static,
    G: Guard + 'static,
    P: FnOnce(K) -> Fut + 'static,
    Fut: Future<Output = Result<T, FetchError>> + 'static,
{
    let update = use_force_update();
    let toasts = use_context::<ToastContext>();
    let fetcher = use_memo((), move |_| {
        let fetcher = Fetcher::<K, T>::new()
            .with_listener(move |_| update.force_update());
        match toasts {
            Some(context) => fetcher.with_notifier(ToastHandle::new(context)),
            None => fetcher,
        }
    });

    {
        let fetcher = fetcher.clone();
        use_effect_with((), move |_| move || fetcher.unmount());
    }

    {
        let fetcher = fetcher.clone();
        use_effect_with(key, move |key| {
            start_on_key_change(
                &fetcher,
                key.clone(),
                guard,
                producer,
                yew::platform::spawn_local,
            );
        });
    }

    fetcher.state()
}

/// Point `fetcher` at `key` and hand the attempt, if the key calls for one,
/// to `spawn`. Returns whether an attempt was started.
fn start_on_key_change<K, T, G, P, Fut>(
    fetcher: &Fetcher<K, T>,
    key: Option<K>,
    guard: Rc<G>,
    producer: P,
    spawn: impl FnOnce(LocalBoxFuture<'static, ()>),
) -> bool
where
    K: FetchKey,
    T: Clone + 'static,
    G: Guard + 'static,
    P: FnOnce(K) -> Fut + 'static,
    Fut: Future<Output = Result<T, FetchError>> + 'static,
{
    let Some(ticket) = fetcher.set_key(key) else {
        return false;
    };
    let fetcher = fetcher.clone();
    spawn(Box::pin(async move {
        fetcher.run(ticket, &*guard, producer).await;
    }));
    true
}
