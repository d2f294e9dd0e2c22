pub mod mock;

use fetcher::{
    Config, FetchKey, FetchState, Fetcher, Notification, Notifier, telemetry,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use mock::{MockAuthorizer, MockGitlab, MockPlayer, MockSpotify};

/// Route fetcher logs to stderr for the current test binary. Safe to call
/// from every test.
pub fn init_tracing() {
    let config = Config {
        log_filter: "error".into(),
        ..Config::default()
    };
    let subscriber = telemetry::get_subscriber(&config);
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}

/// Collects every notification it receives. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.log.borrow_mut().push(notification);
    }
}

/// Every state a fetcher emitted, in order.
#[derive(Clone)]
pub struct Transitions<T> {
    log: Rc<RefCell<Vec<FetchState<T>>>>,
}

impl<T: Clone + 'static> Transitions<T> {
    /// Start recording the states `fetcher` emits.
    pub fn record<K: FetchKey>(fetcher: &Fetcher<K, T>) -> Self {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        fetcher.set_listener(move |state: &FetchState<T>| {
            sink.borrow_mut().push(state.clone())
        });
        Self { log }
    }

    pub fn states(&self) -> Vec<FetchState<T>> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// The loading flag of each emitted state.
    pub fn loading_flags(&self) -> Vec<bool> {
        self.log.borrow().iter().map(|s| s.is_loading).collect()
    }

    /// How many times loading went from true to false.
    pub fn loading_completions(&self) -> usize {
        let mut previous = false;
        let mut completions = 0;
        for loading in self.loading_flags() {
            if previous && !loading {
                completions += 1;
            }
            previous = loading;
        }
        completions
    }
}
