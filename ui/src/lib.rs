//! Yew bindings for [`fetcher`]: one cancellable fetcher per component,
//! re-rendering the component whenever its state changes.

pub mod contexts;
pub mod hooks;
mod logs;

pub use logs::init_logging;
