//! Change-detection and notification-decision engine.
//!
//! Each pipeline's rule is a pure function of (new observation, prior
//! persisted state, configuration) returning whether to notify, the facts
//! a notification would render, and the state to persist for the next
//! invocation. No I/O happens here — fetch failures never reach these
//! functions, and the caller owns reading and writing the state store.
//!
//! Submodules:
//! - `discharge` — exact-change detection over an opaque summary string.
//! - `gauge` — absolute numeric-delta threshold over the water level.
//! - `forecast` — sliding-window confidence run with reset-on-break.

pub mod discharge;
pub mod forecast;
pub mod gauge;
