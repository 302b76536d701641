//! Chao Phraya river and weather change-notification service.
//!
//! Polls three environmental sources — the HII dam-discharge chart page,
//! the Singburi telemetry water-level table, and the OpenWeatherMap
//! forecast API — decides whether each observation meaningfully changed
//! since the previous run, pushes a LINE message when it did, and records
//! the new baseline for the next invocation. Designed to be run
//! periodically by an external scheduler; every invocation is single-shot
//! and single-threaded.

pub mod config;
pub mod decision;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod state;
pub mod stations;
