//! Core datachat library (session state, controller, backend client, config).

pub mod attachment;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod inflight;
pub mod session;
