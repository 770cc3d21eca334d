//! Application layer.
//!
//! Orchestrates the domain through its ports. [`engine::RoscaEngine`] is
//! the only entry point; interfaces and binaries talk to it, never to the
//! stores directly.

pub mod engine;
