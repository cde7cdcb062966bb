//! ComfyUI status client library.
//!
//! Provides an HTTP client for the progress and queue routes (direct or
//! through a gateway proxy), typed readers for their payloads, and the
//! text progress bar used to display generation steps.

pub mod api;
pub mod operations;
pub mod progress;
pub mod status;
