//! Typed views over ComfyUI status payloads.
//!
//! The status routes are read as raw JSON so that anything the server
//! returns can be shown verbatim. These readers pick out the fields we
//! know how to summarise and return `None` for any other shape.

use serde::Deserialize;

/// Step-level progress of the node currently executing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressSnapshot {
    /// Current step number.
    pub value: i64,
    /// Total number of steps.
    pub max: i64,
    /// The node reporting progress, if the server includes it.
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub prompt_id: Option<String>,
}

impl ProgressSnapshot {
    /// Read a progress payload. Returns `None` unless it carries
    /// integer `value` and `max` fields.
    pub fn from_value(payload: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }
}

/// Number of running and pending prompts in the execution queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    running: usize,
    pending: usize,
}

/// Accepted queue shapes: ComfyUI's own item lists, or the plain counts
/// some proxies reduce them to.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQueue {
    Lists {
        queue_running: Vec<serde_json::Value>,
        queue_pending: Vec<serde_json::Value>,
    },
    Counts {
        queue_running: usize,
        queue_pending: usize,
    },
}

impl QueueSnapshot {
    pub fn new(running: usize, pending: usize) -> Self {
        Self { running, pending }
    }

    /// Read a queue payload. Returns `None` for unrecognised shapes.
    pub fn from_value(payload: &serde_json::Value) -> Option<Self> {
        let raw: RawQueue = serde_json::from_value(payload.clone()).ok()?;
        Some(match raw {
            RawQueue::Lists {
                queue_running,
                queue_pending,
            } => Self::new(queue_running.len(), queue_pending.len()),
            RawQueue::Counts {
                queue_running,
                queue_pending,
            } => Self::new(queue_running, queue_pending),
        })
    }

    /// Prompts currently executing.
    pub fn running(&self) -> usize {
        self.running
    }

    /// Prompts waiting to execute.
    pub fn pending(&self) -> usize {
        self.pending
    }
}
