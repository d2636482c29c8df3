//! Outbound request scheduling.

mod request_queue;

pub use request_queue::{
    QueueConfig, QueueError, QueueState, QueueTicket, RequestQueue, DEFAULT_REQUEST_DELAY,
};
