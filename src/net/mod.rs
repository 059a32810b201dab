//! Network-thread side: event composition, the bounded publish queue
//! and the paced worker that drains it.

pub mod messages;
pub mod queue;
pub mod task;
pub mod worker;

pub use queue::{Publication, PublishQueue, QUEUE_CAPACITY};
pub use worker::NetworkWorker;
