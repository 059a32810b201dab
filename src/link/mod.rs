//! Control-core ⇄ network-core message link.

pub mod fifo;
pub mod protocol;

pub use fifo::{FIFO_DEPTH, FifoEnd, FifoPort, InterCoreFifo};
pub use protocol::{ChannelMessage, LinkStatus, MessageKind};
