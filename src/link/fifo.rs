//! Word FIFO between the control core and the network core.
//!
//! Two bounded `embassy-sync` channels, one per direction, mirror the
//! pair of hardware mailboxes on a dual-core MCU.  Each side gets a
//! [`FifoEnd`] that pushes into one channel and pops from the other, so
//! ordering holds per direction only.
//!
//! ```text
//! ┌──────────────┐   to_network   ┌──────────────┐
//! │ Control core │──────────────▶│ Network core │
//! │              │◀──────────────│              │
//! └──────────────┘   to_control   └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

/// Slots per direction (the RP2040 SIO mailbox is 8 deep).
pub const FIFO_DEPTH: usize = 8;

/// One side's view of the channel.
pub trait FifoPort {
    /// Push a word if there is room, handing it back otherwise.
    fn try_push(&self, word: u32) -> Result<(), u32>;

    /// Push a word, spinning until the peer has made room.
    fn push_blocking(&self, word: u32) {
        let mut word = word;
        while let Err(back) = self.try_push(word) {
            word = back;
            core::hint::spin_loop();
        }
    }

    /// Pop the oldest pending word, if any.  Never blocks.
    fn try_pop(&self) -> Option<u32>;
}

pub struct InterCoreFifo<const N: usize = FIFO_DEPTH> {
    to_network: Channel<CriticalSectionRawMutex, u32, N>,
    to_control: Channel<CriticalSectionRawMutex, u32, N>,
}

impl<const N: usize> Default for InterCoreFifo<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> InterCoreFifo<N> {
    pub const fn new() -> Self {
        Self {
            to_network: Channel::new(),
            to_control: Channel::new(),
        }
    }

    /// Endpoint for the control core.
    pub fn control_end(&self) -> FifoEnd<'_, N> {
        FifoEnd {
            tx: &self.to_network,
            rx: &self.to_control,
        }
    }

    /// Endpoint for the network core.
    pub fn network_end(&self) -> FifoEnd<'_, N> {
        FifoEnd {
            tx: &self.to_control,
            rx: &self.to_network,
        }
    }
}

#[derive(Clone, Copy)]
pub struct FifoEnd<'a, const N: usize = FIFO_DEPTH> {
    tx: &'a Channel<CriticalSectionRawMutex, u32, N>,
    rx: &'a Channel<CriticalSectionRawMutex, u32, N>,
}

impl<const N: usize> FifoEnd<'_, N> {
    /// Words waiting to be popped on this side.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl<const N: usize> FifoPort for FifoEnd<'_, N> {
    fn try_push(&self, word: u32) -> Result<(), u32> {
        self.tx.try_send(word).map_err(|TrySendError::Full(back)| back)
    }

    fn try_pop(&self) -> Option<u32> {
        self.rx.try_receive().ok()
    }
}

impl<P: FifoPort + ?Sized> FifoPort for &P {
    fn try_push(&self, word: u32) -> Result<(), u32> {
        (**self).try_push(word)
    }

    fn push_blocking(&self, word: u32) {
        (**self).push_blocking(word);
    }

    fn try_pop(&self) -> Option<u32> {
        (**self).try_pop()
    }
}
