//! Network-thread worker: channel decode, publish queue and paced drain.
//!
//! ```text
//!  FifoPort ──decode──▶ PublishQueue (drop-if-full) ──paced drain──▶ NetworkClient
//!  FifoPort ◀──ModeChange── parse ◀── NetworkClient::poll_command
//! ```
//!
//! An entry leaves the queue only when the client accepted it.  A failed
//! publish is retried after the next pacing gap.
//!
//! After association the worker never blocks on the channel.  Remote
//! mode requests wait in a small backlog and go out with `try_push`, and
//! inbound words are drained before each attempt, so a command burst
//! cannot wedge both cores against two full directions.

use core::time::Duration;

use heapless::Deque;
use log::{debug, info, warn};

use crate::app::ports::{ConnectivityPort, NetworkClient};
use crate::config::{DeviceId, LockConfig};
use crate::error::CommsError;
use crate::link::{ChannelMessage, FifoPort, LinkStatus, MessageKind};
use crate::sensors::CardColor;
use crate::timer::{Clock, Instant, Timer};

use super::messages::{parse_mode_command, payload_for, topic_for};
use super::queue::{Publication, PublishQueue};

/// Remote mode requests held while the control-bound direction is full.
/// Further commands stay with the client until a slot frees.
pub const COMMAND_BACKLOG: usize = 8;

pub struct NetworkWorker {
    device_id: DeviceId,
    queue: PublishQueue,
    commands: Deque<u16, COMMAND_BACKLOG>,
    /// Armed after every publish attempt; the next one waits for it.
    pacing: Timer,
    min_interval: Duration,
    connect_timeout: Duration,
    session_reported: bool,
}

impl NetworkWorker {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            queue: PublishQueue::new(),
            commands: Deque::new(),
            pacing: Timer::new(),
            min_interval: config.publish_min_interval(),
            connect_timeout: config.link_connect_timeout(),
            session_reported: false,
        }
    }

    pub fn queue(&self) -> &PublishQueue {
        &self.queue
    }

    pub fn session_reported(&self) -> bool {
        self.session_reported
    }

    /// Mode requests parsed but not yet handed to the control core.
    pub fn backlog(&self) -> usize {
        self.commands.len()
    }

    /// Associate and report the outcome to the control core.
    pub fn bootstrap<N, L>(&mut self, conn: &mut N, link: &L) -> Result<(), CommsError>
    where
        N: ConnectivityPort + ?Sized,
        L: FifoPort + ?Sized,
    {
        info!("network: associating (timeout {:?})", self.connect_timeout);
        match conn.connect(self.connect_timeout) {
            Ok(()) => {
                info!("network: link up");
                link.push_blocking(ChannelMessage::LinkEstablished(LinkStatus::Up).encode());
                Ok(())
            }
            Err(e) => {
                warn!("network: association failed: {}", e);
                link.push_blocking(ChannelMessage::LinkEstablished(LinkStatus::Failed).encode());
                Err(e)
            }
        }
    }

    /// One network-loop iteration.
    pub fn tick<N, L, C>(&mut self, client: &mut N, link: &L, clock: &C)
    where
        N: NetworkClient + ?Sized,
        L: FifoPort + ?Sized,
        C: Clock + ?Sized,
    {
        client.service();
        self.collect_inbound(link);
        self.report_session(client, link);
        self.collect_commands(client);
        self.forward_commands(link);
        self.drain(client, clock.now());
    }

    fn collect_inbound<L: FifoPort + ?Sized>(&mut self, link: &L) {
        while let Some(word) = link.try_pop() {
            self.accept_word(word);
        }
    }

    /// Send the broker-session word the first time the session is up.
    fn report_session<N, L>(&mut self, client: &N, link: &L)
    where
        N: NetworkClient + ?Sized,
        L: FifoPort + ?Sized,
    {
        if self.session_reported || !client.session_up() {
            return;
        }
        if link.try_push(ChannelMessage::BrokerSessionEstablished.encode()).is_ok() {
            info!("network: broker session established");
            self.session_reported = true;
        }
    }

    /// Pull remote commands into the backlog while it has room.
    fn collect_commands<N: NetworkClient + ?Sized>(&mut self, client: &mut N) {
        while !self.commands.is_full() {
            let Some(command) = client.poll_command() else {
                break;
            };
            match parse_mode_command(&command) {
                Some(ordinal) => {
                    info!("network: remote mode request {}", ordinal);
                    // room checked by the loop condition
                    let _ = self.commands.push_back(ordinal);
                }
                None => warn!("network: ignoring remote command {:?}", command.as_str()),
            }
        }
    }

    /// Hand backlog entries to the control core until its side is full.
    fn forward_commands<L: FifoPort + ?Sized>(&mut self, link: &L) {
        if !self.session_reported {
            return;
        }
        while let Some(&ordinal) = self.commands.front() {
            self.collect_inbound(link);
            if link.try_push(ChannelMessage::ModeChange { ordinal }.encode()).is_err() {
                debug!("network: control side full, {} commands held", self.commands.len());
                break;
            }
            self.commands.pop_front();
        }
    }

    /// Decode one word from the control core.
    pub fn accept_word(&mut self, word: u32) {
        match ChannelMessage::decode(word) {
            Ok(ChannelMessage::Publish { kind, color }) => {
                self.enqueue(kind, color);
            }
            Ok(other) => debug!("network core ignores {:?}", other),
            Err(e) => warn!("network: undecodable channel word {:#010x}: {}", word, e),
        }
    }

    /// Compose and queue an event.  `false` when the queue was full.
    pub fn enqueue(&mut self, kind: MessageKind, color: CardColor) -> bool {
        self.queue.enqueue(Publication {
            topic: topic_for(&self.device_id, kind),
            payload: payload_for(kind, color),
        })
    }

    /// Publish the oldest entry if the client is idle and the pacing gap
    /// has passed.  Returns `true` when an entry was published.
    pub fn drain<N: NetworkClient + ?Sized>(&mut self, client: &mut N, now: Instant) -> bool {
        if self.queue.is_empty() || !client.session_up() || client.is_publishing() {
            return false;
        }
        if self.pacing.is_armed() && !self.pacing.expired(now) {
            return false;
        }
        let Some(entry) = self.queue.front() else {
            return false;
        };

        let result = client.publish(&entry.topic, &entry.payload);
        self.pacing.start(now, self.min_interval);
        match result {
            Ok(()) => {
                debug!("published {} <- {}", entry.topic, entry.payload);
                self.queue.pop();
                true
            }
            Err(e) => {
                warn!("publish to {} failed: {}", entry.topic, e);
                false
            }
        }
    }
}
