//! Simulated radio and pub/sub broker for the host bench.
//!
//! Association takes a fixed short time, the broker session comes up a
//! little later, and every publish keeps the client "in flight" for a
//! few milliseconds so the worker's pacing is exercised.  Published
//! events are logged.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use log::info;

use crate::app::ports::{CommandPayload, ConnectivityPort, NetworkClient};
use crate::error::CommsError;

const ASSOCIATION_TIME: Duration = Duration::from_millis(300);
const SESSION_DELAY: Duration = Duration::from_millis(500);
const IN_FLIGHT: Duration = Duration::from_millis(20);

pub struct SimBroker {
    commands: Receiver<CommandPayload>,
    fail_association: bool,
    connected_at: Option<Instant>,
    in_flight_until: Option<Instant>,
    published: u32,
}

impl SimBroker {
    pub fn new(commands: Receiver<CommandPayload>) -> Self {
        Self {
            commands,
            fail_association: false,
            connected_at: None,
            in_flight_until: None,
            published: 0,
        }
    }

    /// Make association fail, to exercise the fatal boot path.
    pub fn with_failed_association(mut self) -> Self {
        self.fail_association = true;
        self
    }

    pub fn published(&self) -> u32 {
        self.published
    }
}

impl ConnectivityPort for SimBroker {
    fn connect(&mut self, timeout: Duration) -> Result<(), CommsError> {
        std::thread::sleep(ASSOCIATION_TIME.min(timeout));
        if self.fail_association {
            return Err(CommsError::LinkFailed);
        }
        if ASSOCIATION_TIME > timeout {
            return Err(CommsError::LinkTimeout);
        }
        self.connected_at = Some(Instant::now());
        Ok(())
    }
}

impl NetworkClient for SimBroker {
    fn session_up(&self) -> bool {
        self.connected_at
            .is_some_and(|at| at.elapsed() >= SESSION_DELAY)
    }

    fn is_publishing(&self) -> bool {
        self.in_flight_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if !self.session_up() {
            return Err(CommsError::NotConnected);
        }
        info!("[mqtt] {} <- {}", topic, payload);
        self.published = self.published.saturating_add(1);
        self.in_flight_until = Some(Instant::now() + IN_FLIGHT);
        Ok(())
    }

    fn poll_command(&mut self) -> Option<CommandPayload> {
        self.commands.try_recv().ok()
    }
}
