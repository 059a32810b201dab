//! BitDogLock firmware library.
//!
//! Two-factor door lock: a coloured card selects an identity, a keypad
//! code confirms it, a servo latch opens on success.  The control loop
//! ([`app::LockService`]) and the network loop ([`net::NetworkWorker`])
//! run on separate cores and talk only through one-word messages
//! ([`link`]).  Everything hardware-facing sits behind the port traits in
//! [`app::ports`], so the whole lock runs on the host under test.

#![deny(unused_must_use)]

pub mod adapters;
pub mod animation;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod link;
pub mod net;
pub mod sensors;
pub mod text;
pub mod timer;
