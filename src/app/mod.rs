//! Application core for the control thread.
//!
//! All interaction with hardware happens through the port traits in
//! [`ports`]; [`service::LockService`] orchestrates the lock on top of
//! them and [`boot`] brings it up.

pub mod boot;
pub mod ports;
pub mod service;

pub use service::LockService;
