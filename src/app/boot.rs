//! Control-core bring-up.
//!
//! ```text
//!  sensor init ──▶ wait link report ──▶ wait broker session ──▶ ready
//!       │                 │
//!    (fatal)        (fatal: failed / timeout)
//! ```
//!
//! Fatal failures leave an error screen and a red indicator up and are
//! returned to the caller, which halts.  Nothing here retries.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::animation::{LEVEL_BOOT_BROKER, LEVEL_BOOT_WIFI, LEVEL_GREEN, LEVEL_RED, Level};
use crate::drivers::buzzer::Melody;
use crate::error::{CommsError, Result};
use crate::link::{ChannelMessage, FifoPort, LinkStatus};
use crate::timer::Clock;

use super::ports::LockPeripherals;
use super::service::LockService;

/// Poll interval while waiting on the network core.
const POLL_MS: u32 = 10;
const LINK_UP_HOLD_MS: u32 = 1500;
const READY_HOLD_MS: u32 = 2500;

fn indicate<H: LockPeripherals + ?Sized>(hw: &mut H, level: Level) {
    hw.set_indicator(level.0, level.1, level.2);
}

/// Bring the lock up.  On `Ok` the service is ready to tick.
pub fn boot<H, L, C, D>(
    service: &mut LockService,
    hw: &mut H,
    link: &L,
    clock: &C,
    delay: &mut D,
) -> Result<()>
where
    H: LockPeripherals,
    L: FifoPort,
    C: Clock,
    D: DelayNs,
{
    if let Err(e) = hw.init_sensor() {
        error!("colour sensor init failed: {}", e);
        hw.show_lines("ERRO FATAL", "TCS34725 falhou!", "");
        indicate(hw, LEVEL_RED);
        return Err(e.into());
    }
    info!("colour sensor ready");

    hw.show_lines("Rede", "Conectando Wi-Fi...", "");
    indicate(hw, LEVEL_BOOT_WIFI);

    let timeout = service.config().link_wait_timeout();
    if let Err(e) = wait_for_link(link, clock, delay, timeout) {
        error!("network link: {}", e);
        hw.show_lines("ERRO FATAL", "Falha na conexao", "Wi-Fi");
        indicate(hw, LEVEL_RED);
        return Err(e.into());
    }
    info!("network link up");
    hw.show_lines("Rede", "Wi-Fi Conectado!", "");
    indicate(hw, LEVEL_GREEN);
    delay.delay_ms(LINK_UP_HOLD_MS);

    hw.show_lines("Rede", "Conectando Broker", "MQTT...");
    indicate(hw, LEVEL_BOOT_BROKER);
    wait_for_broker(link, delay);
    info!("broker session up");

    hw.show_lines("BitDogLock 2FA", "Sistema Pronto", "");
    hw.play_melody(Melody::Success);
    delay.delay_ms(READY_HOLD_MS);
    service.reset_visuals(hw, link, clock);
    Ok(())
}

/// Wait for the network core's association report.
pub fn wait_for_link<L, C, D>(
    link: &L,
    clock: &C,
    delay: &mut D,
    timeout: Duration,
) -> core::result::Result<(), CommsError>
where
    L: FifoPort + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    let started = clock.now();
    loop {
        if let Some(word) = link.try_pop() {
            match ChannelMessage::decode(word) {
                Ok(ChannelMessage::LinkEstablished(LinkStatus::Up)) => return Ok(()),
                Ok(ChannelMessage::LinkEstablished(LinkStatus::Failed)) => {
                    return Err(CommsError::LinkFailed);
                }
                Ok(other) => debug!("boot: ignoring {:?}", other),
                Err(e) => warn!("boot: undecodable word {:#010x}: {}", word, e),
            }
            continue;
        }
        if clock.now().saturating_since(started) >= timeout {
            return Err(CommsError::LinkTimeout);
        }
        delay.delay_ms(POLL_MS);
    }
}

/// Block until the broker session report arrives.  No timeout.
pub fn wait_for_broker<L, D>(link: &L, delay: &mut D)
where
    L: FifoPort + ?Sized,
    D: DelayNs + ?Sized,
{
    loop {
        match link.try_pop().map(ChannelMessage::decode) {
            Some(Ok(ChannelMessage::BrokerSessionEstablished)) => return,
            Some(Ok(other)) => debug!("boot: ignoring {:?}", other),
            Some(Err(e)) => warn!("boot: undecodable word: {}", e),
            None => delay.delay_ms(POLL_MS),
        }
    }
}
