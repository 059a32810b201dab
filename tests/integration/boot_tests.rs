//! Control-core bring-up against a scripted link.

use bitdoglock::animation::LEVEL_RED;
use bitdoglock::app::boot::{boot, wait_for_link};
use bitdoglock::error::{CommsError, Error, SensorError};
use bitdoglock::fsm::LockMode;
use bitdoglock::link::{ChannelMessage, LinkStatus, MessageKind};
use bitdoglock::sensors::CardColor;
use bitdoglock::timer::Clock;
use core::time::Duration;

use crate::mock_hw::{ClockDelay, Rig};

fn run_boot(rig: &mut Rig) -> Result<(), Error> {
    boot(
        &mut rig.service,
        &mut rig.hw,
        &rig.link,
        &rig.clock,
        &mut ClockDelay(&rig.clock),
    )
}

fn link_up(rig: &Rig) {
    rig.link
        .deliver(ChannelMessage::LinkEstablished(LinkStatus::Up));
    rig.link.deliver(ChannelMessage::BrokerSessionEstablished);
}

#[test]
fn boot_reaches_ready() {
    let mut rig = Rig::new();
    link_up(&rig);

    assert_eq!(run_boot(&mut rig), Ok(()));

    let second_lines: Vec<String> = rig.hw.shows().into_iter().map(|(_, l2, _)| l2).collect();
    assert_eq!(
        second_lines,
        vec![
            "Conectando Wi-Fi...",
            "Wi-Fi Conectado!",
            "Conectando Broker",
            "Sistema Pronto",
        ]
    );
    assert!(rig.hw.tones().contains(&(1047, 200)));
    assert_eq!(rig.hw.indicator, (0, 0, 0));
    assert!(rig.hw.frame.is_blank());
    // link-up and ready holds
    assert!(rig.clock.now().as_millis() >= 4000);

    rig.tick();
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(
        rig.link.published(),
        vec![(MessageKind::WaitingForCard, CardColor::None)]
    );
}

#[test]
fn sensor_failure_is_fatal() {
    let mut rig = Rig::new();
    rig.hw.sensor_init = Err(SensorError::UnexpectedId(0x00));
    link_up(&rig);

    assert_eq!(
        run_boot(&mut rig),
        Err(Error::Sensor(SensorError::UnexpectedId(0x00)))
    );
    assert!(rig.hw.showed("ERRO FATAL"));
    assert!(rig.hw.showed("TCS34725 falhou!"));
    assert_eq!(rig.hw.indicator, LEVEL_RED);
    // link reports untouched
    assert_eq!(rig.link.inbound.borrow().len(), 2);
}

#[test]
fn link_failure_is_fatal() {
    let mut rig = Rig::new();
    rig.link
        .deliver(ChannelMessage::LinkEstablished(LinkStatus::Failed));

    assert_eq!(
        run_boot(&mut rig),
        Err(Error::Comms(CommsError::LinkFailed))
    );
    assert!(rig.hw.showed("Falha na conexao"));
    assert_eq!(rig.hw.indicator, LEVEL_RED);
}

#[test]
fn silent_link_times_out() {
    let mut rig = Rig::new();

    assert_eq!(
        run_boot(&mut rig),
        Err(Error::Comms(CommsError::LinkTimeout))
    );
    let waited = rig.clock.now().as_millis();
    assert!((35_000..36_000).contains(&waited), "waited {} ms", waited);
    assert!(rig.hw.showed("ERRO FATAL"));
}

#[test]
fn stray_words_are_skipped() {
    let mut rig = Rig::new();
    rig.link.send_mode(LockMode::FireEmergency as u16);
    rig.link.inbound.borrow_mut().push_back(0x1234_0000);
    rig.link
        .deliver(ChannelMessage::LinkEstablished(LinkStatus::Up));
    rig.link.deliver(ChannelMessage::publish(
        MessageKind::Heartbeat,
        CardColor::None,
    ));
    rig.link.deliver(ChannelMessage::BrokerSessionEstablished);

    assert_eq!(run_boot(&mut rig), Ok(()));
    assert!(rig.link.inbound.borrow().is_empty());
}

#[test]
fn wait_for_link_honours_timeout() {
    let rig = Rig::new();
    let result = wait_for_link(
        &rig.link,
        &rig.clock,
        &mut ClockDelay(&rig.clock),
        Duration::from_millis(100),
    );
    assert_eq!(result, Err(CommsError::LinkTimeout));
    assert_eq!(rig.clock.now().as_millis(), 100);
}
