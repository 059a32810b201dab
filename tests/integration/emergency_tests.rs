//! Remote fire alarm: raise, toggle off, and interaction with other modes.

use bitdoglock::animation::PULSE_IDLE;
use bitdoglock::fsm::LockMode;
use bitdoglock::link::MessageKind;
use bitdoglock::sensors::CardColor;

use crate::mock_hw::{HwCall, Rig};

const FIRE: u16 = LockMode::FireEmergency as u16;
const ALARM: HwCall = HwCall::Tone {
    freq: 3000,
    ms: 100,
};

fn rig_in_fire() -> Rig {
    let mut rig = Rig::new();
    rig.tick();
    rig.link.clear();
    rig.link.send_mode(FIRE);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::FireEmergency);
    rig
}

#[test]
fn fire_alarm_opens_latch_and_beeps() {
    let mut rig = rig_in_fire();

    assert_eq!(
        rig.link.published(),
        vec![(MessageKind::FireAlarmOn, CardColor::None)]
    );
    assert!(rig.hw.showed("ALARME DE INCENDIO"));
    assert_eq!(rig.hw.servo_moves(), vec![150]);
    assert!(rig.service.state().is_open);
    assert!(rig.service.state().animations.fire);

    rig.run_for(490);
    assert_eq!(rig.hw.count(&ALARM), 0);
    rig.run_for(10);
    assert_eq!(rig.hw.count(&ALARM), 1);
    rig.run_for(1000);
    assert_eq!(rig.hw.count(&ALARM), 2);
    rig.run_for(2000);
    assert_eq!(rig.hw.count(&ALARM), 4);
}

#[test]
fn fire_animation_drives_matrix() {
    let mut rig = rig_in_fire();
    let before = rig.hw.frames_shown;
    rig.run_for(500);
    assert!(rig.hw.frames_shown > before);
}

#[test]
fn second_fire_command_clears_alarm() {
    let mut rig = rig_in_fire();
    rig.run_for(600);
    let beeps = rig.hw.count(&ALARM);
    rig.link.clear();

    rig.link.send_mode(FIRE);
    rig.tick();

    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(
        rig.link.published(),
        vec![
            (MessageKind::FireAlarmOff, CardColor::None),
            (MessageKind::SystemClosed, CardColor::None),
            (MessageKind::WaitingForCard, CardColor::None),
        ]
    );
    assert_eq!(rig.hw.count(&HwCall::StopTone), 1);
    assert_eq!(rig.hw.servo_moves(), vec![150, 0]);

    let state = rig.service.state();
    assert!(!state.is_open);
    assert!(!state.animations.fire);
    assert!(state.pulse.is_active());
    assert_eq!(state.pulse.base(), PULSE_IDLE);

    rig.run_for(3000);
    assert_eq!(rig.hw.count(&ALARM), beeps);
}

#[test]
fn fire_overrides_open_latch() {
    let mut rig = Rig::new();
    rig.open_with_green();
    rig.link.send_mode(FIRE);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::FireEmergency);

    rig.link.send_mode(FIRE);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::Waiting);
    rig.link.clear();

    // the old auto-lock window is not acted on
    rig.run_for(20_000);
    assert!(
        !rig.link
            .published()
            .contains(&(MessageKind::AutoLock, CardColor::None))
    );
}

#[test]
fn fire_abandons_code_entry() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    rig.keys("13");

    rig.link.send_mode(FIRE);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::FireEmergency);

    // no keypad handling while the alarm is up
    rig.keys("37#");
    assert_eq!(rig.mode(), LockMode::FireEmergency);

    rig.link.send_mode(FIRE);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(rig.service.state().active_color, CardColor::None);
    assert!(rig.service.state().password.is_empty());
}

#[test]
fn other_remote_mode_also_silences_alarm() {
    let mut rig = rig_in_fire();
    rig.run_for(500);
    assert_eq!(rig.hw.count(&ALARM), 1);
    rig.link.clear();

    rig.link.send_mode(LockMode::Waiting as u16);
    rig.tick();

    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(rig.hw.count(&HwCall::StopTone), 1);
    assert!(!rig.service.state().animations.fire);
    assert!(!rig.service.state().is_open);
    assert_eq!(
        rig.link.published(),
        vec![
            (MessageKind::SystemClosed, CardColor::None),
            (MessageKind::WaitingForCard, CardColor::None),
        ]
    );

    rig.run_for(3000);
    assert_eq!(rig.hw.count(&ALARM), 1);
}
