//! Card + code flows through `LockService` against mock hardware.

use core::time::Duration;

use bitdoglock::config::LockConfig;
use bitdoglock::error::SensorError;
use bitdoglock::fsm::LockMode;
use bitdoglock::link::MessageKind;
use bitdoglock::sensors::CardColor;

use crate::mock_hw::{HwCall, Rig};

// ── Card and code ─────────────────────────────────────────────

#[test]
fn card_starts_code_entry() {
    let mut rig = Rig::new();
    rig.tick();
    assert_eq!(
        rig.link.published(),
        vec![(MessageKind::WaitingForCard, CardColor::None)]
    );

    rig.card(CardColor::Green);
    assert_eq!(rig.mode(), LockMode::AwaitingPassword);
    let timeout = rig.service.state().timers.password_timeout;
    assert!(timeout.is_armed());
    assert_eq!(timeout.duration(), Duration::from_secs(15));

    rig.tick();
    assert_eq!(
        rig.link.published(),
        vec![
            (MessageKind::WaitingForCard, CardColor::None),
            (MessageKind::CardRead, CardColor::Green),
            (MessageKind::AwaitingPassword, CardColor::Green),
        ]
    );
    assert!(rig.hw.shows().contains(&(
        "Senha (Verde):".to_string(),
        String::new(),
        "Tempo: 15s".to_string()
    )));
}

#[test]
fn typed_digits_are_echoed() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    rig.keys("13");
    assert_eq!(rig.service.state().password.as_str(), "13");
    assert!(rig.hw.shows().contains(&(
        "Senha (Verde):".to_string(),
        "13".to_string(),
        "Tempo: 15s".to_string()
    )));
    // one click per key
    assert_eq!(rig.hw.count(&HwCall::Tone { freq: 1500, ms: 50 }), 2);
}

#[test]
fn correct_code_opens_latch() {
    let mut rig = Rig::new();
    rig.open_with_green();

    assert_eq!(rig.hw.servo_moves(), vec![150]);
    assert!(rig.service.state().is_open);
    let auto_lock = rig.service.state().timers.auto_lock;
    assert!(auto_lock.is_armed());
    assert_eq!(auto_lock.duration(), Duration::from_secs(20));

    let published = rig.link.published();
    assert_eq!(
        published[published.len() - 2..],
        [
            (MessageKind::SystemOpen, CardColor::None),
            (MessageKind::AccessGranted, CardColor::Green),
        ]
    );
    assert!(rig.hw.showed("ACESSO LIBERADO"));
    assert!(rig.hw.tones().contains(&(1047, 200)));
}

#[test]
fn every_card_opens_with_its_own_code() {
    for (color, code) in [
        (CardColor::Green, "1337#"),
        (CardColor::Red, "8008#"),
        (CardColor::Blue, "4242#"),
    ] {
        let mut rig = Rig::new();
        rig.tick();
        rig.card(color);
        rig.keys(code);
        assert_eq!(rig.mode(), LockMode::Open, "{:?}", color);
    }
}

#[test]
fn wrong_code_shows_denial_then_idles() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Red);
    rig.keys("1337#");

    assert_eq!(rig.mode(), LockMode::MsgAccessDenied);
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::AccessDenied, CardColor::Red))
    );
    assert!(rig.hw.showed("ACESSO NEGADO"));
    assert!(rig.hw.tones().contains(&(400, 150)));
    assert!(rig.hw.servo_moves().is_empty());

    rig.run_for(3990);
    assert_eq!(rig.mode(), LockMode::MsgAccessDenied);
    rig.run_for(10);
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(rig.service.state().active_color, CardColor::None);
}

#[test]
fn code_entry_times_out() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    rig.tick();

    rig.run_for(14_990);
    assert_eq!(rig.mode(), LockMode::AwaitingPassword);
    rig.run_for(10);
    assert_eq!(rig.mode(), LockMode::MsgTimeout);

    assert_eq!(rig.hw.count(&HwCall::Tone { freq: 880, ms: 100 }), 3);
    assert_eq!(rig.hw.count(&HwCall::Tone { freq: 0, ms: 50 }), 2);
    assert!(rig.hw.showed("OPERACAO EXPIRADA"));
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::PasswordTimeout, CardColor::Green))
    );

    // result screen is armed on the next tick
    rig.run_for(4010);
    assert_eq!(rig.mode(), LockMode::Waiting);
}

#[test]
fn star_cancels_entry() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Red);
    rig.keys("80*");

    assert_eq!(rig.mode(), LockMode::Waiting);
    assert!(rig.service.state().password.is_empty());
    let published = rig.link.published();
    assert_eq!(
        published[published.len() - 2..],
        [
            (MessageKind::Cancelled, CardColor::Red),
            (MessageKind::WaitingForCard, CardColor::None),
        ]
    );
}

#[test]
fn extra_digits_are_ignored() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Blue);
    rig.keys("424299");
    assert_eq!(rig.service.state().password.as_str(), "4242");
    rig.keys("#");
    assert_eq!(rig.mode(), LockMode::Open);
}

#[test]
fn short_code_is_denied() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    rig.keys("133#");
    assert_eq!(rig.mode(), LockMode::MsgAccessDenied);
}

// ── Open / auto-lock ──────────────────────────────────────────

#[test]
fn servo_released_after_move_window() {
    let mut rig = Rig::new();
    rig.open_with_green();
    assert_eq!(rig.hw.count(&HwCall::ServoStop), 0);

    rig.run_for(490);
    assert_eq!(rig.hw.count(&HwCall::ServoStop), 0);
    rig.run_for(10);
    assert_eq!(rig.hw.count(&HwCall::ServoStop), 1);
    rig.run_for(1000);
    assert_eq!(rig.hw.count(&HwCall::ServoStop), 1);
}

#[test]
fn auto_lock_closes_latch() {
    let mut rig = Rig::new();
    rig.open_with_green();
    rig.link.clear();

    rig.run_for(19_990);
    assert_eq!(rig.mode(), LockMode::Open);
    assert!(rig.hw.showed("Sistema Aberto"));
    rig.run_for(10);
    assert_eq!(rig.mode(), LockMode::Waiting);

    assert_eq!(
        rig.link.published(),
        vec![
            (MessageKind::AutoLock, CardColor::None),
            (MessageKind::SystemClosed, CardColor::None),
        ]
    );
    assert_eq!(rig.hw.servo_moves(), vec![150, 0]);
    assert!(!rig.service.state().is_open);
    assert!(rig.hw.showed("Fechado"));

    rig.tick();
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::WaitingForCard, CardColor::None))
    );
}

#[test]
fn countdown_line_tracks_auto_lock() {
    let mut rig = Rig::new();
    rig.open_with_green();
    rig.run_for(5000);
    assert!(rig.hw.showed("Travando em: 15s"));
}

// ── Administration ────────────────────────────────────────────

#[test]
fn admin_changes_code_for_card() {
    let mut rig = Rig::new();
    rig.tick();
    rig.link.send_mode(LockMode::AdminAwaitingCard as u16);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::AdminAwaitingCard);
    assert!(rig.hw.showed("--- MODO ADMIN ---"));
    let published = rig.link.published();
    assert_eq!(
        published[published.len() - 2..],
        [
            (MessageKind::AdminStarted, CardColor::None),
            (MessageKind::AdminMode, CardColor::None),
        ]
    );

    rig.card(CardColor::Red);
    assert_eq!(rig.mode(), LockMode::AdminAwaitingNewPassword);
    rig.keys("9876#");
    assert!(
        rig.hw
            .shows()
            .iter()
            .any(|(l1, l2, _)| l1 == "--- MODO ADMIN ---" && l2 == "Nova Senha (Vermelho):")
    );
    assert_eq!(rig.mode(), LockMode::AdminMsgSuccess);
    assert_eq!(rig.service.passwords().get(CardColor::Red), Some("9876"));
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::PasswordChanged, CardColor::Red))
    );

    rig.run_for(4000);
    assert_eq!(rig.mode(), LockMode::Waiting);

    // the new code works, the old one is gone
    rig.card(CardColor::Red);
    rig.keys("9876#");
    assert_eq!(rig.mode(), LockMode::Open);
}

#[test]
fn admin_rejects_short_code() {
    let mut rig = Rig::new();
    rig.tick();
    rig.link.send_mode(LockMode::AdminAwaitingCard as u16);
    rig.tick();
    rig.card(CardColor::Green);
    rig.keys("12#");

    assert_eq!(rig.mode(), LockMode::AdminMsgFormatError);
    assert!(rig.hw.showed("Senha 4 digitos!"));
    assert_eq!(rig.service.passwords().get(CardColor::Green), Some("1337"));
}

#[test]
fn admin_cancel_keeps_code() {
    let mut rig = Rig::new();
    rig.tick();
    rig.link.send_mode(LockMode::AdminAwaitingCard as u16);
    rig.tick();
    rig.card(CardColor::Blue);
    rig.keys("1*");

    assert_eq!(rig.mode(), LockMode::AdminMsgCancelled);
    assert!(rig.hw.shows().contains(&(
        "--- MODO ADMIN ---".to_string(),
        "Operacao Cancelada".to_string(),
        String::new(),
    )));
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::Cancelled, CardColor::None))
    );
    assert_eq!(rig.service.passwords().get(CardColor::Blue), Some("4242"));

    rig.run_for(4000);
    assert_eq!(rig.mode(), LockMode::Waiting);
}

// ── Mode bookkeeping ──────────────────────────────────────────

#[test]
fn entry_action_runs_once_per_mode_change() {
    let mut rig = Rig::new();
    assert!(!rig.service.state().initialized);
    rig.tick();
    assert!(rig.service.state().initialized);
    rig.ticks(5);
    assert_eq!(rig.link.published().len(), 1);

    rig.card(CardColor::Green);
    assert!(!rig.service.state().initialized);
    rig.tick();
    assert!(rig.service.state().initialized);
}

#[test]
fn sensor_fault_reads_as_no_card() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.hw.readings.push_back(Err(SensorError::BusFault));
    }
    rig.ticks(3);
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert!(rig.service.state().sensor_faulted);

    rig.card(CardColor::Green);
    assert_eq!(rig.mode(), LockMode::AwaitingPassword);
    assert!(!rig.service.state().sensor_faulted);
}

#[test]
fn dim_or_ambiguous_reading_is_ignored() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::None);
    assert_eq!(rig.mode(), LockMode::Waiting);
}

#[test]
fn unknown_remote_mode_resets_to_waiting() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    rig.keys("12");
    assert_eq!(rig.mode(), LockMode::AwaitingPassword);

    rig.link.send_mode(42);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert_eq!(rig.service.state().active_color, CardColor::None);
    assert!(rig.service.state().password.is_empty());
    assert_eq!(
        rig.link.published().last(),
        Some(&(MessageKind::WaitingForCard, CardColor::None))
    );
}

#[test]
fn remote_mode_change_relocks_open_latch() {
    let mut rig = Rig::new();
    rig.open_with_green();
    rig.link.clear();

    rig.link.send_mode(LockMode::Waiting as u16);
    rig.tick();
    assert_eq!(rig.mode(), LockMode::Waiting);
    assert!(!rig.service.state().is_open);
    assert_eq!(rig.hw.servo_moves(), vec![150, 0]);
    assert_eq!(
        rig.link.published(),
        vec![
            (MessageKind::SystemClosed, CardColor::None),
            (MessageKind::WaitingForCard, CardColor::None),
        ]
    );

    // auto-lock window no longer applies
    rig.run_for(20_000);
    assert!(
        !rig.link
            .published()
            .contains(&(MessageKind::AutoLock, CardColor::None))
    );
}

#[test]
fn heartbeat_every_period() {
    let mut rig = Rig::new();
    rig.tick();
    assert_eq!(rig.link.heartbeats(), 1);
    rig.run_for(29_990);
    assert_eq!(rig.link.heartbeats(), 1);
    rig.run_for(10);
    assert_eq!(rig.link.heartbeats(), 2);
}

// ── Keypad ────────────────────────────────────────────────────

#[test]
fn held_key_counts_once() {
    let mut rig = Rig::new();
    rig.tick();
    rig.card(CardColor::Green);
    for _ in 0..5 {
        rig.hw.scans.push_back(Some('1'));
    }
    rig.hw.scans.push_back(None);
    rig.ticks(6);
    assert_eq!(rig.service.state().password.as_str(), "1");
}

#[test]
fn raw_scans_pass_through_when_suppression_off() {
    let config = LockConfig {
        suppress_held_keys: false,
        ..LockConfig::default()
    };
    let mut rig = Rig::with_config(config);
    rig.tick();
    rig.card(CardColor::Green);
    for _ in 0..3 {
        rig.hw.scans.push_back(Some('1'));
    }
    rig.ticks(3);
    assert_eq!(rig.service.state().password.as_str(), "111");
}
