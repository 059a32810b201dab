//! Fuzz target: remote command parsing
//!
//! Arbitrary text from the command topic goes through the parser and, if
//! accepted, through the channel encoding the network core forwards.
//!
//! cargo fuzz run fuzz_remote_command

#![no_main]

use bitdoglock::link::ChannelMessage;
use bitdoglock::net::messages::parse_mode_command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Some(ordinal) = parse_mode_command(text) {
        let word = ChannelMessage::ModeChange { ordinal }.encode();
        assert_eq!(
            ChannelMessage::decode(word),
            Ok(ChannelMessage::ModeChange { ordinal })
        );
    }
});
