//! Fuzz target: `ChannelMessage::decode`
//!
//! Every 4-byte chunk of the input is decoded as an inter-core word.
//! Decoding must never panic, and anything that decodes must re-encode
//! to a word that decodes to the same message.
//!
//! cargo fuzz run fuzz_channel_word

#![no_main]

use bitdoglock::link::ChannelMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for chunk in data.chunks_exact(4) {
        let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if let Ok(message) = ChannelMessage::decode(word) {
            assert_eq!(ChannelMessage::decode(message.encode()), Ok(message));
        }
    }
});
