//! Fuzz target: `TopicCodec::parse`
//!
//! Splits arbitrary bytes into a topic and a payload at the first NUL
//! and asserts that parsing never panics and that every accepted command
//! carries the payload's exact decimal value.
//!
//! cargo fuzz run fuzz_topic_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use trilamp::config::LampConfig;
use trilamp::remote::{Inbound, TopicCodec};

fuzz_target!(|data: &[u8]| {
    let codec = TopicCodec::new(&LampConfig::default());

    let (topic, payload) = match data.iter().position(|b| *b == 0) {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &[][..]),
    };
    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };

    if let Ok(Inbound::Command { level, .. }) = codec.parse(topic, payload) {
        let text = core::str::from_utf8(payload).expect("accepted payload is ASCII");
        assert!(text.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(text.trim_start_matches('0').parse::<u32>().unwrap_or(0), u32::from(level));
    }
});
