#![no_main]

use id3_codec::config::{ParsingMode, WriteOptions};
use id3_codec::id3::find_id3v1;
use libfuzzer_sys::fuzz_target;

use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
	if let Ok(Some(tag)) = find_id3v1(&mut Cursor::new(data), ParsingMode::BestAttempt) {
		let _ = tag.render(WriteOptions::new().lossy_text_encoding(true));
	}
});
