#![no_main]

use id3_codec::config::{ParseOptions, ParsingMode};
use id3_codec::diagnostic::Diagnostic;
use id3_codec::id3::v2::Id3v2Tag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	for mode in [ParsingMode::Strict, ParsingMode::BestAttempt, ParsingMode::Relaxed] {
		let mut diagnostics: Vec<Diagnostic> = Vec::new();
		let _ = Id3v2Tag::parse(
			&mut &data[..],
			ParseOptions::new().parsing_mode(mode),
			&mut diagnostics,
		);
	}
});
