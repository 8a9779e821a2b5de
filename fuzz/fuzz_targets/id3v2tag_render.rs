#![no_main]

use id3_codec::config::{ParseOptions, WriteOptions};
use id3_codec::diagnostic::IgnoreSink;
use id3_codec::id3::Id3Version;
use id3_codec::id3::v2::Id3v2Tag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	let Ok(Some(tag)) = Id3v2Tag::parse(&mut &data[..], ParseOptions::new(), &mut IgnoreSink) else {
		return;
	};

	for version in [Id3Version::ID3_V2_3, Id3Version::ID3_V2_4] {
		let options = WriteOptions::new()
			.version(version)
			.unsynchronisation(true)
			.lossy_text_encoding(true);

		// Anything that renders must read back
		if let Ok(bytes) = tag.render(options) {
			if !bytes.is_empty() {
				let reparsed = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new(), &mut IgnoreSink);
				assert!(matches!(reparsed, Ok(Some(_))));
			}
		}
	}
});
