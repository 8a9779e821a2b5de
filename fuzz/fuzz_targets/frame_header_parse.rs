#![no_main]

use id3_codec::id3::Id3Version;
use id3_codec::id3::v2::{ExtendedTagHeader, FrameHeader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	for version in [Id3Version::ID3_V2_2, Id3Version::ID3_V2_3, Id3Version::ID3_V2_4] {
		let _ = FrameHeader::parse(&mut &data[..], version);
		let _ = ExtendedTagHeader::parse(&mut &data[..], version);
	}
});
