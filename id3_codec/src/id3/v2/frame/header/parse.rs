use super::{FlagLayout, FrameFlags, FrameHeader, FrameId};
use crate::error::Result;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::{Id3Version, VersionFamily};

use std::io::Read;

pub(crate) fn parse_v2_header<R>(reader: &mut R, version: Id3Version) -> Result<Option<FrameHeader>>
where
	R: Read,
{
	let mut header = [0; 6];
	if reader.read_exact(&mut header).is_err() {
		return Ok(None);
	}

	let Some(id) = parse_id(&header[..3]) else {
		return Ok(None);
	};

	let data_size = u32::from_be_bytes([0, header[3], header[4], header[5]]);

	// V2 doesn't store flags
	Ok(Some(FrameHeader {
		id,
		version,
		data_size,
		flags: FrameFlags::default(),
		reserved_flags: 0,
	}))
}

pub(crate) fn parse_header<R>(reader: &mut R, version: Id3Version) -> Result<Option<FrameHeader>>
where
	R: Read,
{
	let mut header = [0; 10];
	if reader.read_exact(&mut header).is_err() {
		return Ok(None);
	}

	let family = version.family();

	// For some reason, some apps make v3 tags with v2 frame IDs.
	// The actual frame header is v3 though
	let mut id_end = 4;
	if header[3] == 0 && family == VersionFamily::V2_3 && header[0] != 0 {
		log::warn!("Found a v2 frame ID in a v3 tag, attempting to upgrade");
		id_end = 3;
	}

	let Some(id) = parse_id(&header[..id_end]) else {
		return Ok(None);
	};

	let mut data_size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
	// unsynch the frame size if necessary
	if family == VersionFamily::V2_4 {
		data_size = data_size.unsynch();
	}

	let layout = FlagLayout::for_version(family);
	let raw_flags = u16::from_be_bytes([header[8], header[9]]);

	Ok(Some(FrameHeader {
		id,
		version,
		data_size,
		flags: FrameFlags::parse(raw_flags, layout),
		reserved_flags: raw_flags & !layout.known_bits(),
	}))
}

// Anything that isn't a valid ID is assumed to be the start of padding
fn parse_id(id_bytes: &[u8]) -> Option<FrameId> {
	let id_str = std::str::from_utf8(id_bytes).ok()?;

	match FrameId::new(id_str) {
		Ok(id) => Some(id),
		Err(_) => {
			log::debug!("Encountered an invalid frame ID {id_bytes:02x?}, assuming padding");
			None
		},
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::Id3Version;
	use crate::id3::v2::FrameHeader;

	#[test_log::test]
	fn v2_id_in_v3_tag() {
		let header = FrameHeader::parse(
			&mut &b"TT2\x00\x00\x00\x00\x05\x00\x00"[..],
			Id3Version::ID3_V2_3,
		)
		.unwrap()
		.unwrap();

		assert!(header.id().is_outdated());
		assert_eq!(header.id().as_str(), "TT2");
		assert_eq!(header.data_size, 5);
	}

	#[test_log::test]
	fn v3_size_is_not_synchsafe() {
		let header = FrameHeader::parse(
			&mut &b"TALB\x00\x00\x01\x00\x00\x00"[..],
			Id3Version::ID3_V2_3,
		)
		.unwrap()
		.unwrap();

		assert_eq!(header.data_size, 0x100);
	}

	#[test_log::test]
	fn invalid_ids_are_padding() {
		for input in [
			&b"tit2\x00\x00\x00\x01\x00\x00"[..],
			&b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"[..],
			&b"TIT"[..],
		] {
			assert!(
				FrameHeader::parse(&mut &input[..], Id3Version::ID3_V2_4)
					.unwrap()
					.is_none()
			);
		}
	}

	#[test_log::test]
	fn reserved_flags_are_kept_aside() {
		let header = FrameHeader::parse(
			&mut &b"TALB\x00\x00\x00\x01\x80\x00"[..],
			Id3Version::ID3_V2_4,
		)
		.unwrap()
		.unwrap();

		assert_eq!(header.reserved_flags, 0x8000);
		assert_eq!(header.flags, crate::id3::v2::FrameFlags::default());
	}
}
