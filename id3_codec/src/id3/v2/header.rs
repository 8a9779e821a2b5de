use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::{Id3Version, VersionFamily};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::err;

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

/// The magic bytes at the start of every ID3v2 tag
pub const ID3V2_MAGIC: &[u8; 3] = b"ID3";
/// The magic bytes at the start of an ID3v2.4 footer
pub const ID3V2_FOOTER_MAGIC: &[u8; 3] = b"3DI";

/// The 10 byte ID3v2 tag header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TagHeader {
	/// The version of the tag
	pub version: Id3Version,
	/// Whether or not all frames are unsynchronised
	///
	/// This can not be rendered directly, see [`TagHeader::render`].
	pub unsync: bool,
	/// Whether an extended header follows the tag header
	pub extended: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag is followed by a footer (ID3v2.4 only)
	pub footer: bool,
	/// The size of everything following the header, excluding the footer
	///
	/// This is a 28-bit value.
	pub tag_size: u32,
}

impl TagHeader {
	/// The size of a tag header (or footer) on disk
	pub const SIZE: u32 = 10;

	/// Create an empty `TagHeader` for `version`
	///
	/// # Errors
	///
	/// `version` is not an ID3v2 version
	pub fn new(version: Id3Version) -> Result<Self> {
		if !version.is_v2() {
			err!(InvalidArgument("ID3v2 headers require an ID3v2 version"));
		}

		Ok(Self {
			version,
			unsync: false,
			extended: false,
			experimental: false,
			footer: false,
			tag_size: 0,
		})
	}

	/// Read a `TagHeader`
	///
	/// The reader is expected to be at the start of the tag. When fewer than 10 bytes are
	/// available, or the magic doesn't match, this returns `Ok(None)`.
	///
	/// # Errors
	///
	/// * The major version is not 2, 3, or 4
	/// * An ID3v2.2 tag claims to be compressed
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::TagHeader;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let header = TagHeader::parse(&mut &b"ID3\x04\x00\x40\x00\x00\x02\x01"[..])?.unwrap();
	/// assert!(header.extended);
	/// assert_eq!(header.tag_size, 0x101);
	///
	/// assert!(TagHeader::parse(&mut &b"ID3\x04\x00"[..])?.is_none());
	/// assert!(TagHeader::parse(&mut &b"ID3\x05\x00\x00\x00\x00\x00\x00"[..]).is_err());
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(reader: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 header");

		let mut header = [0; 10];
		if reader.read_exact(&mut header).is_err() {
			return Ok(None);
		}

		if &header[..3] != ID3V2_MAGIC {
			return Ok(None);
		}

		// Stored as [minor, revision], the major version ("2") is implied by the magic
		let version = match header[3] {
			minor @ 2..=4 => Id3Version::new(2, minor, header[4])?,
			major => {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(major, header[4])).into(),
				);
			},
		};

		let flags = header[5];
		let family = version.family();

		// Compression was a flag only used in ID3v2.2 (bit 2).
		// No compression scheme was ever decided on, so the tag can't be read.
		if family == VersionFamily::V2_2 && flags & 0x40 == 0x40 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::V2Compression).into());
		}

		if flags & reserved_flags(family) != 0 {
			log::warn!("Tag header has reserved flags set: {flags:#04x}");
		}

		let not_v2 = family != VersionFamily::V2_2;
		let tag_size = BigEndian::read_u32(&header[6..]).unsynch();

		Ok(Some(Self {
			version,
			unsync: flags & 0x80 == 0x80,
			extended: not_v2 && flags & 0x40 == 0x40,
			experimental: not_v2 && flags & 0x20 == 0x20,
			footer: family == VersionFamily::V2_4 && flags & 0x10 == 0x10,
			tag_size,
		}))
	}

	/// The flags byte, without the unsynchronisation bit
	pub(crate) fn flags_byte(&self) -> u8 {
		let family = self.version.family();

		let mut byte = 0;
		if family == VersionFamily::V2_2 {
			return byte;
		}

		if self.extended {
			byte |= 0x40;
		}

		if self.experimental {
			byte |= 0x20;
		}

		if self.footer && family == VersionFamily::V2_4 {
			byte |= 0x10;
		}

		byte
	}

	/// Render the header for a tag of `tag_size` bytes
	///
	/// # Errors
	///
	/// * `unsync` is set. Unsynchronisation is applied to the frame data before the header is
	///   rendered, and the flag bit is set in the output bytes by the caller.
	/// * `tag_size` doesn't fit in 28 bits
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v2::TagHeader;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let mut header = TagHeader::new(Id3Version::ID3_V2_4)?;
	/// assert_eq!(header.render(0x101)?, *b"ID3\x04\x00\x00\x00\x00\x02\x01");
	///
	/// header.unsync = true;
	/// assert!(header.render(0x101).is_err());
	/// # Ok(()) }
	/// ```
	pub fn render(&self, tag_size: u32) -> Result<[u8; 10]> {
		if self.unsync {
			err!(Unsupported(
				"Unsynchronisation must be applied before rendering the tag header"
			));
		}

		if !self.version.is_v2() {
			err!(InvalidArgument("ID3v2 headers require an ID3v2 version"));
		}

		let mut header = [0; 10];
		header[..3].copy_from_slice(ID3V2_MAGIC);
		header[3] = self.version.minor();
		header[4] = self.version.revision();
		header[5] = self.flags_byte();
		BigEndian::write_u32(&mut header[6..], tag_size.synch()?);

		Ok(header)
	}

	/// Render the ID3v2.4 footer, a copy of the header with reversed magic
	pub(crate) fn render_footer(&self, tag_size: u32) -> Result<[u8; 10]> {
		let mut footer = self.render(tag_size)?;
		footer[..3].copy_from_slice(ID3V2_FOOTER_MAGIC);
		Ok(footer)
	}
}

fn reserved_flags(family: VersionFamily) -> u8 {
	match family {
		VersionFamily::V2_2 => 0x3F,
		VersionFamily::V2_3 => 0x1F,
		_ => 0x0F,
	}
}

#[cfg(test)]
mod tests {
	use super::TagHeader;
	use crate::id3::Id3Version;

	#[test_log::test]
	fn truncated_is_absent() {
		for input in [
			&b""[..],
			&b"ID3"[..],
			&b"ID3\x04\x00"[..],
			&b"ID3\x04\x00\x00\x00\x00\x00"[..],
		] {
			assert!(TagHeader::parse(&mut &input[..]).unwrap().is_none());
		}

		assert!(
			TagHeader::parse(&mut &b"TAG\x04\x00\x00\x00\x00\x00\x00"[..])
				.unwrap()
				.is_none()
		);
	}

	#[test_log::test]
	fn bad_major_versions() {
		for major in [1_u8, 5, 6] {
			let mut input = *b"ID3\x00\x00\x00\x00\x00\x00\x00";
			input[3] = major;

			assert!(TagHeader::parse(&mut &input[..]).is_err());
		}
	}

	#[test_log::test]
	fn v2_compression() {
		assert!(TagHeader::parse(&mut &b"ID3\x02\x00\x40\x00\x00\x00\x00"[..]).is_err());
	}

	#[test_log::test]
	fn tag_size_round_trip() {
		for version in [
			Id3Version::ID3_V2_2,
			Id3Version::ID3_V2_3,
			Id3Version::ID3_V2_4,
		] {
			for size in [0, 10, 100, 1000, 2500, 5000, 7500, 10000] {
				let header = TagHeader::new(version).unwrap();
				let rendered = header.render(size).unwrap();

				let parsed = TagHeader::parse(&mut &rendered[..]).unwrap().unwrap();
				assert_eq!(parsed.tag_size, size);
				assert_eq!(parsed.version, version);
			}
		}
	}

	#[test_log::test]
	fn flags_round_trip() {
		let mut header = TagHeader::new(Id3Version::ID3_V2_4).unwrap();
		header.extended = true;
		header.experimental = true;
		header.footer = true;

		let rendered = header.render(0).unwrap();
		assert_eq!(rendered[5], 0x70);

		let parsed = TagHeader::parse(&mut &rendered[..]).unwrap().unwrap();
		assert_eq!(parsed, header);

		// v2.3 has no footer
		header.version = Id3Version::ID3_V2_3;
		assert_eq!(header.render(0).unwrap()[5], 0x60);
	}

	#[test_log::test]
	fn unsync_render_is_unsupported() {
		let mut header = TagHeader::new(Id3Version::ID3_V2_3).unwrap();
		header.unsync = true;
		assert!(header.render(100).is_err());

		// The flag is still read
		let parsed = TagHeader::parse(&mut &b"ID3\x03\x00\x80\x00\x00\x00\x0A"[..])
			.unwrap()
			.unwrap();
		assert!(parsed.unsync);
		assert_eq!(parsed.tag_size, 10);
	}

	#[test_log::test]
	fn oversized_tag() {
		let header = TagHeader::new(Id3Version::ID3_V2_4).unwrap();
		assert!(header.render(0x1000_0000).is_err());
	}
}
