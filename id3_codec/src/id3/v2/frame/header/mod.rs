pub(super) mod parse;

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::{Id3Version, VersionFamily};
use crate::macros::err;

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::io::Read;

/// An `ID3v2` frame ID
///
/// IDs are made of the characters `'A'..='Z'` and `'0'..='9'`.
#[derive(Clone, Debug)]
pub enum FrameId {
	/// A valid `ID3v2.3/4` frame
	Valid(String),
	/// A 3 character `ID3v2.2` frame
	///
	/// These are upgraded when read whenever possible (see [`upgrade_v2`](crate::id3::v2::upgrade_v2)).
	/// IDs that cannot be upgraded are kept as raw frames, and are discarded when writing
	/// an ID3v2.3 or ID3v2.4 tag.
	Outdated(String),
}

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// NOTE: This will not upgrade IDs.
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::FrameId;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let id_valid = FrameId::new("TPE1")?;
	/// assert!(id_valid.is_valid());
	///
	/// let id_outdated = FrameId::new("TP1")?;
	/// assert!(id_outdated.is_outdated());
	///
	/// assert!(FrameId::new("tpe1").is_err());
	/// assert!(FrameId::new("TPE12").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<String>,
	{
		let id = id.into();
		Self::verify_id(&id)?;

		match id.len() {
			3 => Ok(FrameId::Outdated(id)),
			4 => Ok(FrameId::Valid(id)),
			_ => Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.into_bytes())).into()),
		}
	}

	/// Whether this frame ID represents an outdated (ID3v2.2) ID
	pub fn is_outdated(&self) -> bool {
		matches!(self, FrameId::Outdated(_))
	}

	/// Whether this frame ID represents a valid (ID3v2.3 or ID3v2.4) ID
	pub fn is_valid(&self) -> bool {
		matches!(self, FrameId::Valid(_))
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	/// Consumes the [`FrameId`], returning the inner value
	pub fn into_inner(self) -> String {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	pub(crate) fn verify_id(id_str: &str) -> Result<()> {
		for c in id_str.chars() {
			if !c.is_ascii_uppercase() && !c.is_ascii_digit() {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id_str.as_bytes().to_vec())).into(),
				);
			}
		}

		Ok(())
	}
}

// The variant is implied by the length, so only the string matters. This keeps `Hash`
// consistent with `Borrow<str>`.
impl PartialEq for FrameId {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Eq for FrameId {}

impl Hash for FrameId {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_str().hash(state);
	}
}

impl Borrow<str> for FrameId {
	fn borrow(&self) -> &str {
		self.as_str()
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&str> for FrameId {
	type Error = crate::error::Id3Error;

	fn try_from(value: &str) -> Result<Self> {
		Self::new(value)
	}
}

/// The bit positions of each frame flag
///
/// Indices count from the most significant bit of the 16-bit flags field, so index 0
/// is `0x8000` and index 15 is `0x0001`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct FlagLayout {
	pub tag_alter_preservation: u8,
	pub file_alter_preservation: u8,
	pub read_only: u8,
	pub compressed: u8,
	pub encrypted: u8,
	pub grouped: u8,
	pub unsync: u8,
	pub data_length_indicator: Option<u8>,
}

impl FlagLayout {
	/// The layout used by ID3v2.2 and ID3v2.3
	pub const V23: Self = Self {
		tag_alter_preservation: 0,
		file_alter_preservation: 1,
		read_only: 2,
		compressed: 8,
		encrypted: 9,
		grouped: 10,
		unsync: 14,
		data_length_indicator: None,
	};

	/// The layout used by ID3v2.4 (and ID3v1, which borrows it)
	pub const V24: Self = Self {
		tag_alter_preservation: 1,
		file_alter_preservation: 2,
		read_only: 3,
		compressed: 12,
		encrypted: 13,
		grouped: 9,
		unsync: 14,
		data_length_indicator: Some(15),
	};

	/// The layout for a version family
	pub fn for_version(family: VersionFamily) -> Self {
		match family {
			VersionFamily::V2_2 | VersionFamily::V2_3 => Self::V23,
			_ => Self::V24,
		}
	}

	/// The mask of a bit index
	pub fn mask(index: u8) -> u16 {
		0x8000 >> index
	}

	/// All bits with a meaning in this layout
	pub fn known_bits(&self) -> u16 {
		let mut bits = Self::mask(self.tag_alter_preservation)
			| Self::mask(self.file_alter_preservation)
			| Self::mask(self.read_only)
			| Self::mask(self.compressed)
			| Self::mask(self.encrypted)
			| Self::mask(self.grouped)
			| Self::mask(self.unsync);

		if let Some(dli) = self.data_length_indicator {
			bits |= Self::mask(dli);
		}

		bits
	}
}

/// Various flags to describe the content of an item
///
/// The meaning of each flag is the same across versions, only the bit positions differ.
/// See [`FlagLayout`].
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// Frame is zlib compressed
	pub compressed: bool,
	/// Frame is encrypted
	///
	/// NOTE: Decryption is not supported, these frames are kept as raw data.
	pub encrypted: bool,
	/// Frame has a group identifier byte
	pub grouped: bool,
	/// Frame is unsynchronised (ID3v2.4)
	///
	/// This is cleared once the frame is read. To unsynchronise frames on write, see
	/// [`WriteOptions::unsynchronisation`](crate::config::WriteOptions::unsynchronisation).
	pub unsync: bool,
	/// Frame has a data length indicator (ID3v2.4)
	pub data_length_indicator: bool,
}

impl FrameFlags {
	/// Parse the flags with `layout`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::{FlagLayout, FrameFlags};
	///
	/// let v3 = FrameFlags::parse(0x0080, FlagLayout::V23);
	/// assert!(v3.compressed);
	///
	/// let v4 = FrameFlags::parse(0x0009, FlagLayout::V24);
	/// assert!(v4.compressed);
	/// assert!(v4.data_length_indicator);
	/// ```
	pub fn parse(flags: u16, layout: FlagLayout) -> Self {
		let set = |index: u8| flags & FlagLayout::mask(index) != 0;

		Self {
			tag_alter_preservation: set(layout.tag_alter_preservation),
			file_alter_preservation: set(layout.file_alter_preservation),
			read_only: set(layout.read_only),
			compressed: set(layout.compressed),
			encrypted: set(layout.encrypted),
			grouped: set(layout.grouped),
			unsync: set(layout.unsync),
			data_length_indicator: layout.data_length_indicator.is_some_and(set),
		}
	}

	/// Get the 16-bit representation of the flags with `layout`
	///
	/// The data length indicator is dropped in layouts without one.
	pub fn as_u16(&self, layout: FlagLayout) -> u16 {
		let mut flags = 0;

		let mut set = |index: u8, value: bool| {
			if value {
				flags |= FlagLayout::mask(index);
			}
		};

		set(layout.tag_alter_preservation, self.tag_alter_preservation);
		set(layout.file_alter_preservation, self.file_alter_preservation);
		set(layout.read_only, self.read_only);
		set(layout.compressed, self.compressed);
		set(layout.encrypted, self.encrypted);
		set(layout.grouped, self.grouped);
		set(layout.unsync, self.unsync);

		if let Some(dli) = layout.data_length_indicator {
			set(dli, self.data_length_indicator);
		}

		flags
	}
}

/// An ID3v2 frame header
///
/// These are rarely constructed by hand. Usually they are created in the background
/// when making a new [`Frame`](crate::id3::v2::Frame).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	/// The version of the tag the frame belongs to
	pub version: Id3Version,
	/// The size of the frame data, excluding the header
	pub data_size: u32,
	/// The frame flags
	pub flags: FrameFlags,
	// Reserved bits found while parsing, never written
	pub(crate) reserved_flags: u16,
}

impl FrameHeader {
	/// Create a new [`FrameHeader`]
	///
	/// NOTE: Once the header is created, the ID becomes immutable.
	///
	/// # Errors
	///
	/// * `version` is ID3v2.2, but `id` isn't a 3 character ID
	/// * `version` is anything else, but `id` isn't a 4 character ID
	pub fn new(id: FrameId, version: Id3Version) -> Result<Self> {
		let expects_outdated = version.family() == VersionFamily::V2_2;
		if id.is_outdated() != expects_outdated {
			return Err(
				Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.into_inner().into_bytes())).into(),
			);
		}

		Ok(Self {
			id,
			version,
			data_size: 0,
			flags: FrameFlags::default(),
			reserved_flags: 0,
		})
	}

	/// Get the ID of the frame
	pub fn id(&self) -> &FrameId {
		&self.id
	}

	/// The size of the header on disk
	///
	/// This is 6 bytes for ID3v2.2, and 10 bytes otherwise.
	pub fn size(&self) -> u32 {
		Self::size_for(self.version)
	}

	pub(crate) fn size_for(version: Id3Version) -> u32 {
		match version.family() {
			VersionFamily::V2_2 => 6,
			_ => 10,
		}
	}

	/// Read a `FrameHeader`
	///
	/// Returns `Ok(None)` when the stream ends, or the frame ID isn't valid. This is how the end of
	/// the frames (and the start of padding) is detected.
	///
	/// # Errors
	///
	/// `version` is not an ID3v2 version
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v2::FrameHeader;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let header = FrameHeader::parse(&mut &b"TIT2\x00\x00\x01\x00\x00\x00"[..], Id3Version::ID3_V2_4)?.unwrap();
	/// assert_eq!(header.id().as_str(), "TIT2");
	/// // Synchsafe
	/// assert_eq!(header.data_size, 0x80);
	///
	/// // Padding
	/// assert!(FrameHeader::parse(&mut &[0; 10][..], Id3Version::ID3_V2_4)?.is_none());
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(reader: &mut R, version: Id3Version) -> Result<Option<Self>>
	where
		R: Read,
	{
		match version.family() {
			VersionFamily::V2_2 => parse::parse_v2_header(reader, version),
			VersionFamily::V2_3 | VersionFamily::V2_4 => parse::parse_header(reader, version),
			_ => err!(InvalidArgument("ID3v1 tags have no frames")),
		}
	}

	/// Copy all flags from another header
	///
	/// The flags are copied by meaning, regardless of the bit layout of either version.
	pub fn copy_flags(&mut self, other: &FrameHeader) {
		self.flags = other.flags;
	}

	/// Render the header for a frame of `data_size` bytes
	///
	/// # Errors
	///
	/// * `flags.unsync` is set. Unsynchronisation must be applied to the frame data first, with
	///   the flag bit set in the output bytes.
	/// * `version` is ID3v1
	/// * `data_size` is too large for the version
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v2::{FrameHeader, FrameId};
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let mut header = FrameHeader::new(FrameId::new("TIT2")?, Id3Version::ID3_V2_3)?;
	/// assert_eq!(header.render(0x80)?, b"TIT2\x00\x00\x00\x80\x00\x00");
	///
	/// header.flags.unsync = true;
	/// assert!(header.render(0x80).is_err());
	/// # Ok(()) }
	/// ```
	pub fn render(&self, data_size: u32) -> Result<Vec<u8>> {
		if self.flags.unsync {
			err!(Unsupported(
				"Unsynchronisation must be applied before rendering the frame header"
			));
		}

		let family = self.version.family();
		let mut bytes = Vec::with_capacity(10);
		bytes.extend_from_slice(self.id.as_str().as_bytes());

		match family {
			VersionFamily::V2_2 => {
				if data_size > 0x00FF_FFFF {
					err!(TooMuchData);
				}

				bytes.extend_from_slice(&data_size.to_be_bytes()[1..]);
			},
			VersionFamily::V2_3 | VersionFamily::V2_4 => {
				let size = match family {
					VersionFamily::V2_4 => data_size.synch()?,
					_ => data_size,
				};

				bytes.extend_from_slice(&size.to_be_bytes());

				let flags = self.flags.as_u16(FlagLayout::for_version(family));
				bytes.extend_from_slice(&flags.to_be_bytes());
			},
			_ => err!(InvalidArgument("ID3v1 tags have no frames")),
		}

		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::{FlagLayout, FrameFlags, FrameHeader, FrameId};
	use crate::id3::{Id3Version, VersionFamily};

	use std::collections::HashMap;

	#[test_log::test]
	fn flag_bit_tables() {
		let v23 = FlagLayout::for_version(VersionFamily::V2_3);
		assert_eq!(FlagLayout::for_version(VersionFamily::V2_2), v23);
		assert_eq!(
			[
				v23.tag_alter_preservation,
				v23.file_alter_preservation,
				v23.read_only,
				v23.compressed,
				v23.encrypted,
				v23.grouped,
				v23.unsync,
			],
			[0, 1, 2, 8, 9, 10, 14]
		);
		assert_eq!(v23.data_length_indicator, None);

		let v24 = FlagLayout::for_version(VersionFamily::V2_4);
		assert_eq!(FlagLayout::for_version(VersionFamily::V1_1), v24);
		assert_eq!(
			[
				v24.tag_alter_preservation,
				v24.file_alter_preservation,
				v24.read_only,
				v24.compressed,
				v24.encrypted,
				v24.grouped,
				v24.unsync,
			],
			[1, 2, 3, 12, 13, 9, 14]
		);
		assert_eq!(v24.data_length_indicator, Some(15));
	}

	#[test_log::test]
	fn flags_round_trip() {
		let flags = FrameFlags {
			tag_alter_preservation: true,
			read_only: true,
			compressed: true,
			grouped: true,
			data_length_indicator: true,
			..FrameFlags::default()
		};

		let v24 = flags.as_u16(FlagLayout::V24);
		assert_eq!(v24, 0x4000 | 0x1000 | 0x0040 | 0x0008 | 0x0001);
		assert_eq!(FrameFlags::parse(v24, FlagLayout::V24), flags);

		// No data length indicator in ID3v2.3
		let v23 = flags.as_u16(FlagLayout::V23);
		assert_eq!(v23, 0x8000 | 0x2000 | 0x0080 | 0x0020);
		assert_eq!(
			FrameFlags::parse(v23, FlagLayout::V23),
			FrameFlags {
				data_length_indicator: false,
				..flags
			}
		);
	}

	#[test_log::test]
	fn copy_flags_across_layouts() {
		let mut v3 = FrameHeader::new(FrameId::new("TALB").unwrap(), Id3Version::ID3_V2_3).unwrap();
		v3.flags.file_alter_preservation = true;
		v3.flags.encrypted = true;

		let mut v4 = FrameHeader::new(FrameId::new("TALB").unwrap(), Id3Version::ID3_V2_4).unwrap();
		v4.copy_flags(&v3);

		let rendered = v4.render(1).unwrap();
		assert_eq!(&rendered[8..], &[0x20, 0x04]);
	}

	#[test_log::test]
	fn id_must_match_version() {
		assert!(FrameHeader::new(FrameId::new("TT2").unwrap(), Id3Version::ID3_V2_3).is_err());
		assert!(FrameHeader::new(FrameId::new("TIT2").unwrap(), Id3Version::ID3_V2_2).is_err());
		assert!(FrameHeader::new(FrameId::new("TT2").unwrap(), Id3Version::ID3_V2_2).is_ok());

		// There is no ID3v2.5
		assert!(Id3Version::new(2, 5, 0).is_err());
	}

	#[test_log::test]
	fn header_round_trip() {
		for (id, version) in [
			("TT2", Id3Version::ID3_V2_2),
			("TIT2", Id3Version::ID3_V2_3),
			("TIT2", Id3Version::ID3_V2_4),
		] {
			let mut header = FrameHeader::new(FrameId::new(id).unwrap(), version).unwrap();
			if version != Id3Version::ID3_V2_2 {
				header.flags.read_only = true;
			}

			let rendered = header.render(300).unwrap();
			assert_eq!(rendered.len() as u32, header.size());

			let parsed = FrameHeader::parse(&mut &rendered[..], version)
				.unwrap()
				.unwrap();
			assert_eq!(parsed.id(), header.id());
			assert_eq!(parsed.data_size, 300);
			assert_eq!(parsed.flags, header.flags);
		}
	}

	#[test_log::test]
	fn lookup_by_str() {
		let mut map = HashMap::new();
		map.insert(FrameId::new("TIT2").unwrap(), 1);

		assert_eq!(map.get("TIT2"), Some(&1));
		assert_eq!(map.get("TPE1"), None);
	}
}
