use super::restrictions::{
	ImageEncodingRestrictions, ImageSizeRestrictions, TagRestrictions, TagSizeRestrictions,
	TextEncodingRestrictions, TextSizeRestrictions,
};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::bits::{bits_to_bytes, bits_to_decimal, bytes_to_bits, decimal_to_bits};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::{Id3Version, VersionFamily};
use crate::macros::{err, id3v2_err, try_vec};

use std::io::{Read, Write};
use std::ops::Not;
use std::sync::OnceLock;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

// ID3v2.4 flag bits, anything else must be zero
const UPDATE_FLAG: u8 = 0x40;
const CRC_FLAG: u8 = 0x20;
const RESTRICTIONS_FLAG: u8 = 0x10;
const V4_RESERVED_FLAGS: u8 = 0x8F;

// ID3v2.3 only has a CRC flag
const V3_CRC_FLAG: u16 = 0x8000;

/// The optional extended header, following the tag header
///
/// ID3v2.3 extended headers only carry a CRC and the padding size. ID3v2.4 replaced the padding
/// size with the update and restriction flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendedTagHeader {
	size: u32,
	/// The tag is an update of a tag found earlier in the file (ID3v2.4 only)
	pub update_bit: bool,
	/// Whether a CRC-32 of the frames and padding is present
	pub crc_bit: bool,
	/// The CRC-32 read from the header
	///
	/// This is recalculated when rendering.
	pub crc: Option<u32>,
	/// Whether [`ExtendedTagHeader::restrictions`] are present (ID3v2.4 only)
	pub restrictions_bit: bool,
	/// The tag restrictions, only meaningful with `restrictions_bit` set
	pub restrictions: TagRestrictions,
	/// The padding size stored in an ID3v2.3 extended header
	pub padding_size: u32,
}

impl ExtendedTagHeader {
	/// Create an empty `ExtendedTagHeader`
	pub fn new() -> Self {
		Self::default()
	}

	/// The size of the extended header as read, in bytes
	///
	/// This is the full on-disk size, including the size field itself, regardless of version.
	pub fn size(&self) -> u32 {
		self.size
	}

	/// Read an `ExtendedTagHeader`
	///
	/// The reader is expected to be positioned directly after the tag header.
	///
	/// # Errors
	///
	/// * The size is invalid for the version
	/// * Any reserved flag bit is set
	/// * The data attached to a flag has the wrong length
	/// * `version` is ID3v2.2, which has no extended header
	pub fn parse<R>(reader: &mut R, version: Id3Version) -> Result<Self>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 extended header for {version}");

		match version.family() {
			VersionFamily::V2_4 => Self::parse_v4(reader),
			VersionFamily::V2_3 => Self::parse_v3(reader),
			_ => err!(Unsupported("Only ID3v2.3 and ID3v2.4 tags have an extended header")),
		}
	}

	fn parse_v4<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		// The size includes itself
		let size = reader.read_u32::<BigEndian>()?.unsynch();
		if size < 6 {
			id3v2_err!(BadExtendedHeaderSize);
		}

		let flag_bytes = reader.read_u8()?;
		if flag_bytes != 1 {
			id3v2_err!(BadExtendedHeaderFlags(u16::from(flag_bytes)));
		}

		let flags = reader.read_u8()?;
		if flags & V4_RESERVED_FLAGS != 0 {
			id3v2_err!(BadExtendedHeaderFlags(u16::from(flags)));
		}

		let mut data = try_vec![0; (size - 6) as usize];
		reader.read_exact(&mut data)?;
		let mut data = &data[..];

		let mut header = Self {
			size,
			update_bit: flags & UPDATE_FLAG == UPDATE_FLAG,
			crc_bit: flags & CRC_FLAG == CRC_FLAG,
			restrictions_bit: flags & RESTRICTIONS_FLAG == RESTRICTIONS_FLAG,
			..Self::default()
		};

		// Every set flag is followed by its data length, and its data
		if header.update_bit {
			flag_data(&mut data, 0, "The update flag has no data")?;
		}

		if header.crc_bit {
			let crc = flag_data(&mut data, 5, "The CRC must be 5 bytes")?;

			// Stored as a 35-bit synchsafe integer
			let crc = bits_to_decimal(&bytes_to_bits(crc, 7)?)?;
			match u32::try_from(crc) {
				Ok(crc) => header.crc = Some(crc),
				Err(_) => id3v2_err!(BadExtendedHeaderData("The CRC doesn't fit in 32 bits")),
			}
		}

		if header.restrictions_bit {
			let restrictions = flag_data(&mut data, 1, "Restrictions must be 1 byte")?;
			header.restrictions = TagRestrictions::from_byte(restrictions[0]);
		}

		if !data.is_empty() {
			log::warn!(
				"Extended header has {} unused bytes, discarding",
				data.len()
			);
		}

		Ok(header)
	}

	fn parse_v3<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		// Unlike ID3v2.4, the size excludes itself, and isn't synchsafe
		let size = reader.read_u32::<BigEndian>()?;
		if size != 6 && size != 10 {
			id3v2_err!(BadExtendedHeaderSize);
		}

		let flags = reader.read_u16::<BigEndian>()?;
		if flags & !V3_CRC_FLAG != 0 {
			id3v2_err!(BadExtendedHeaderFlags(flags));
		}

		let crc_bit = flags & V3_CRC_FLAG == V3_CRC_FLAG;
		if crc_bit != (size == 10) {
			id3v2_err!(BadExtendedHeaderData(
				"The CRC flag doesn't match the header size"
			));
		}

		let padding_size = reader.read_u32::<BigEndian>()?;

		let mut crc = None;
		if crc_bit {
			crc = Some(reader.read_u32::<BigEndian>()?);
		}

		Ok(Self {
			size: size + 4,
			crc_bit,
			crc,
			padding_size,
			..Self::default()
		})
	}

	/// Render the extended header
	///
	/// When `crc_bit` is set, the CRC is calculated over `frame_data`, followed by
	/// `padding_len` zeros.
	///
	/// For ID3v2.3, the update and restriction flags have no representation, and are dropped.
	///
	/// # Errors
	///
	/// `version` is not ID3v2.3 or ID3v2.4
	pub fn render(&self, version: Id3Version, frame_data: &[u8], padding_len: u32) -> Result<Vec<u8>> {
		let crc = self
			.crc_bit
			.then(|| calculate_crc(frame_data, padding_len));

		let mut bytes = Vec::with_capacity(16);
		match version.family() {
			VersionFamily::V2_4 => {
				let mut flags = 0;
				let mut flag_data = Vec::new();

				if self.update_bit {
					flags |= UPDATE_FLAG;
					flag_data.push(0);
				}

				if let Some(crc) = crc {
					flags |= CRC_FLAG;
					flag_data.push(5);
					flag_data.extend(encode_crc(crc));
				}

				if self.restrictions_bit {
					flags |= RESTRICTIONS_FLAG;
					flag_data.push(1);
					flag_data.push(self.restrictions.as_byte());
				}

				let size = 6 + flag_data.len() as u32;
				bytes.write_u32::<BigEndian>(size.synch()?)?;
				bytes.write_u8(1)?;
				bytes.write_u8(flags)?;
				bytes.write_all(&flag_data)?;
			},
			VersionFamily::V2_3 => {
				if self.update_bit || self.restrictions_bit {
					log::warn!("ID3v2.3 has no update or restriction flags, discarding");
				}

				let (size, flags) = match crc {
					Some(_) => (10, V3_CRC_FLAG),
					None => (6, 0),
				};

				bytes.write_u32::<BigEndian>(size)?;
				bytes.write_u16::<BigEndian>(flags)?;
				bytes.write_u32::<BigEndian>(padding_len)?;

				if let Some(crc) = crc {
					bytes.write_u32::<BigEndian>(crc)?;
				}
			},
			_ => err!(Unsupported("Only ID3v2.3 and ID3v2.4 tags have an extended header")),
		}

		Ok(bytes)
	}

	/// Set the tag size restriction, enabling restrictions
	pub fn set_tag_size_restriction(&mut self, restriction: TagSizeRestrictions) {
		self.restrictions_bit = true;
		self.restrictions.size = restriction;
	}

	/// Set the text encoding restriction, enabling restrictions
	pub fn set_text_encoding_restriction(&mut self, restriction: TextEncodingRestrictions) {
		self.restrictions_bit = true;
		self.restrictions.text_encoding = restriction;
	}

	/// Set the text field size restriction, enabling restrictions
	pub fn set_text_size_restriction(&mut self, restriction: TextSizeRestrictions) {
		self.restrictions_bit = true;
		self.restrictions.text_fields_size = restriction;
	}

	/// Set the image encoding restriction, enabling restrictions
	pub fn set_image_encoding_restriction(&mut self, restriction: ImageEncodingRestrictions) {
		self.restrictions_bit = true;
		self.restrictions.image_encoding = restriction;
	}

	/// Set the image size restriction, enabling restrictions
	pub fn set_image_size_restriction(&mut self, restriction: ImageSizeRestrictions) {
		self.restrictions_bit = true;
		self.restrictions.image_size = restriction;
	}
}

// Take the data attached to a flag: a length byte, followed by `expected_len` bytes
fn flag_data<'a>(data: &mut &'a [u8], expected_len: u8, message: &'static str) -> Result<&'a [u8]> {
	let Some((&len, rest)) = data.split_first() else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderData(message)).into());
	};

	if len != expected_len || rest.len() < usize::from(len) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderData(message)).into());
	}

	let (value, rest) = rest.split_at(usize::from(len));
	*data = rest;
	Ok(value)
}

fn crc_32_table() -> &'static [u32; 256] {
	static INSTANCE: OnceLock<[u32; 256]> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut crc32_table = [0; 256];

		for (n, entry) in crc32_table.iter_mut().enumerate() {
			*entry = (0..8).fold(n as u32, |acc, _| match acc & 1 {
				1 => 0xEDB8_8320 ^ (acc >> 1),
				_ => acc >> 1,
			});
		}

		crc32_table
	})
}

fn calculate_crc(frame_data: &[u8], padding_len: u32) -> u32 {
	let padding = std::iter::repeat_n(&0_u8, padding_len as usize);

	frame_data
		.iter()
		.chain(padding)
		.fold(!0, |crc, octet| {
			(crc >> 8) ^ crc_32_table()[((crc ^ u32::from(*octet)) & 0xFF) as usize]
		})
		.not()
}

// The CRC-32 is stored as a 35-bit synchsafe integer, leaving the upper four bits zeroed
fn encode_crc(crc: u32) -> [u8; 5] {
	let bits = decimal_to_bits(u64::from(crc), 35);

	let mut encoded = [0; 5];
	for (byte, group) in encoded.iter_mut().zip(bits.chunks(7)) {
		*byte = bits_to_bytes(group)[0];
	}

	encoded
}
