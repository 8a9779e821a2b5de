use crate::config::WriteOptions;
use crate::diagnostic::DiagnosticKind;
use crate::error::{ErrorKind, Id3Error, Result};
use crate::id3::VersionFamily;
use crate::id3::v2::frame::read::ParseContext;
use crate::macros::err;
use crate::util::text::TextEncoding;

use std::io::{Read, Write as _};

use byteorder::{ReadBytesExt as _, WriteBytesExt as _};

// Marks an image referenced by URL rather than embedded
const URL_MIME_TYPE: &str = "-->";
const FALLBACK_MIME_TYPE: &str = "image/";

/// The picture type, according to ID3v2 APIC
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum PictureType {
	#[default]
	Other = 0x00,
	Icon = 0x01,
	OtherIcon = 0x02,
	CoverFront = 0x03,
	CoverBack = 0x04,
	Leaflet = 0x05,
	Media = 0x06,
	LeadArtist = 0x07,
	Artist = 0x08,
	Conductor = 0x09,
	Band = 0x0A,
	Composer = 0x0B,
	Lyricist = 0x0C,
	RecordingLocation = 0x0D,
	DuringRecording = 0x0E,
	DuringPerformance = 0x0F,
	ScreenCapture = 0x10,
	BrightFish = 0x11,
	Illustration = 0x12,
	BandLogo = 0x13,
	PublisherLogo = 0x14,
}

impl PictureType {
	const ALL: [Self; 21] = [
		Self::Other,
		Self::Icon,
		Self::OtherIcon,
		Self::CoverFront,
		Self::CoverBack,
		Self::Leaflet,
		Self::Media,
		Self::LeadArtist,
		Self::Artist,
		Self::Conductor,
		Self::Band,
		Self::Composer,
		Self::Lyricist,
		Self::RecordingLocation,
		Self::DuringRecording,
		Self::DuringPerformance,
		Self::ScreenCapture,
		Self::BrightFish,
		Self::Illustration,
		Self::BandLogo,
		Self::PublisherLogo,
	];

	/// Get the APIC byte for a `PictureType`
	pub fn as_u8(self) -> u8 {
		self as u8
	}
}

impl TryFrom<u8> for PictureType {
	type Error = Id3Error;

	/// Get a `PictureType` from its APIC byte
	///
	/// # Errors
	///
	/// `byte` is not in `0..=0x14`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::PictureType;
	///
	/// assert_eq!(PictureType::try_from(3).unwrap(), PictureType::CoverFront);
	/// assert!(PictureType::try_from(0x15).is_err());
	/// ```
	fn try_from(byte: u8) -> Result<Self> {
		match Self::ALL.get(usize::from(byte)) {
			Some(pic_type) => Ok(*pic_type),
			None => Err(Id3Error::new(ErrorKind::InvalidArgument(
				"Picture types must be in the range 0..=0x14",
			))),
		}
	}
}

/// Where the image data lives
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
	/// The image is embedded
	Data(Vec<u8>),
	/// The image is referenced by a URL (MIME type "-->")
	Url(String),
}

/// An `ID3v2` attached picture frame ("APIC", or "PIC" in ID3v2.2)
///
/// Images are told apart by their `description`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageFrame {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The MIME type of the image
	///
	/// This is ignored for [`ImageSource::Url`], which is always written as "-->".
	pub mime_type: String,
	/// The picture type
	pub picture_type: PictureType,
	/// Unique content description
	pub description: String,
	/// The image itself
	pub image: ImageSource,
}

impl ImageFrame {
	/// Create a new [`ImageFrame`] with embedded image data
	pub fn new(
		mime_type: impl Into<String>,
		picture_type: PictureType,
		description: impl Into<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			encoding: TextEncoding::UTF8,
			mime_type: mime_type.into(),
			picture_type,
			description: description.into(),
			image: ImageSource::Data(data),
		}
	}

	/// The embedded image data, if any
	pub fn data(&self) -> Option<&[u8]> {
		match &self.image {
			ImageSource::Data(data) => Some(data),
			ImageSource::Url(_) => None,
		}
	}

	/// The image URL, if any
	pub fn url(&self) -> Option<&str> {
		match &self.image {
			ImageSource::Url(url) => Some(url),
			ImageSource::Data(_) => None,
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;

		let mut mime_type = if ctx.version.family() == VersionFamily::V2_2 {
			let mut format = [0; 3];
			reader.read_exact(&mut format)?;

			match &format {
				b"JPG" => String::from("image/jpeg"),
				b"PNG" => String::from("image/png"),
				b"-->" => String::from(URL_MIME_TYPE),
				_ => format!(
					"image/{}",
					String::from_utf8_lossy(&format).trim().to_ascii_lowercase()
				),
			}
		} else {
			let (mime_type, rest) = ctx.split(reader, TextEncoding::Latin1)?;
			reader = rest;
			ctx.text(mime_type, TextEncoding::Latin1)?
		};

		if mime_type.is_empty() {
			ctx.report(
				DiagnosticKind::MissingMimeType,
				format!("Image has no MIME type, assuming \"{FALLBACK_MIME_TYPE}\""),
			)?;
			mime_type = String::from(FALLBACK_MIME_TYPE);
		}

		let picture_type_byte = reader.read_u8()?;
		let picture_type = match PictureType::try_from(picture_type_byte) {
			Ok(picture_type) => picture_type,
			Err(_) => {
				// Some software writes the type as an ASCII digit
				let corrected = if picture_type_byte.is_ascii_digit() {
					PictureType::try_from(picture_type_byte - b'0').unwrap_or_default()
				} else {
					PictureType::Other
				};

				ctx.report(
					DiagnosticKind::InvalidPictureType,
					format!("Invalid picture type {picture_type_byte:#04x}, using {corrected:?}"),
				)?;
				corrected
			},
		};

		let (description, rest) = ctx.split(reader, encoding)?;
		let description = ctx.text(description, encoding)?;

		let image = if mime_type == URL_MIME_TYPE {
			ImageSource::Url(ctx.text(rest, TextEncoding::Latin1)?)
		} else {
			ImageSource::Data(rest.to_vec())
		};

		let missing_data = match &image {
			ImageSource::Data(data) => data.is_empty(),
			ImageSource::Url(url) => url.is_empty(),
		};

		if missing_data {
			ctx.report(DiagnosticKind::MissingImageData, "Image has no data or URL")?;
		}

		Ok(Self {
			encoding,
			mime_type,
			picture_type,
			description,
			image,
		})
	}

	/// Convert an [`ImageFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * Too much data was provided
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	///
	/// ID3v2.2:
	///
	/// * The image format cannot be expressed as a 3 character format
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);

		let mut data = vec![encoding as u8];

		let mime_type = match self.image {
			ImageSource::Url(_) => URL_MIME_TYPE,
			ImageSource::Data(_) => self.mime_type.as_str(),
		};

		if options.version.family() == VersionFamily::V2_2 {
			data.write_all(&v2_image_format(mime_type)?)?;
		} else {
			data.write_all(&TextEncoding::Latin1.encode(
				mime_type,
				true,
				options.lossy_text_encoding,
			)?)?;
		}

		data.write_u8(self.picture_type.as_u8())?;
		data.write_all(&encoding.encode(
			&self.description,
			true,
			options.lossy_text_encoding,
		)?)?;

		match &self.image {
			ImageSource::Data(image) => data.write_all(image)?,
			ImageSource::Url(url) => data.write_all(&TextEncoding::Latin1.encode(
				url,
				false,
				options.lossy_text_encoding,
			)?)?,
		}

		if data.len() as u64 > u64::from(u32::MAX) {
			err!(TooMuchData);
		}

		Ok(data)
	}
}

fn v2_image_format(mime_type: &str) -> Result<[u8; 3]> {
	match mime_type {
		"image/jpeg" | "image/jpg" => return Ok(*b"JPG"),
		"image/png" => return Ok(*b"PNG"),
		URL_MIME_TYPE => return Ok(*b"-->"),
		_ => {},
	}

	let subtype = mime_type.strip_prefix("image/").unwrap_or(mime_type);
	match subtype.as_bytes() {
		[a, b, c] => Ok([a, b, c].map(u8::to_ascii_uppercase)),
		_ => err!(InvalidArgument(
			"ID3v2.2 image formats must be exactly 3 characters"
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::{ImageFrame, ImageSource, PictureType};
	use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::TextEncoding;
	use crate::id3::v2::frame::read::ParseContext;

	fn parse(data: &[u8], version: Id3Version, sink: &mut Vec<Diagnostic>) -> ImageFrame {
		let mut ctx = ParseContext::new(version, ParseOptions::new(), sink);
		ImageFrame::parse(data, &mut ctx).unwrap()
	}

	#[test_log::test]
	fn apic() {
		let mut sink = Vec::new();
		let frame = parse(
			b"\x00image/png\x00\x03Front\x00\x89PNG",
			Id3Version::ID3_V2_4,
			&mut sink,
		);

		assert_eq!(frame.encoding, TextEncoding::Latin1);
		assert_eq!(frame.mime_type, "image/png");
		assert_eq!(frame.picture_type, PictureType::CoverFront);
		assert_eq!(frame.description, "Front");
		assert_eq!(frame.data(), Some(&b"\x89PNG"[..]));
		assert!(sink.is_empty());
	}

	#[test_log::test]
	fn v2_pic() {
		let mut sink = Vec::new();
		let frame = parse(b"\x00JPG\x04\x00\xFF\xD8", Id3Version::ID3_V2_2, &mut sink);
		assert_eq!(frame.mime_type, "image/jpeg");
		assert_eq!(frame.picture_type, PictureType::CoverBack);

		let bytes = frame
			.as_bytes(WriteOptions::new().version(Id3Version::ID3_V2_2))
			.unwrap();
		assert_eq!(bytes, b"\x00JPG\x04\x00\xFF\xD8");
	}

	#[test_log::test]
	fn picture_type_correction() {
		let mut sink = Vec::new();

		// ASCII '3'
		let frame = parse(b"\x00image/png\x00\x33\x00data", Id3Version::ID3_V2_4, &mut sink);
		assert_eq!(frame.picture_type, PictureType::CoverFront);

		let frame = parse(b"\x00image/png\x00\x15\x00data", Id3Version::ID3_V2_4, &mut sink);
		assert_eq!(frame.picture_type, PictureType::Other);

		assert_eq!(sink.len(), 2);
		assert!(
			sink.iter()
				.all(|d| d.kind == DiagnosticKind::InvalidPictureType)
		);

		let mut strict_sink = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
			&mut strict_sink,
		);
		assert!(ImageFrame::parse(b"\x00image/png\x00\x15\x00data", &mut ctx).is_err());
	}

	#[test_log::test]
	fn linked_image() {
		let mut sink = Vec::new();
		let frame = parse(
			b"\x00-->\x00\x00\x00https://example.com/cover.jpg",
			Id3Version::ID3_V2_3,
			&mut sink,
		);

		assert_eq!(
			frame.image,
			ImageSource::Url(String::from("https://example.com/cover.jpg"))
		);
		assert_eq!(
			frame
				.as_bytes(WriteOptions::new().version(Id3Version::ID3_V2_3))
				.unwrap(),
			b"\x00-->\x00\x00\x00https://example.com/cover.jpg"
		);
	}

	#[test_log::test]
	fn missing_mime_and_data() {
		let mut sink = Vec::new();
		let frame = parse(b"\x00\x00\x00\x00", Id3Version::ID3_V2_4, &mut sink);

		assert_eq!(frame.mime_type, "image/");
		assert_eq!(frame.data(), Some(&[][..]));

		let kinds: Vec<_> = sink.iter().map(|d| d.kind).collect();
		assert_eq!(
			kinds,
			[DiagnosticKind::MissingMimeType, DiagnosticKind::MissingImageData]
		);
	}

	#[test_log::test]
	fn mime_type_is_latin1() {
		let mut frame = ImageFrame::new("image/jpëg", PictureType::Other, "", vec![1]);
		frame.encoding = TextEncoding::Latin1;

		let bytes = frame.as_bytes(WriteOptions::new()).unwrap();
		assert_eq!(&bytes[..12], b"\x00image/jp\xEBg\x00");

		let frame = ImageFrame::new("image/jp€g", PictureType::Other, "", vec![1]);
		assert!(frame.as_bytes(WriteOptions::new()).is_err());

		let bytes = frame
			.as_bytes(WriteOptions::new().lossy_text_encoding(true))
			.unwrap();
		assert_eq!(&bytes[1..12], b"image/jp?g\x00");
	}
}
