use super::content::parse_content;
use super::{Frame, FrameContent};
use crate::config::{ParseOptions, ParsingMode};
use crate::diagnostic::{self, Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::FrameHeader;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, resynchronise};
use crate::id3::{Id3Version, VersionFamily};
use crate::macros::{err, id3v2_err};
use crate::util::text::{
	DecodeTextResult, TextDecodeOptions, TextEncoding, decode_text, split_terminated,
};

/// Everything needed to decode frame content
///
/// Holds the diagnostic sink, so recoverable problems can be reported (and escalated) from
/// anywhere within a frame.
pub(crate) struct ParseContext<'a> {
	pub(crate) version: Id3Version,
	pub(crate) options: ParseOptions,
	pub(crate) frame_id: Option<String>,
	sink: &'a mut dyn DiagnosticSink,
}

impl<'a> ParseContext<'a> {
	pub(crate) fn new(
		version: Id3Version,
		options: ParseOptions,
		sink: &'a mut dyn DiagnosticSink,
	) -> Self {
		Self {
			version,
			options,
			frame_id: None,
			sink,
		}
	}

	pub(crate) fn parsing_mode(&self) -> ParsingMode {
		self.options.parsing_mode
	}

	/// Report a problem in the current frame
	///
	/// # Errors
	///
	/// The problem is escalated by [`ParsingMode::Strict`]
	pub(crate) fn report(&mut self, kind: DiagnosticKind, detail: impl Into<String>) -> Result<()> {
		diagnostic::report(
			&mut *self.sink,
			self.options.parsing_mode,
			Diagnostic::new(kind, self.frame_id.clone(), detail),
		)
	}

	/// Interpret a text encoding byte
	pub(crate) fn encoding(&mut self, byte: u8) -> Result<TextEncoding> {
		let Some(encoding) = TextEncoding::from_u8(byte) else {
			if self.parsing_mode() == ParsingMode::BestAttempt {
				self.report(
					DiagnosticKind::InvalidEncoding,
					format!("Invalid text encoding byte {byte:#04x}, assuming Latin-1"),
				)?;
				return Ok(TextEncoding::Latin1);
			}

			err!(TextDecode("Found invalid encoding"));
		};

		if self.version.family() == VersionFamily::V2_2
			&& matches!(encoding, TextEncoding::UTF16BE | TextEncoding::UTF8)
		{
			self.report(
				DiagnosticKind::InvalidEncoding,
				format!("ID3v2.2 only supports Latin-1 and UTF-16, found {encoding:?}"),
			)?;
		}

		Ok(encoding)
	}

	/// Decode a single text field
	///
	/// `bom` is used for UTF-16 fields without a BOM of their own.
	pub(crate) fn decode(
		&mut self,
		bytes: &[u8],
		encoding: TextEncoding,
		bom: [u8; 2],
	) -> Result<DecodeTextResult> {
		let options = TextDecodeOptions::new().encoding(encoding).bom(bom);

		match decode_text(bytes, options) {
			Ok(decoded) => Ok(decoded),
			Err(e) if self.parsing_mode() == ParsingMode::BestAttempt => {
				self.report(
					DiagnosticKind::InvalidEncoding,
					format!("{e}, decoding lossily"),
				)?;
				decode_text(bytes, options.lossy(true))
			},
			Err(e) => Err(e),
		}
	}

	/// Shorthand for [`ParseContext::decode`] with no BOM
	pub(crate) fn text(&mut self, bytes: &[u8], encoding: TextEncoding) -> Result<String> {
		Ok(self.decode(bytes, encoding, [0, 0])?.content)
	}

	/// Split a terminated field from the rest of the content
	///
	/// A missing terminator is reported, and the entire input becomes the field.
	pub(crate) fn split<'d>(
		&mut self,
		data: &'d [u8],
		encoding: TextEncoding,
	) -> Result<(&'d [u8], &'d [u8])> {
		match split_terminated(data, encoding) {
			Some(split) => Ok(split),
			None => {
				self.report(
					DiagnosticKind::MissingTerminator,
					"Expected a null terminated field, using the remaining content",
				)?;
				Ok((data, &[]))
			},
		}
	}

	/// Verify a language code, substituting the default language when invalid
	pub(crate) fn language(&mut self, language: [u8; 3]) -> Result<[u8; 3]> {
		if language.iter().all(u8::is_ascii_alphabetic) {
			return Ok(language);
		}

		let default = self.options.default_language;
		self.report(
			DiagnosticKind::InvalidLanguage,
			format!(
				"Invalid language {language:02x?}, substituting \"{}\"",
				String::from_utf8_lossy(&default)
			),
		)?;

		Ok(default)
	}
}

// Take a fixed size field from the frame envelope
fn take_prefix<const N: usize>(body: &mut &[u8]) -> Result<[u8; N]> {
	if body.len() < N {
		id3v2_err!(BadFrameLength);
	}

	let (prefix, rest) = body.split_at(N);
	*body = rest;

	let mut bytes = [0; N];
	bytes.copy_from_slice(prefix);
	Ok(bytes)
}

impl Frame {
	/// Decode a frame from its header and the `data_size` bytes following it
	///
	/// The frame envelope (group, encryption, size prefixes) is consumed here, then compression and
	/// unsynchronisation are undone before the content is decoded.
	pub(crate) fn parse(
		mut header: FrameHeader,
		mut body: &[u8],
		ctx: &mut ParseContext<'_>,
	) -> Result<Self> {
		ctx.frame_id = Some(header.id.as_str().to_owned());

		let family = header.version.family();
		let flags = header.flags;

		let mut group_id = None;
		let mut encrypt_method = None;
		let mut decompressed_size = None;

		match family {
			VersionFamily::V2_3 => {
				if flags.compressed {
					log::trace!("Reading decompressed size");
					decompressed_size = Some(u32::from_be_bytes(take_prefix::<4>(&mut body)?));
				}

				if flags.encrypted {
					log::trace!("Reading encryption method symbol");
					encrypt_method = Some(take_prefix::<1>(&mut body)?[0]);
				}

				if flags.grouped {
					log::trace!("Reading group identifier");
					group_id = Some(take_prefix::<1>(&mut body)?[0]);
				}
			},
			VersionFamily::V2_4 => {
				if flags.grouped {
					log::trace!("Reading group identifier");
					group_id = Some(take_prefix::<1>(&mut body)?[0]);
				}

				if flags.encrypted {
					log::trace!("Reading encryption method symbol");
					encrypt_method = Some(take_prefix::<1>(&mut body)?[0]);
				}

				// Compressed frames always carry a data length indicator, some writers just forget the flag
				if flags.data_length_indicator || flags.compressed {
					log::trace!("Reading data length indicator");
					decompressed_size =
						Some(u32::from_be_bytes(take_prefix::<4>(&mut body)?).unsynch());
				}
			},
			_ => {},
		}

		// Frames must have at least 1 byte, *after* all of the additional data flags can provide
		if body.is_empty() {
			id3v2_err!(BadFrameLength);
		}

		let resynchronised;
		let body: &[u8] = if flags.unsync {
			log::trace!("Resynchronising frame content");
			resynchronised = resynchronise(body);
			&resynchronised
		} else {
			body
		};

		// The content is no longer unsynchronised
		header.flags.unsync = false;
		// Written whenever it is needed, only compressed and encrypted frames depend on it
		header.flags.data_length_indicator &= flags.compressed || flags.encrypted;

		if flags.encrypted {
			if family == VersionFamily::V2_4 && decompressed_size.is_none() {
				id3v2_err!(MissingDataLengthIndicator);
			}

			// Nothing further we can do with encrypted frames
			log::debug!("Frame \"{}\" is encrypted, keeping it as raw data", header.id);
			return Ok(Self {
				header,
				group_id,
				encrypt_method,
				decompressed_size,
				content: FrameContent::Raw(body.to_vec()),
			});
		}

		if flags.compressed {
			let Some(decompressed) = decompress(body, decompressed_size)? else {
				return Ok(Self {
					header,
					group_id,
					encrypt_method,
					decompressed_size,
					content: FrameContent::Raw(body.to_vec()),
				});
			};

			let content = parse_content(&header.id, &decompressed, ctx)?;
			return Ok(Self {
				header,
				group_id,
				encrypt_method,
				decompressed_size,
				content,
			});
		}

		let content = parse_content(&header.id, body, ctx)?;
		Ok(Self {
			header,
			group_id,
			encrypt_method,
			decompressed_size,
			content,
		})
	}
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(body: &[u8], decompressed_size: Option<u32>) -> Result<Option<Vec<u8>>> {
	use crate::util::alloc::VecFallibleCapacity as _;
	use std::io::Read as _;

	log::trace!("Decompressing frame content");

	let mut decompressed = Vec::try_with_capacity_stable(decompressed_size.unwrap_or(0) as usize)?;
	flate2::read::ZlibDecoder::new(body)
		.read_to_end(&mut decompressed)
		.map_err(|e| Id3v2Error::new(Id3v2ErrorKind::Decompression(e)))?;

	if let Some(expected) = decompressed_size {
		if decompressed.len() != expected as usize {
			log::warn!(
				"Decompressed frame size mismatch (expected: {expected}, got: {})",
				decompressed.len()
			);
		}
	}

	Ok(Some(decompressed))
}

// Compressed frames are kept as raw data, and cannot be written back
#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn decompress(_: &[u8], _: Option<u32>) -> Result<Option<Vec<u8>>> {
	log::warn!("Encountered a compressed frame, support is disabled");
	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::ParseContext;
	use crate::config::{ParseOptions, ParsingMode};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::{Frame, FrameContent, FrameHeader, FrameId, TextEncoding};

	fn frame_header(id: &str, version: Id3Version) -> FrameHeader {
		FrameHeader::new(FrameId::new(id).unwrap(), version).unwrap()
	}

	#[test_log::test]
	fn v3_envelope_order() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_3, ParseOptions::new(), &mut sink);

		let mut header = frame_header("ABCD", Id3Version::ID3_V2_3);
		header.flags.encrypted = true;
		header.flags.grouped = true;

		// Encryption method, then group
		let frame = Frame::parse(header, &[0x80, 0x05, 0xDE, 0xAD], &mut ctx).unwrap();
		assert_eq!(frame.encrypt_method, Some(0x80));
		assert_eq!(frame.group_id, Some(0x05));
		assert_eq!(frame.content, FrameContent::Raw(vec![0xDE, 0xAD]));
	}

	#[test_log::test]
	fn v4_envelope_order() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let mut header = frame_header("ABCD", Id3Version::ID3_V2_4);
		header.flags.encrypted = true;
		header.flags.grouped = true;
		header.flags.data_length_indicator = true;

		// Group, then encryption method, then the data length indicator
		let frame = Frame::parse(
			header.clone(),
			&[0x05, 0x80, 0x00, 0x00, 0x01, 0x00, 0xBE, 0xEF],
			&mut ctx,
		)
		.unwrap();
		assert_eq!(frame.group_id, Some(0x05));
		assert_eq!(frame.encrypt_method, Some(0x80));
		assert_eq!(frame.decompressed_size(), Some(0x80));

		// Encrypted ID3v2.4 frames need a data length indicator
		header.flags.data_length_indicator = false;
		assert!(Frame::parse(header, &[0x05, 0x80, 0xBE, 0xEF], &mut ctx).is_err());
	}

	#[test_log::test]
	fn empty_after_envelope() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_3, ParseOptions::new(), &mut sink);

		let mut header = frame_header("TIT2", Id3Version::ID3_V2_3);
		header.flags.grouped = true;

		assert!(Frame::parse(header, &[0x01], &mut ctx).is_err());
	}

	#[test_log::test]
	fn frame_unsync() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let mut header = frame_header("ABCD", Id3Version::ID3_V2_4);
		header.flags.unsync = true;

		let frame = Frame::parse(header, &[0xFF, 0x00, 0xE0, 0x01], &mut ctx).unwrap();
		assert_eq!(frame.content, FrameContent::Raw(vec![0xFF, 0xE0, 0x01]));
		assert!(!frame.flags().unsync);
	}

	#[test_log::test]
	#[cfg(feature = "id3v2_compression_support")]
	fn oversized_decompressed_size() {
		use crate::error::ErrorKind;

		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_3, ParseOptions::new(), &mut sink);

		let mut header = frame_header("TIT2", Id3Version::ID3_V2_3);
		header.flags.compressed = true;

		let err = Frame::parse(header, &[0xFF, 0xFF, 0xFF, 0xFF, 0x78, 0x9C], &mut ctx).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::TooMuchData));
	}

	#[test_log::test]
	fn invalid_encoding_by_mode() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);
		assert_eq!(ctx.encoding(9).unwrap(), TextEncoding::Latin1);

		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Relaxed),
			&mut sink,
		);
		assert!(ctx.encoding(9).is_err());

		assert_eq!(sink.len(), 1);
		assert_eq!(sink[0].kind, DiagnosticKind::InvalidEncoding);
	}

	#[test_log::test]
	fn lossy_decode_in_best_attempt() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let text = ctx.text(&[0x61, 0xFF, 0x62], TextEncoding::UTF8).unwrap();
		assert_eq!(text, "a\u{FFFD}b");

		let mut strict_sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
			&mut strict_sink,
		);
		assert!(ctx.text(&[0x61, 0xFF, 0x62], TextEncoding::UTF8).is_err());
	}

	#[test_log::test]
	fn invalid_language() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().default_language(*b"deu"),
			&mut sink,
		);

		assert_eq!(ctx.language(*b"fra").unwrap(), *b"fra");
		assert_eq!(ctx.language([0, 0, 0]).unwrap(), *b"deu");
		assert_eq!(sink[0].kind, DiagnosticKind::InvalidLanguage);
	}
}
