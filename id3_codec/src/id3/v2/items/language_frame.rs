use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use std::io::Read;

use byteorder::ReadBytesExt;

// Generic struct for a text frame that has a language
//
// This exists to deduplicate some code between `CommentFrame` and `LyricsFrame`
struct LanguageFrame {
	encoding: TextEncoding,
	language: [u8; 3],
	description: String,
	content: String,
}

impl LanguageFrame {
	fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;
		let language = read_language(&mut reader, ctx)?;

		let (description, content) = ctx.split(reader, encoding)?;
		let description = ctx.decode(description, encoding, [0, 0])?;
		let content = ctx.decode(content, encoding, description.bom)?.content;

		Ok(Self {
			encoding,
			language,
			description: description.content,
			content,
		})
	}

	fn create_bytes(
		encoding: TextEncoding,
		language: [u8; 3],
		description: &str,
		content: &str,
		options: WriteOptions,
	) -> Result<Vec<u8>> {
		let encoding = encoding.for_version(options.version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(verify_language(language)?);
		bytes.extend(encoding.encode(description, true, options.lossy_text_encoding)?);
		bytes.extend(encoding.encode(content, false, options.lossy_text_encoding)?);

		Ok(bytes)
	}
}

fn read_language(reader: &mut &[u8], ctx: &mut ParseContext<'_>) -> Result<[u8; 3]> {
	let mut language = [0; 3];
	reader.read_exact(&mut language)?;

	ctx.language(language)
}

fn verify_language(language: [u8; 3]) -> Result<[u8; 3]> {
	if language.iter().any(|c| !c.is_ascii_alphabetic()) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::InvalidLanguage(language)).into());
	}

	Ok(language)
}

macro_rules! language_frames {
	($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
		$(
			$(#[$meta])*
			#[derive(Clone, Debug, PartialEq, Eq, Hash)]
			pub struct $name {
				/// The encoding of the description and content
				pub encoding: TextEncoding,
				/// ISO-639-2 language code (3 bytes)
				pub language: [u8; 3],
				/// Unique content description
				pub description: String,
				/// The actual frame content
				pub content: String,
			}

			impl From<LanguageFrame> for $name {
				fn from(value: LanguageFrame) -> Self {
					Self {
						encoding: value.encoding,
						language: value.language,
						description: value.description,
						content: value.content,
					}
				}
			}

			impl $name {
				#[doc = concat!("Create a new [`", stringify!($name), "`]")]
				pub fn new(
					encoding: TextEncoding,
					language: [u8; 3],
					description: impl Into<String>,
					content: impl Into<String>,
				) -> Self {
					Self {
						encoding,
						language,
						description: description.into(),
						content: content.into(),
					}
				}

				pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
					LanguageFrame::parse(data, ctx).map(Into::into)
				}

				#[doc = concat!("Convert a [`", stringify!($name), "`] to a byte vec")]
				///
				/// # Errors
				///
				/// * `language` contains invalid characters (Only `'a'..='z'` and `'A'..='Z'` allowed)
				/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
				pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
					LanguageFrame::create_bytes(
						self.encoding,
						self.language,
						&self.description,
						&self.content,
						options,
					)
				}
			}
		)+
	};
}

language_frames! {
	/// An `ID3v2` comment frame ("COMM")
	///
	/// Comments are told apart by their description and language.
	CommentFrame,
	/// An `ID3v2` unsynchronised lyrics/text frame ("USLT")
	///
	/// Lyrics are told apart by their description and language.
	LyricsFrame,
}

/// An `ID3v2` terms of use frame ("USER")
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TermsOfUseFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// The terms of use
	pub text: String,
}

impl TermsOfUseFrame {
	/// Create a new [`TermsOfUseFrame`]
	pub fn new(encoding: TextEncoding, language: [u8; 3], text: impl Into<String>) -> Self {
		Self {
			encoding,
			language,
			text: text.into(),
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;
		let language = read_language(&mut reader, ctx)?;
		let text = ctx.text(reader, encoding)?;

		Ok(Self {
			encoding,
			language,
			text,
		})
	}

	/// Convert a [`TermsOfUseFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * `language` contains invalid characters (Only `'a'..='z'` and `'A'..='Z'` allowed)
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(verify_language(self.language)?);
		bytes.extend(encoding.encode(&self.text, false, options.lossy_text_encoding)?);

		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::{CommentFrame, LyricsFrame, TermsOfUseFrame};
	use crate::config::{ParseOptions, WriteOptions};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::TextEncoding;
	use crate::id3::v2::frame::read::ParseContext;

	#[test_log::test]
	fn comm() {
		let comment = CommentFrame::new(TextEncoding::Latin1, *b"eng", "", "hi");
		let bytes = comment.as_bytes(WriteOptions::new()).unwrap();
		assert_eq!(bytes, b"\x00eng\x00hi");

		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);
		assert_eq!(CommentFrame::parse(&bytes, &mut ctx).unwrap(), comment);
	}

	#[test_log::test]
	fn uslt_invalid_language() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_3, ParseOptions::new(), &mut sink);

		let lyrics = LyricsFrame::parse(b"\x00\x00\x00\x00\x00la la la", &mut ctx).unwrap();
		assert_eq!(lyrics.language, *b"eng");
		assert_eq!(lyrics.content, "la la la");
		assert_eq!(sink[0].kind, DiagnosticKind::InvalidLanguage);
	}

	#[test_log::test]
	fn invalid_language_on_render() {
		let comment = CommentFrame::new(TextEncoding::Latin1, *b"e1g", "", "hi");
		assert!(comment.as_bytes(WriteOptions::new()).is_err());
	}

	#[test_log::test]
	fn user() {
		let terms = TermsOfUseFrame::new(TextEncoding::UTF8, *b"deu", "Nur privat");
		let bytes = terms.as_bytes(WriteOptions::new()).unwrap();
		assert_eq!(bytes, b"\x03deuNur privat");

		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);
		assert_eq!(TermsOfUseFrame::parse(&bytes, &mut ctx).unwrap(), terms);
	}
}
