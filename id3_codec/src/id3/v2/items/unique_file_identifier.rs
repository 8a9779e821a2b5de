use crate::config::WriteOptions;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::macros::err;
use crate::util::text::TextEncoding;

/// An `ID3v2` unique file identifier frame ("UFID")
///
/// Identifiers are told apart by their `owner`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueFileIdFrame {
	/// The non-empty owner of the identifier.
	pub owner: String,
	/// The binary payload with up to 64 bytes of data.
	pub identifier: Vec<u8>,
}

impl UniqueFileIdFrame {
	/// The owner substituted for frames that are missing one
	pub const DUMMY_OWNER: &'static str = "http://www.id3.org/dummy/ufid.html";

	/// The maximum length of `identifier`
	pub const MAX_IDENTIFIER_LEN: usize = 64;

	/// Create a new [`UniqueFileIdFrame`]
	pub fn new(owner: impl Into<String>, identifier: Vec<u8>) -> Self {
		Self {
			owner: owner.into(),
			identifier,
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let (owner, identifier) = ctx.split(data, TextEncoding::Latin1)?;

		let mut owner = ctx.text(owner, TextEncoding::Latin1)?;
		if owner.is_empty() {
			ctx.report(
				DiagnosticKind::EmptyUfidOwner,
				format!("UFID has no owner, using \"{}\"", Self::DUMMY_OWNER),
			)?;
			owner = String::from(Self::DUMMY_OWNER);
		}

		let mut identifier = identifier.to_vec();
		if identifier.len() > Self::MAX_IDENTIFIER_LEN {
			ctx.report(
				DiagnosticKind::UfidTooLong,
				format!(
					"UFID identifier is {} bytes, truncating to {}",
					identifier.len(),
					Self::MAX_IDENTIFIER_LEN
				),
			)?;
			identifier.truncate(Self::MAX_IDENTIFIER_LEN);
		}

		Ok(Self { owner, identifier })
	}

	/// Encode the frame contents as bytes
	///
	/// # Errors
	///
	/// * `owner` is empty
	/// * `identifier` is longer than 64 bytes
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the owner is not Latin-1
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let Self { owner, identifier } = self;

		if owner.is_empty() {
			err!(InvalidArgument("UFID owners cannot be empty"));
		}

		if identifier.len() > Self::MAX_IDENTIFIER_LEN {
			err!(InvalidArgument("UFID identifiers cannot exceed 64 bytes"));
		}

		let mut content = Vec::with_capacity(owner.len() + 1 + identifier.len());
		content.extend(TextEncoding::Latin1.encode(owner, true, options.lossy_text_encoding)?);
		content.extend_from_slice(identifier);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::UniqueFileIdFrame;
	use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::frame::read::ParseContext;

	#[test_log::test]
	fn empty_owner() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let frame = UniqueFileIdFrame::parse(b"\x00\x01\x02", &mut ctx).unwrap();
		assert_eq!(frame.owner, UniqueFileIdFrame::DUMMY_OWNER);
		assert_eq!(frame.identifier, [1, 2]);
		assert_eq!(sink[0].kind, DiagnosticKind::EmptyUfidOwner);

		let mut strict_sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
			&mut strict_sink,
		);
		assert!(UniqueFileIdFrame::parse(b"\x00\x01\x02", &mut ctx).is_err());
	}

	#[test_log::test]
	fn identifier_is_truncated() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let mut data = b"http://musicbrainz.org\x00".to_vec();
		data.extend([b'a'; 70]);

		let frame = UniqueFileIdFrame::parse(&data, &mut ctx).unwrap();
		assert_eq!(frame.identifier.len(), UniqueFileIdFrame::MAX_IDENTIFIER_LEN);
		assert_eq!(sink[0].kind, DiagnosticKind::UfidTooLong);

		// Re-renders without complaint
		assert!(frame.as_bytes(WriteOptions::new()).is_ok());
	}

	#[test_log::test]
	fn render_validates() {
		let frame = UniqueFileIdFrame::new("", vec![1]);
		assert!(frame.as_bytes(WriteOptions::new()).is_err());

		let frame = UniqueFileIdFrame::new("owner", vec![0; 65]);
		assert!(frame.as_bytes(WriteOptions::new()).is_err());
	}
}
