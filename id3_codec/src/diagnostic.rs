//! Reporting of recoverable problems found while parsing
//!
//! Malformed tags are common in the wild. Rather than failing outright, the parser corrects
//! what it can, and describes each correction as a [`Diagnostic`] handed to a caller-supplied
//! [`DiagnosticSink`].
//!
//! # Examples
//!
//! ```rust
//! use id3_codec::config::ParseOptions;
//! use id3_codec::diagnostic::Diagnostic;
//! use id3_codec::id3::v2::Id3v2Tag;
//!
//! # fn main() -> id3_codec::error::Result<()> {
//! # let bytes: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new(), &mut diagnostics)?;
//!
//! for diagnostic in &diagnostics {
//! 	println!("{diagnostic}");
//! }
//! # Ok(()) }
//! ```

use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};

use std::fmt::{Display, Formatter};

/// The kinds of recoverable problems
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// A picture type outside of `0..=0x14`
	InvalidPictureType,
	/// A picture or object without a MIME type
	MissingMimeType,
	/// A picture with neither data nor a URL
	MissingImageData,
	/// A "UFID" frame with an empty owner
	EmptyUfidOwner,
	/// A "UFID" frame with an identifier over 64 bytes
	UfidTooLong,
	/// A language code that isn't 3 ASCII letters
	InvalidLanguage,
	/// A timestamp frame that doesn't hold a valid date
	InvalidDate,
	/// A "PCNT" frame smaller than 4 bytes
	ShortPlayCount,
	/// A frame with no content
	EmptyFrame,
	/// A frame ID only used by specific software
	NonstandardFrameId,
	/// A frame ID not known to this crate
	UnknownFrameId,
	/// A frame with no equivalent in the target version
	UnconvertibleFrameId,
	/// A text field that should be null terminated, but isn't
	MissingTerminator,
	/// An invalid text encoding byte, or undecodable text
	InvalidEncoding,
	/// A frame that extends past the end of the tag
	TruncatedFrame,
	/// Reserved flag bits that should be zero
	ReservedFlags,
	/// Any other malformed frame content
	BadFrame,
}

impl DiagnosticKind {
	/// Whether [`ParsingMode::Strict`] turns this diagnostic into an error
	///
	/// Unknown and nonstandard frame IDs are only informational.
	pub fn is_escalated_in_strict(self) -> bool {
		!matches!(
			self,
			Self::NonstandardFrameId | Self::UnknownFrameId | Self::UnconvertibleFrameId
		)
	}
}

/// A recoverable problem, and how it was handled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
	/// The kind of problem
	pub kind: DiagnosticKind,
	/// The frame the problem was found in, if any
	pub frame_id: Option<String>,
	/// A human readable description, including the correction made
	pub detail: String,
}

impl Diagnostic {
	/// Create a new `Diagnostic`
	pub fn new(kind: DiagnosticKind, frame_id: Option<String>, detail: impl Into<String>) -> Self {
		Self {
			kind,
			frame_id,
			detail: detail.into(),
		}
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.frame_id {
			Some(id) => write!(f, "{:?} in frame \"{id}\": {}", self.kind, self.detail),
			None => write!(f, "{:?}: {}", self.kind, self.detail),
		}
	}
}

/// A receiver of [`Diagnostic`]s
pub trait DiagnosticSink {
	/// Handle a single diagnostic
	fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards all diagnostics to [`log::warn!`]
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
	fn report(&mut self, diagnostic: Diagnostic) {
		log::warn!("{diagnostic}");
	}
}

/// Discards all diagnostics
#[derive(Copy, Clone, Debug, Default)]
pub struct IgnoreSink;

impl DiagnosticSink for IgnoreSink {
	fn report(&mut self, _: Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
	fn report(&mut self, diagnostic: Diagnostic) {
		self.push(diagnostic);
	}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
	fn report(&mut self, diagnostic: Diagnostic) {
		(**self).report(diagnostic);
	}
}

/// Routes a diagnostic according to the parsing mode
///
/// In [`ParsingMode::Strict`], escalating diagnostics become errors instead of reaching the sink.
pub(crate) fn report(
	sink: &mut dyn DiagnosticSink,
	parsing_mode: ParsingMode,
	diagnostic: Diagnostic,
) -> Result<()> {
	if parsing_mode == ParsingMode::Strict && diagnostic.kind.is_escalated_in_strict() {
		return Err(Id3v2Error::new(Id3v2ErrorKind::StrictDiagnostic(diagnostic)).into());
	}

	sink.report(diagnostic);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{Diagnostic, DiagnosticKind, DiagnosticSink, IgnoreSink, report};
	use crate::config::ParsingMode;
	use crate::error::Id3v2ErrorKind;

	fn diagnostic(kind: DiagnosticKind) -> Diagnostic {
		Diagnostic::new(kind, Some(String::from("APIC")), "corrected")
	}

	#[test_log::test]
	fn strict_escalates() {
		let mut sink: Vec<Diagnostic> = Vec::new();

		let err = report(
			&mut sink,
			ParsingMode::Strict,
			diagnostic(DiagnosticKind::InvalidPictureType),
		)
		.unwrap_err();

		assert!(matches!(
			err.id3v2_kind(),
			Some(Id3v2ErrorKind::StrictDiagnostic(d)) if d.kind == DiagnosticKind::InvalidPictureType
		));
		assert!(sink.is_empty());
	}

	#[test_log::test]
	fn informational_never_escalates() {
		let mut sink: Vec<Diagnostic> = Vec::new();

		report(
			&mut sink,
			ParsingMode::Strict,
			diagnostic(DiagnosticKind::UnknownFrameId),
		)
		.unwrap();

		assert_eq!(sink, vec![diagnostic(DiagnosticKind::UnknownFrameId)]);
	}

	#[test_log::test]
	fn sinks() {
		let mut collected: Vec<Diagnostic> = Vec::new();
		for mode in [ParsingMode::BestAttempt, ParsingMode::Relaxed] {
			report(&mut collected, mode, diagnostic(DiagnosticKind::EmptyFrame)).unwrap();
		}
		assert_eq!(collected.len(), 2);

		let mut ignore = IgnoreSink;
		ignore.report(diagnostic(DiagnosticKind::EmptyFrame));

		assert_eq!(
			diagnostic(DiagnosticKind::EmptyFrame).to_string(),
			"EmptyFrame in frame \"APIC\": corrected"
		);
	}
}
