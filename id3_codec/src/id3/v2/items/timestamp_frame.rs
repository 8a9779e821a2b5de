use crate::config::{ParsingMode, WriteOptions};
use crate::date::Date;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

/// An `ID3v2` timestamp frame ("TDEN", "TDOR", "TDRC", "TDRL", and "TDTG")
///
/// Timestamps are always written as Latin-1. A frame holding an unparseable date is read with
/// `date` set to `None`, and is written with no text.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct DateFrame {
	/// The date, if it was valid
	pub date: Option<Date>,
}

impl PartialOrd for DateFrame {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DateFrame {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.date.cmp(&other.date)
	}
}

impl From<Date> for DateFrame {
	fn from(date: Date) -> Self {
		Self { date: Some(date) }
	}
}

impl DateFrame {
	/// Create a new [`DateFrame`]
	pub fn new(date: Date) -> Self {
		Self::from(date)
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;
		let text = ctx.text(reader, encoding)?;

		let mode = match ctx.parsing_mode() {
			ParsingMode::Strict => ParsingMode::Strict,
			_ => ParsingMode::BestAttempt,
		};

		match Date::parse(&text, mode) {
			Ok(date) => Ok(Self { date }),
			Err(e) => {
				ctx.report(DiagnosticKind::InvalidDate, format!("\"{text}\": {e}"))?;
				Ok(Self { date: None })
			},
		}
	}

	/// Convert a [`DateFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * The date is invalid (see [`Date::verify`])
	pub fn as_bytes(&self, _options: WriteOptions) -> Result<Vec<u8>> {
		let mut content = vec![TextEncoding::Latin1 as u8];

		if let Some(date) = self.date {
			date.verify()?;
			content.extend(date.to_string().bytes());
		}

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::DateFrame;
	use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	use crate::date::Date;
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::frame::read::ParseContext;

	#[test_log::test]
	fn parse_utf16_date() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let mut data = vec![0x01, 0xFF, 0xFE];
		for b in b"2024-06-03" {
			data.extend([*b, 0]);
		}

		let frame = DateFrame::parse(&data, &mut ctx).unwrap();
		let date = frame.date.unwrap();
		assert_eq!((date.year, date.month, date.day), (2024, Some(6), Some(3)));

		// Always written back as Latin-1
		assert_eq!(
			frame.as_bytes(WriteOptions::new()).unwrap(),
			b"\x002024-06-03"
		);
	}

	#[test_log::test]
	fn invalid_date_is_cleared() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let frame = DateFrame::parse(b"\x00last tuesday", &mut ctx).unwrap();
		assert_eq!(frame, DateFrame::default());
		assert_eq!(frame.as_bytes(WriteOptions::new()).unwrap(), [0x00]);
		assert_eq!(sink[0].kind, DiagnosticKind::InvalidDate);

		let mut strict_sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
			&mut strict_sink,
		);
		assert!(DateFrame::parse(b"\x00last tuesday", &mut ctx).is_err());
	}

	#[test_log::test]
	fn ordering() {
		let older = DateFrame::new(Date::from_year(1999));
		let newer = DateFrame::new("2001-01".parse().unwrap());
		assert!(older < newer);
	}
}
