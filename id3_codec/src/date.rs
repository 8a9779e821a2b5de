//! The date format used by ID3v2.4 timestamp frames

use crate::config::ParsingMode;
use crate::error::{ErrorKind, Id3Error, Result};
use crate::macros::{err, parse_mode_choice};

use std::fmt::Display;
use std::str::FromStr;

use byteorder::ReadBytesExt;

/// A subset of the ISO 8601 date format
///
/// Valid forms are `yyyy`, `yyyy-MM`, `yyyy-MM-dd`, `yyyy-MM-ddTHH`, `yyyy-MM-ddTHH:mm`
/// and `yyyy-MM-ddTHH:mm:ss`.
///
/// # Examples
///
/// ```rust
/// use id3_codec::date::Date;
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let date: Date = "2024-06-03T14:08".parse()?;
/// assert_eq!(date.year, 2024);
/// assert_eq!(date.minute, Some(8));
/// assert_eq!(date.second, None);
///
/// // A space is accepted in place of the "T"
/// let spaced: Date = "2024-06-03 14:08".parse()?;
/// assert_eq!(date, spaced);
/// assert_eq!(spaced.to_string(), "2024-06-03T14:08");
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[allow(missing_docs)]
pub struct Date {
	pub year: u16,
	pub month: Option<u8>,
	pub day: Option<u8>,
	pub hour: Option<u8>,
	pub minute: Option<u8>,
	pub second: Option<u8>,
}

impl PartialOrd for Date {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Date {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.year
			.cmp(&other.year)
			.then(self.month.cmp(&other.month))
			.then(self.day.cmp(&other.day))
			.then(self.hour.cmp(&other.hour))
			.then(self.minute.cmp(&other.minute))
			.then(self.second.cmp(&other.second))
	}
}

impl Display for Date {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}", self.year)?;

		if let Some(month) = self.month {
			write!(f, "-{month:02}")?;

			if let Some(day) = self.day {
				write!(f, "-{day:02}")?;

				if let Some(hour) = self.hour {
					write!(f, "T{hour:02}")?;

					if let Some(minute) = self.minute {
						write!(f, ":{minute:02}")?;

						if let Some(second) = self.second {
							write!(f, ":{second:02}")?;
						}
					}
				}
			}
		}

		Ok(())
	}
}

impl FromStr for Date {
	type Err = Id3Error;

	fn from_str(s: &str) -> Result<Self> {
		Date::parse(s, ParsingMode::BestAttempt)?
			.ok_or_else(|| Id3Error::new(ErrorKind::BadDate("Date is empty")))
	}
}

impl Date {
	/// The maximum length of a date in bytes
	pub const MAX_LENGTH: usize = 19;

	const SEPARATORS: [u8; 4] = [b'-', b'T', b' ', b':'];

	/// Create a `Date` with only a year
	pub fn from_year(year: u16) -> Self {
		Self {
			year,
			..Self::default()
		}
	}

	/// Parse a [`Date`]
	///
	/// Returns `Ok(None)` for empty input.
	///
	/// NOTES:
	///
	/// * When not using [`ParsingMode::Strict`], leading and trailing whitespace is ignored,
	///   and segments may be missing their zero padding ("2024-6-3")
	///
	/// # Errors
	///
	/// * The date is malformed
	/// * A segment is outside of its valid range
	pub fn parse(text: &str, parse_mode: ParsingMode) -> Result<Option<Self>> {
		macro_rules! read_segment {
			($expr:expr) => {
				match $expr {
					Ok((_, 0)) => break,
					Ok((val, _)) => Some(val as u8),
					Err(e) => return Err(e),
				}
			};
		}

		let text = parse_mode_choice!(
			parse_mode,
			STRICT: text,
			DEFAULT: text.trim(),
		);

		if text.is_empty() {
			if parse_mode == ParsingMode::Strict {
				err!(BadDate("Date is empty"))
			}

			return Ok(None);
		}

		if text.len() > Self::MAX_LENGTH {
			err!(BadDate("Date is too long"))
		}

		// It is valid for a date to contain no separators, but this will lower our tolerance
		// for common mistakes. The "T" separator is ignored here because it is **ALWAYS** required.
		let contains_separators = text
			.bytes()
			.any(|b| b != b'T' && b != b' ' && Self::SEPARATORS.contains(&b));

		let reader = &mut text.as_bytes();
		let mut date = Date::default();

		// The year must be exactly 4 digits. This doesn't matter for other segments.
		let (year, bytes_read) = Self::segment::<4>(reader, None, parse_mode)?;
		if bytes_read != 4 {
			err!(BadDate("Encountered an invalid year length (should be 4 digits)"))
		}

		date.year = year;

		#[allow(clippy::never_loop)]
		loop {
			date.month = read_segment!(Self::segment::<2>(
				reader,
				contains_separators.then_some(b'-'),
				parse_mode
			));
			date.day = read_segment!(Self::segment::<2>(
				reader,
				contains_separators.then_some(b'-'),
				parse_mode
			));
			date.hour = read_segment!(Self::segment::<2>(reader, Some(b'T'), parse_mode));
			date.minute = read_segment!(Self::segment::<2>(
				reader,
				contains_separators.then_some(b':'),
				parse_mode
			));
			date.second = read_segment!(Self::segment::<2>(
				reader,
				contains_separators.then_some(b':'),
				parse_mode
			));
			break;
		}

		if !reader.is_empty() {
			if parse_mode == ParsingMode::Strict {
				err!(BadDate("Date has trailing data"))
			}

			log::warn!("Discarding trailing data after date: {:?}", reader);
		}

		date.verify()?;
		Ok(Some(date))
	}

	fn segment<const SIZE: usize>(
		content: &mut &[u8],
		sep: Option<u8>,
		parse_mode: ParsingMode,
	) -> Result<(u16, usize)> {
		const STOP_PARSING: (u16, usize) = (0, 0);

		if content.is_empty() {
			return Ok(STOP_PARSING);
		}

		if let Some(sep) = sep {
			let byte = content.read_u8()?;

			// A space is a common substitute for the "T"
			let matches = byte == sep || (sep == b'T' && byte == b' ');
			if !matches {
				if parse_mode == ParsingMode::Strict {
					err!(BadDate("Expected a separator"))
				}

				return Ok(STOP_PARSING);
			}
		}

		let mut num = None;
		let mut byte_count = 0;
		for i in content.iter().copied().take(SIZE) {
			if !i.is_ascii_digit() {
				// Missing zero padding, we're eating into the next segment's separator
				if sep.is_some() && Self::SEPARATORS.contains(&i) && parse_mode != ParsingMode::Strict {
					break;
				}

				err!(BadDate("Date segment contains non-digit characters"))
			}

			num = Some(num.unwrap_or(0) * 10 + u16::from(i - b'0'));
			byte_count += 1;
		}

		let Some(parsed_num) = num else {
			if parse_mode == ParsingMode::Strict {
				err!(BadDate("Date segment is empty"))
			}

			return Ok(STOP_PARSING);
		};

		if byte_count < SIZE && parse_mode == ParsingMode::Strict {
			err!(BadDate("Date segment is too short"))
		}

		*content = &content[byte_count..];

		Ok((parsed_num, byte_count))
	}

	/// Verify that every segment is within its range
	///
	/// # Errors
	///
	/// Any segment is out of range, or is present without the one before it
	pub fn verify(&self) -> Result<()> {
		fn verify_field(field: Option<u8>, range: std::ops::RangeInclusive<u8>, parent: bool) -> bool {
			match field {
				Some(field) => parent && range.contains(&field),
				// Field does not exist, so it's valid
				None => true,
			}
		}

		if self.year > 9999
			|| !verify_field(self.month, 1..=12, true)
			|| !verify_field(self.day, 1..=31, self.month.is_some())
			|| !verify_field(self.hour, 0..=23, self.day.is_some())
			|| !verify_field(self.minute, 0..=59, self.hour.is_some())
			|| !verify_field(self.second, 0..=59, self.minute.is_some())
		{
			err!(BadDate("Date contains segment(s) that exceed their limits"))
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Date;
	use crate::config::ParsingMode;

	fn expected() -> Date {
		// 2024-06-03T14:08:49
		Date {
			year: 2024,
			month: Some(6),
			day: Some(3),
			hour: Some(14),
			minute: Some(8),
			second: Some(49),
		}
	}

	#[test_log::test]
	fn display() {
		assert_eq!(expected().to_string(), "2024-06-03T14:08:49");
		assert_eq!(Date::from_year(1999).to_string(), "1999");
	}

	#[test_log::test]
	fn every_precision() {
		let full = expected();
		for (text, precision) in [
			("2024", 1),
			("2024-06", 2),
			("2024-06-03", 3),
			("2024-06-03T14", 4),
			("2024-06-03T14:08", 5),
			("2024-06-03T14:08:49", 6),
		] {
			let date = Date::parse(text, ParsingMode::Strict).unwrap().unwrap();
			assert_eq!(date.to_string(), text);

			let fields = [
				date.month.is_some(),
				date.day.is_some(),
				date.hour.is_some(),
				date.minute.is_some(),
				date.second.is_some(),
			];
			assert_eq!(fields.iter().filter(|f| **f).count(), precision - 1);
			assert!(date <= full);
		}
	}

	#[test_log::test]
	fn missing_zero_padding() {
		let date = Date::parse("2024-6-3T14:8:49", ParsingMode::BestAttempt)
			.unwrap()
			.unwrap();
		assert_eq!(date, expected());

		assert!(Date::parse("2024-6-3", ParsingMode::Strict).is_err());
	}

	#[test_log::test]
	fn no_separators() {
		let date = Date::parse("20240603T140849", ParsingMode::Strict)
			.unwrap()
			.unwrap();
		assert_eq!(date, expected());
	}

	#[test_log::test]
	fn space_separator() {
		let date = Date::parse(" 2024-06-03 14:08:49 ", ParsingMode::BestAttempt)
			.unwrap()
			.unwrap();
		assert_eq!(date, expected());
	}

	#[test_log::test]
	fn invalid() {
		for text in ["24", "2024-13", "2024-06-32", "2024-06-03T25", "abcd", "2024-00"] {
			assert!(Date::parse(text, ParsingMode::BestAttempt).is_err(), "{text}");
		}

		assert!(Date::parse("", ParsingMode::BestAttempt).unwrap().is_none());
		assert!(Date::parse("", ParsingMode::Strict).is_err());
	}
}
