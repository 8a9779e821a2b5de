use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

/// The contents of a popularimeter ("POPM") frame
///
/// Popularimeters are told apart by their `email`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PopularityFrame {
	/// An email address of the user performing the rating
	pub email: String,
	/// A rating of 1-255, where 1 is the worst and 255 is the best.
	/// A rating of 0 is unknown.
	pub rating: u8,
	/// A play counter for the user. It is to be incremented each time the file is played.
	///
	/// The counter may be omitted entirely, in which case it is read as 0.
	pub counter: u64,
}

impl PopularityFrame {
	/// Create a new [`PopularityFrame`]
	pub fn new(email: impl Into<String>, rating: u8, counter: u64) -> Self {
		Self {
			email: email.into(),
			rating,
			counter,
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let (email, mut reader) = ctx.split(data, TextEncoding::Latin1)?;
		let email = ctx.text(email, TextEncoding::Latin1)?;

		let rating = reader.read_u8()?;

		let counter;
		let remaining_size = reader.len();
		if remaining_size > 8 {
			counter = u64::MAX;
		} else {
			let mut counter_bytes = [0; 8];
			let counter_start_pos = 8 - remaining_size;

			counter_bytes[counter_start_pos..].copy_from_slice(reader);
			counter = u64::from_be_bytes(counter_bytes);
		}

		Ok(Self {
			email,
			rating,
			counter,
		})
	}

	/// Convert a [`PopularityFrame`] into an ID3v2 POPM frame byte Vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the email is not Latin-1
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let mut content = Vec::with_capacity(self.email.len() + 9);
		content.extend(TextEncoding::Latin1.encode(
			&self.email,
			true,
			options.lossy_text_encoding,
		)?);
		content.push(self.rating);

		// At least 4 bytes, growing a byte at a time like "PCNT"
		let counter_bytes = self.counter.to_be_bytes();
		let start = counter_bytes
			.iter()
			.position(|b| *b != 0)
			.map_or(4, |first| first.min(4));
		content.extend(&counter_bytes[start..]);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::PopularityFrame;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::diagnostic::Diagnostic;
	use crate::id3::Id3Version;
	use crate::id3::v2::frame::read::ParseContext;

	fn test_popm(popm: &PopularityFrame) {
		let email = popm.email.clone();
		let rating = popm.rating;
		let counter = popm.counter;

		let popm_bytes = popm.as_bytes(WriteOptions::default()).unwrap();
		assert_eq!(&popm_bytes[..email.len()], email.as_bytes());
		assert_eq!(popm_bytes[email.len()], 0);
		assert_eq!(popm_bytes[email.len() + 1], rating);

		let counter_len = if u32::try_from(counter).is_ok() {
			4
		} else {
			let counter_bytes = counter.to_be_bytes();
			let i = counter_bytes.iter().position(|b| *b != 0).unwrap_or(4);
			counter_bytes.len() - i
		};

		assert_eq!(popm_bytes[email.len() + 2..].len(), counter_len);

		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);
		assert_eq!(&PopularityFrame::parse(&popm_bytes, &mut ctx).unwrap(), popm);
	}

	#[test_log::test]
	fn write_popm() {
		let popm_u32_boundary = PopularityFrame::new("foo@bar.com", 255, u64::from(u32::MAX));
		test_popm(&popm_u32_boundary);

		let popm_u40 = PopularityFrame::new("baz@qux.com", 196, u64::from(u32::MAX) + 1);
		test_popm(&popm_u40);
	}

	#[test_log::test]
	fn counter_omitted() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let popm = PopularityFrame::parse(b"a@b.c\x00\x80", &mut ctx).unwrap();
		assert_eq!(popm, PopularityFrame::new("a@b.c", 128, 0));
	}
}
