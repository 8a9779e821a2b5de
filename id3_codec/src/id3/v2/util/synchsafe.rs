//! Synchsafe integers and the unsynchronisation scheme
//!
//! MPEG decoders unaware of ID3v2 look for frame sync (`0xFF` followed by a byte `>= 0xE0`).
//! To keep tag bytes from being mistaken for audio, sizes are written as synchsafe integers
//! (7 bits per byte, MSB always clear), and content may be unsynchronised by inserting `0x00`
//! after every hazardous `0xFF`.

use crate::error::Result;

/// Unsynchronise `content`
///
/// A `0x00` is inserted after every `0xFF` that is followed by `0x00` or a byte `>= 0xE0`,
/// and after a trailing `0xFF`.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::util::synchsafe::{resynchronise, unsynchronise};
///
/// let original = [0xFF, 0xE0, 0x12, 0xFF];
/// let encoded = unsynchronise(&original);
///
/// assert_eq!(encoded, [0xFF, 0x00, 0xE0, 0x12, 0xFF, 0x00]);
/// assert_eq!(resynchronise(&encoded), original);
/// ```
pub fn unsynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + content.len() / 16);

	let mut bytes = content.iter().copied().peekable();
	while let Some(byte) = bytes.next() {
		out.push(byte);

		if byte != 0xFF {
			continue;
		}

		match bytes.peek() {
			Some(&next) if next != 0 && next < 0xE0 => {},
			_ => out.push(0),
		}
	}

	out
}

/// Reverse [`unsynchronise`], dropping every `0x00` that follows a `0xFF`
pub fn resynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut previous_ff = false;
	for &byte in content {
		if !(previous_ff && byte == 0) {
			out.push(byte);
		}

		previous_ff = byte == 0xFF;
	}

	out
}

/// An integer that can be converted to and from synchsafe variants
pub trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in 7 bits per byte of the integer type
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let number = 0xFFF_FFFF_u32;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(number.synch()?, 0x7F7F_7F7F);
	/// assert!((number + 1).synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Decode a synchsafe integer
	///
	/// The MSB of each byte is ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// assert_eq!(0x7F7F_7F7F_u32.unsynch(), 0xFFF_FFFF);
	/// assert_eq!(0x0000_0201_u32.unsynch(), 0x101);
	/// ```
	fn unsynch(self) -> Self;
}

macro_rules! impl_synchsafe {
	($($ty:ty),+) => {
		$(
			impl SynchsafeInteger for $ty {
				fn synch(self) -> Result<Self> {
					const BYTES: u32 = <$ty>::BITS / 8;
					// 7 bits are available per byte, shave off 1 bit per byte
					const MAXIMUM_INTEGER: $ty = <$ty>::MAX >> BYTES;

					if self > MAXIMUM_INTEGER {
						crate::macros::err!(TooMuchData);
					}

					let mut synched = 0;
					for i in 0..BYTES {
						synched |= ((self >> (7 * i)) & 0x7F) << (8 * i);
					}

					Ok(synched)
				}

				fn unsynch(self) -> Self {
					const BYTES: u32 = <$ty>::BITS / 8;

					let mut unsynched = 0;
					for i in 0..BYTES {
						unsynched |= ((self >> (8 * i)) & 0x7F) << (7 * i);
					}

					unsynched
				}
			}
		)+
	};
}

impl_synchsafe!(u16, u32);

#[cfg(test)]
mod tests {
	use super::{SynchsafeInteger, resynchronise, unsynchronise};

	const UNSYNCHRONIZED_CONTENT: &[u8] =
		&[0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
	const EXPECTED: &[u8] = &[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00];

	#[test_log::test]
	fn resynchronise_pairs() {
		assert_eq!(resynchronise(UNSYNCHRONIZED_CONTENT), EXPECTED);
	}

	#[test_log::test]
	fn unrelated_bytes_are_untouched() {
		const ORIGINAL_CONTENT: &[u8] = &[0xFF, 0x1A, 0xFF, 0xC0, 0x10, 0x01];

		assert_eq!(resynchronise(ORIGINAL_CONTENT), ORIGINAL_CONTENT);
		assert_eq!(unsynchronise(ORIGINAL_CONTENT), ORIGINAL_CONTENT);
	}

	#[test_log::test]
	fn unsynchronise_hazards() {
		assert_eq!(unsynchronise(&[0xFF, 0x00]), [0xFF, 0x00, 0x00]);
		assert_eq!(unsynchronise(&[0xFF, 0xFF]), [0xFF, 0x00, 0xFF, 0x00]);
		assert_eq!(unsynchronise(&[0xFF, 0xDF]), [0xFF, 0xDF]);
		assert!(unsynchronise(&[]).is_empty());
	}

	#[test_log::test]
	fn unsync_idempotence() {
		let samples: [&[u8]; 6] = [
			&[],
			&[0xFF],
			&[0xFF, 0x00, 0x00],
			&[0x00, 0xFF, 0xFF, 0xE0, 0xFF],
			&[0xFF, 0x00, 0xFF, 0xF0, 0x01, 0xFF, 0xFF, 0x00],
			UNSYNCHRONIZED_CONTENT,
		];

		for sample in samples {
			let encoded = unsynchronise(sample);
			assert_eq!(resynchronise(&encoded), sample);
			assert_eq!(unsynchronise(&resynchronise(&encoded)), encoded);
		}

		// Every byte pair
		for first in 0..=u8::MAX {
			for second in [0x00, 0x01, 0xDF, 0xE0, 0xFF] {
				let sample = [first, second, 0xFF];
				let encoded = unsynchronise(&sample);
				assert_eq!(resynchronise(&encoded), sample);
			}
		}
	}

	macro_rules! synchsafe_integer_tests {
		(
			$($int:ty => {
				synch: $original:literal, $new:literal;
				unsynch: $original_unsync:literal, $new_unsynch:literal;
			});+
		) => {
			$(
				paste::paste! {
					#[test_log::test]
					fn [<$int _synch>]() {
						assert_eq!($original.synch().unwrap(), $new);
						assert!((<$int>::MAX).synch().is_err());
					}

					#[test_log::test]
					fn [<$int _unsynch>]() {
						assert_eq!($original_unsync.unsynch(), $new_unsynch);
					}
				}
			)+
		};
	}

	synchsafe_integer_tests! {
		u16 => {
			synch:   0x3FFF_u16, 0x7F7F_u16;
			unsynch: 0x7F7F_u16, 0x3FFF_u16;
		};
		u32 => {
			synch:   0xFFF_FFFF_u32, 0x7F7F_7F7F_u32;
			unsynch: 0x7F7F_7F7F_u32, 0xFFF_FFFF_u32;
		}
	}
}
