//! Bit level conversions
//!
//! Bits are always MSB first. These are mostly useful for fields that are not byte aligned,
//! such as the 35-bit synchsafe CRC of an ID3v2.4 extended header.

use crate::error::Result;
use crate::macros::err;

/// The smallest value accepted by [`signed_int16_to_bytes`]
pub const MIN_INT16: i32 = -32767;
/// One past the largest value accepted by [`signed_int16_to_bytes`]
pub const MAX_INT16: i32 = 32768;

/// Split bytes into bits, keeping only the low `bits_per_byte` bits of each byte
///
/// # Errors
///
/// `bits_per_byte` is not within `1..=8`
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::util::bits::bytes_to_bits;
///
/// # fn main() -> id3_codec::error::Result<()> {
/// assert_eq!(bytes_to_bits(&[0b1000_0001], 8)?, [true, false, false, false, false, false, false, true]);
///
/// // The high bit is dropped
/// assert_eq!(bytes_to_bits(&[0b1000_0001], 7)?, [false, false, false, false, false, false, true]);
/// # Ok(()) }
/// ```
pub fn bytes_to_bits(bytes: &[u8], bits_per_byte: u32) -> Result<Vec<bool>> {
	if !(1..=8).contains(&bits_per_byte) {
		err!(InvalidArgument("Bits per byte must be within 1..=8"));
	}

	let mut bits = Vec::with_capacity(bytes.len() * bits_per_byte as usize);
	for byte in bytes {
		for shift in (0..bits_per_byte).rev() {
			bits.push((byte >> shift) & 1 == 1);
		}
	}

	Ok(bits)
}

/// Pack bits into bytes
///
/// Bits are grouped from the end, so a length that isn't a multiple of 8 is zero padded on the left.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::util::bits::bits_to_bytes;
///
/// assert_eq!(bits_to_bytes(&[true, false, false, false, false, false, false, false, false]), [0x01, 0x00]);
/// ```
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
	let padding = (8 - bits.len() % 8) % 8;

	let padded = std::iter::repeat_n(false, padding).chain(bits.iter().copied());

	let mut bytes = Vec::with_capacity((bits.len() + padding) / 8);
	let mut current = 0_u8;
	for (index, bit) in padded.enumerate() {
		current = (current << 1) | u8::from(bit);

		if index % 8 == 7 {
			bytes.push(current);
			current = 0;
		}
	}

	bytes
}

/// Interpret bits as an unsigned integer
///
/// # Errors
///
/// More than 64 bits are provided
pub fn bits_to_decimal(bits: &[bool]) -> Result<u64> {
	if bits.len() > 64 {
		err!(TooMuchData);
	}

	Ok(bits
		.iter()
		.fold(0_u64, |value, &bit| (value << 1) | u64::from(bit)))
}

/// The bits of `value`, left padded with zeros to at least `pad` bits
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::util::bits::decimal_to_bits;
///
/// assert_eq!(decimal_to_bits(5, 0), [true, false, true]);
/// assert_eq!(decimal_to_bits(5, 4), [false, true, false, true]);
/// assert_eq!(decimal_to_bits(0, 0), [false]);
/// ```
pub fn decimal_to_bits(value: u64, pad: usize) -> Vec<bool> {
	let significant = (u64::BITS - value.leading_zeros()).max(1) as usize;
	let width = significant.max(pad);

	(0..width)
		.rev()
		.map(|shift| shift < 64 && (value >> shift) & 1 == 1)
		.collect()
}

/// Convert the bits of a plain integer into its synchsafe form
///
/// The result is always 32 bits, four 7-bit groups each preceded by a clear bit.
///
/// # Errors
///
/// * `bits` is longer than 32 bits
/// * The value needs more than 28 bits
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::util::bits::{bits_to_decimal, decimal_to_bits, decimal_to_synchsafe};
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let synchsafe = decimal_to_synchsafe(&decimal_to_bits(0x101, 32))?;
/// assert_eq!(bits_to_decimal(&synchsafe)?, 0x0201);
///
/// assert!(decimal_to_synchsafe(&decimal_to_bits(1 << 28, 32)).is_err());
/// # Ok(()) }
/// ```
pub fn decimal_to_synchsafe(bits: &[bool]) -> Result<Vec<bool>> {
	if bits.len() > 32 {
		err!(InvalidArgument("Synchsafe integers cannot exceed 32 bits"));
	}

	let value = bits_to_decimal(bits)?;
	if value >= 1 << 28 {
		err!(InvalidArgument("Synchsafe integers cannot exceed 28 significant bits"));
	}

	let mut synchsafe = Vec::with_capacity(32);
	for group in (0..4).rev() {
		synchsafe.push(false);
		synchsafe.extend(decimal_to_bits((value >> (7 * group)) & 0x7F, 7));
	}

	Ok(synchsafe)
}

/// Encode a signed 16-bit integer, big endian
///
/// # Errors
///
/// `value` is outside of [`MIN_INT16`]`..`[`MAX_INT16`] or doesn't fit in 16 bits
pub fn signed_int16_to_bytes(value: i32) -> Result<[u8; 2]> {
	if !(MIN_INT16..MAX_INT16).contains(&value) {
		err!(InvalidArgument("Value is outside of the signed 16-bit range"));
	}

	match i16::try_from(value) {
		Ok(value) => Ok(value.to_be_bytes()),
		Err(_) => err!(InvalidArgument("Value is outside of the signed 16-bit range")),
	}
}

/// Decode a big endian signed 16-bit integer
///
/// # Errors
///
/// * `bytes` is not exactly 2 bytes long
/// * The value is outside of [`MIN_INT16`]`..`[`MAX_INT16`] (only `0x8000`)
pub fn bytes_to_signed_int16(bytes: &[u8]) -> Result<i16> {
	let &[a, b] = bytes else {
		err!(InvalidArgument("Signed 16-bit integers must be exactly 2 bytes"));
	};

	let value = i16::from_be_bytes([a, b]);
	if i32::from(value) < MIN_INT16 {
		err!(InvalidArgument("Value is outside of the signed 16-bit range"));
	}

	Ok(value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn bad_bits_per_byte() {
		assert!(bytes_to_bits(&[0xFF], 0).is_err());
		assert!(bytes_to_bits(&[0xFF], 9).is_err());
		assert!(bytes_to_bits(&[0xFF], 1).unwrap() == [true]);
	}

	#[test_log::test]
	fn bytes_bits_round_trip() {
		let bytes = [0x00, 0x7F, 0x80, 0xFF, 0x12];
		let bits = bytes_to_bits(&bytes, 8).unwrap();

		assert_eq!(bits.len(), 40);
		assert_eq!(bits_to_bytes(&bits), bytes);
	}

	#[test_log::test]
	fn decimal_round_trip() {
		for value in [0, 1, 127, 128, 0xFFFF, u64::from(u32::MAX), u64::MAX] {
			let bits = decimal_to_bits(value, 64);
			assert_eq!(bits.len(), 64);
			assert_eq!(bits_to_decimal(&bits).unwrap(), value);
		}

		assert!(bits_to_decimal(&[false; 65]).is_err());
	}

	#[test_log::test]
	fn synchsafe_range() {
		for value in [0_u64, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x0FFF_FFFF] {
			let synchsafe = decimal_to_synchsafe(&decimal_to_bits(value, 32)).unwrap();
			assert_eq!(synchsafe.len(), 32);

			// Reading the bytes back 7 bits at a time recovers the value
			let bytes = bits_to_bytes(&synchsafe);
			assert!(bytes.iter().all(|b| b & 0x80 == 0));

			let recovered = bits_to_decimal(&bytes_to_bits(&bytes, 7).unwrap()).unwrap();
			assert_eq!(recovered, value);
		}

		assert!(decimal_to_synchsafe(&decimal_to_bits(1 << 28, 32)).is_err());
		assert!(decimal_to_synchsafe(&decimal_to_bits(u64::from(u32::MAX), 32)).is_err());
		assert!(decimal_to_synchsafe(&[false; 33]).is_err());
	}

	#[test_log::test]
	fn signed_int16() {
		for value in [MIN_INT16, -1, 0, 1, MAX_INT16 - 1] {
			let bytes = signed_int16_to_bytes(value).unwrap();
			assert_eq!(i32::from(bytes_to_signed_int16(&bytes).unwrap()), value);
		}

		assert!(signed_int16_to_bytes(MIN_INT16 - 1).is_err());
		assert!(signed_int16_to_bytes(MAX_INT16).is_err());
		assert!(bytes_to_signed_int16(&[0x80, 0x00]).is_err());
		assert!(bytes_to_signed_int16(&[0x00]).is_err());
		assert!(bytes_to_signed_int16(&[0x00, 0x00, 0x00]).is_err());
	}
}
