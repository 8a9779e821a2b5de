use crate::error::Result;
use crate::macros::err;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// The legal ID3 version families
///
/// All parsing and rendering decisions are made on the family, never the exact revision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum VersionFamily {
	V1_0,
	V1_1,
	V2_2,
	V2_3,
	V2_4,
}

/// An ID3 version, as `(major, minor, revision)`
///
/// Equality and ordering only consider `(major, minor)`, so `v2.4.0` and `v2.4.1` compare equal.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::{Id3Version, VersionFamily};
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let version = Id3Version::new(2, 3, 0)?;
/// assert_eq!(version, Id3Version::ID3_V2_3);
/// assert_eq!(version.family(), VersionFamily::V2_3);
/// assert!(version < Id3Version::ID3_V2_4);
/// assert_eq!(version.to_string(), "v2.3.0");
///
/// // There is no ID3v2.5
/// assert!(Id3Version::new(2, 5, 0).is_err());
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Id3Version {
	major: u8,
	minor: u8,
	revision: u8,
}

impl Id3Version {
	/// ID3v1.0
	pub const ID3_V1_0: Self = Self::from_parts(1, 0, 0);
	/// ID3v1.1
	pub const ID3_V1_1: Self = Self::from_parts(1, 1, 0);
	/// ID3v2.2
	pub const ID3_V2_2: Self = Self::from_parts(2, 2, 0);
	/// ID3v2.3
	pub const ID3_V2_3: Self = Self::from_parts(2, 3, 0);
	/// ID3v2.4
	pub const ID3_V2_4: Self = Self::from_parts(2, 4, 0);

	const fn from_parts(major: u8, minor: u8, revision: u8) -> Self {
		Self {
			major,
			minor,
			revision,
		}
	}

	/// Create a new `Id3Version`
	///
	/// # Errors
	///
	/// `(major, minor)` is not one of `1.0`, `1.1`, `2.2`, `2.3`, or `2.4`
	pub fn new(major: u8, minor: u8, revision: u8) -> Result<Self> {
		match (major, minor) {
			(1, 0 | 1) | (2, 2..=4) => Ok(Self::from_parts(major, minor, revision)),
			_ => err!(InvalidArgument("Unknown ID3 version")),
		}
	}

	/// The major version (1 or 2)
	pub fn major(self) -> u8 {
		self.major
	}

	/// The minor version
	pub fn minor(self) -> u8 {
		self.minor
	}

	/// The revision
	pub fn revision(self) -> u8 {
		self.revision
	}

	/// The family this version belongs to
	pub fn family(self) -> VersionFamily {
		match (self.major, self.minor) {
			(1, 0) => VersionFamily::V1_0,
			(1, _) => VersionFamily::V1_1,
			(2, 2) => VersionFamily::V2_2,
			(2, 3) => VersionFamily::V2_3,
			_ => VersionFamily::V2_4,
		}
	}

	/// Whether this is an ID3v1 version
	pub fn is_v1(self) -> bool {
		self.major == 1
	}

	/// Whether this is an ID3v2 version
	pub fn is_v2(self) -> bool {
		self.major == 2
	}
}

impl PartialEq for Id3Version {
	fn eq(&self, other: &Self) -> bool {
		(self.major, self.minor) == (other.major, other.minor)
	}
}

impl Eq for Id3Version {}

impl Hash for Id3Version {
	fn hash<H: Hasher>(&self, state: &mut H) {
		(self.major, self.minor).hash(state);
	}
}

impl PartialOrd for Id3Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Id3Version {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.major, self.minor).cmp(&(other.major, other.minor))
	}
}

impl Display for Id3Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "v{}.{}.{}", self.major, self.minor, self.revision)
	}
}

#[cfg(test)]
mod tests {
	use super::{Id3Version, VersionFamily};

	#[test_log::test]
	fn families() {
		for (major, minor, family) in [
			(1, 0, VersionFamily::V1_0),
			(1, 1, VersionFamily::V1_1),
			(2, 2, VersionFamily::V2_2),
			(2, 3, VersionFamily::V2_3),
			(2, 4, VersionFamily::V2_4),
		] {
			assert_eq!(Id3Version::new(major, minor, 0).unwrap().family(), family);
		}
	}

	#[test_log::test]
	fn out_of_range() {
		for (major, minor) in [(0, 0), (1, 2), (2, 0), (2, 1), (2, 5), (3, 0)] {
			assert!(Id3Version::new(major, minor, 0).is_err());
		}
	}

	#[test_log::test]
	fn revision_ignored() {
		let v240 = Id3Version::new(2, 4, 0).unwrap();
		let v241 = Id3Version::new(2, 4, 1).unwrap();

		assert_eq!(v240, v241);
		assert_eq!(v241.revision(), 1);
		assert_eq!(v241.to_string(), "v2.4.1");
		assert!(Id3Version::ID3_V1_1 < Id3Version::ID3_V2_2);
		assert!(Id3Version::ID3_V2_3 < Id3Version::ID3_V2_4);
	}
}
