use crate::config::{ParseOptions, WriteOptions};
use crate::date::Date;
use crate::error::Result;
use crate::id3::Id3Version;
use crate::id3::v2::items::CommentFrame;
use crate::id3::v2::{Id3v2Tag, TextEncoding};

use std::borrow::Cow;
use std::io::Write;

/// An ID3v1 tag
///
/// ID3v1 is a severely limited format, with each field being incredibly small in size. All
/// fields have been commented with their maximum sizes and any other additional restrictions.
///
/// Attempting to write a field greater than the maximum size will **not** error, it will just be
/// shrunk.
///
/// ## Conversions
///
/// A tag can be created from an [`Id3v2Tag`], keeping only what fits. The first comment
/// without a description (or the first comment, if none have an empty description) is used.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v1::Id3v1Tag;
/// use id3_codec::id3::v2::Id3v2Tag;
///
/// let mut id3v2 = Id3v2Tag::new();
/// id3v2.set_title("Song");
/// id3v2.set_track_num(Some(3), Some(12));
///
/// let id3v1 = Id3v1Tag::from(&id3v2);
/// assert_eq!(id3v1.title.as_deref(), Some("Song"));
/// // The total can't be stored
/// assert_eq!(id3v1.track_number, Some(3));
/// ```
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year, 4 digits max
	pub year: Option<u16>,
	/// A short comment
	///
	/// The maximum length is dependent upon the track number field (30 bytes max if it is `None`,
	/// 28 bytes max if it is `Some`).
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// Issues:
	///
	/// * The track number **cannot** be 0. Many readers, including this one, will treat a 0
	///   track number as "no track number".
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// A genre of 255 is treated as "no genre".
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `Id3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v1::Id3v1Tag;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether every field is `None`
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	/// The layout the tag is written with
	///
	/// This is ID3v1.1 when a track number is present, and ID3v1.0 otherwise.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v1::Id3v1Tag;
	///
	/// let mut tag = Id3v1Tag::new();
	/// assert_eq!(tag.version(), Id3Version::ID3_V1_0);
	///
	/// tag.track_number = Some(1);
	/// assert_eq!(tag.version(), Id3Version::ID3_V1_1);
	/// ```
	pub fn version(&self) -> Id3Version {
		if self.track_number.is_some() {
			return Id3Version::ID3_V1_1;
		}

		Id3Version::ID3_V1_0
	}

	/// The release year as a [`Date`]
	pub fn date(&self) -> Option<Date> {
		self.year.map(Date::from_year)
	}

	/// Render the tag (see [`Id3v1Tag::render`]) and write it to `writer`
	///
	/// # Errors
	///
	/// * See [`Id3v1Tag::render`]
	/// * `writer` fails
	pub fn dump_to<W: Write>(&self, writer: &mut W, options: WriteOptions) -> Result<()> {
		let bytes = self.render(options)?;
		writer.write_all(&bytes)?;

		Ok(())
	}
}

impl From<&Id3v2Tag> for Id3v1Tag {
	fn from(tag: &Id3v2Tag) -> Self {
		let comment = tag
			.comments()
			.find(|comment| comment.description.is_empty())
			.or_else(|| tag.comments().next())
			.map(|comment| comment.content.clone());

		Self {
			title: tag.title().map(Cow::into_owned),
			artist: tag.artist().map(Cow::into_owned),
			album: tag.album().map(Cow::into_owned),
			year: tag.recording_date().map(|date| date.year),
			comment,
			track_number: tag.track_num().0.and_then(|number| u8::try_from(number).ok()),
			genre: tag.genre_id(),
		}
	}
}

impl From<Id3v1Tag> for Id3v2Tag {
	fn from(tag: Id3v1Tag) -> Self {
		let mut id3v2 = Id3v2Tag::new();

		if let Some(title) = tag.title {
			id3v2.set_title(title);
		}

		if let Some(artist) = tag.artist {
			id3v2.set_artist(artist);
		}

		if let Some(album) = tag.album {
			id3v2.set_album(album);
		}

		if let Some(year) = tag.year {
			id3v2.set_recording_date(Date::from_year(year));
		}

		if let Some(comment) = tag.comment {
			let _ = id3v2.set_comment(CommentFrame::new(
				TextEncoding::Latin1,
				ParseOptions::DEFAULT_LANGUAGE,
				"",
				comment,
			));
		}

		if let Some(track_number) = tag.track_number {
			id3v2.set_track_num(Some(u32::from(track_number)), None);
		}

		if let Some(genre) = tag.genre {
			id3v2.set_genre(genre.to_string());
		}

		id3v2
	}
}

#[cfg(test)]
mod tests {
	use crate::config::{ParsingMode, WriteOptions};
	use crate::date::Date;
	use crate::id3::Id3Version;
	use crate::id3::v1::Id3v1Tag;
	use crate::id3::v2::items::CommentFrame;
	use crate::id3::v2::{Id3v2Tag, TextEncoding};

	fn full_tag() -> Id3v1Tag {
		Id3v1Tag {
			title: Some(String::from("Foo title")),
			artist: Some(String::from("Bar artist")),
			album: Some(String::from("Baz album")),
			year: Some(1984),
			comment: Some(String::from("Qux comment")),
			track_number: Some(1),
			genre: Some(32),
		}
	}

	#[test_log::test]
	fn id3v1_re_read() {
		let tag = full_tag();

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();
		assert_eq!(writer.len(), 128);

		let reparsed = Id3v1Tag::parse(writer.try_into().unwrap(), ParsingMode::Strict).unwrap();
		assert_eq!(tag, reparsed);
	}

	#[test_log::test]
	fn id3v1_to_id3v2() {
		let id3v2 = Id3v2Tag::from(full_tag());

		assert_eq!(id3v2.title().as_deref(), Some("Foo title"));
		assert_eq!(id3v2.artist().as_deref(), Some("Bar artist"));
		assert_eq!(id3v2.album().as_deref(), Some("Baz album"));
		assert_eq!(id3v2.recording_date(), Some(Date::from_year(1984)));
		assert_eq!(id3v2.comment("", *b"eng").unwrap().content, "Qux comment");
		assert_eq!(id3v2.track_num(), (Some(1), None));
		assert_eq!(id3v2.genre_id(), Some(32));
	}

	#[test_log::test]
	fn id3v2_to_id3v1() {
		let mut id3v2 = Id3v2Tag::from(full_tag());
		id3v2.set_recording_date(Date {
			year: 1999,
			month: Some(10),
			day: Some(11),
			hour: Some(12),
			minute: Some(13),
			second: Some(14),
		});
		let _ = id3v2.set_comment(CommentFrame::new(
			TextEncoding::UTF8,
			*b"eng",
			"described",
			"Not this one",
		));
		// Can't be stored in a single byte
		id3v2.set_track_num(Some(300), None);

		let id3v1 = Id3v1Tag::from(&id3v2);
		assert_eq!(id3v1.year, Some(1999));
		assert_eq!(id3v1.date(), Some(Date::from_year(1999)));
		assert_eq!(id3v1.comment.as_deref(), Some("Qux comment"));
		assert_eq!(id3v1.track_number, None);
		assert_eq!(id3v1.genre, Some(32));
		assert_eq!(id3v1.version(), Id3Version::ID3_V1_0);
	}

	#[test_log::test]
	fn lossy_encodings() {
		let tag = Id3v1Tag {
			artist: Some(String::from("l—Ñfty")),
			..Id3v1Tag::default()
		};

		// Lossy encoding should pass
		let mut bytes = Vec::new();
		tag.dump_to(&mut bytes, WriteOptions::new().lossy_text_encoding(true))
			.unwrap();

		let id3v1 = Id3v1Tag::parse(bytes.try_into().unwrap(), ParsingMode::BestAttempt).unwrap();
		assert_eq!(id3v1.artist.as_deref(), Some("l?Ñfty"));

		// And should fail when disabled
		tag.dump_to(&mut Vec::new(), WriteOptions::new().lossy_text_encoding(false))
			.unwrap_err();
	}
}
