mod conversion;

use super::extended_header::ExtendedTagHeader;
use super::frame_set::FrameSet;
use super::header::{ID3V2_FOOTER_MAGIC, TagHeader};
use super::items::{
	CommentFrame, DateFrame, ImageFrame, LyricsFrame, ObjectFrame, PlayCountFrame,
	PopularityFrame, PrivateFrame, TermsOfUseFrame, UniqueFileIdFrame, UserTextFrame,
	UserUrlFrame,
};
use super::util::pairs::{format_number_pair, split_number_pair};
use super::{Frame, FrameContent};
use crate::config::{ParseOptions, WriteOptions};
use crate::date::Date;
use crate::diagnostic::DiagnosticSink;
use crate::error::Result;
use crate::id3::Id3Version;
use crate::util::text::TextEncoding;

use std::borrow::Cow;
use std::io::{Read, Write};

const V4_MULTI_VALUE_SEPARATOR: char = '\0';

// Used exclusively for the text accessors
fn remove_separators(value: &str) -> Cow<'_, str> {
	if !value.contains(V4_MULTI_VALUE_SEPARATOR) {
		return Cow::Borrowed(value);
	}

	Cow::Owned(value.replace(V4_MULTI_VALUE_SEPARATOR, "/"))
}

macro_rules! text_accessors {
	($($name:ident => $id:literal;)+) => {
		paste::paste! {
			$(
				#[doc = concat!("Get the text of the \"", $id, "\" frame")]
				///
				/// Multiple values are joined with `"/"`.
				pub fn $name(&self) -> Option<Cow<'_, str>> {
					self.text($id).map(remove_separators)
				}

				#[doc = concat!("Set the text of the \"", $id, "\" frame, replacing any existing ones")]
				pub fn [<set_ $name>](&mut self, value: impl Into<String>) {
					self.set_known_text($id, value.into());
				}

				#[doc = concat!("Remove the \"", $id, "\" frame")]
				pub fn [<remove_ $name>](&mut self) {
					let _ = self.frames.remove($id);
				}
			)+
		}
	}
}

macro_rules! content_accessors {
	($($(#[$meta:meta])* $name:ident => $id:literal, $variant:ident($type:ty);)+) => {
		$(
			$(#[$meta])*
			pub fn $name(&self) -> impl Iterator<Item = &$type> {
				self.frames.get($id).iter().filter_map(|frame| match &frame.content {
					FrameContent::$variant(content) => Some(content),
					_ => None,
				})
			}
		)+
	}
}

/// An `ID3v2` tag
///
/// The tag holds its frames in a [`FrameSet`], along with the header information it was
/// read with. The frame set allows any number of frames per ID, the accessors on this type
/// keep frames unique where the format requires it:
///
/// * Text frames (`TIT2`, `TPE1`, etc.) are unique by ID
/// * `COMM` and `USLT` are unique by description and language
/// * `TXXX`, `WXXX`, `APIC` and `GEOB` are unique by description
/// * `UFID` is unique by owner
///
/// ## Text accessors
///
/// As ID3v2.4 allows for multiple values to exist in a single frame, the raw strings, as provided
/// by [`Id3v2Tag::text`], may contain null separators. In the convenience getters (`title`,
/// `artist`, etc.), the separators are replaced with `"/"`.
///
/// ## Writing
///
/// Tags can only be written as ID3v2.3 or ID3v2.4, see [`Id3v2Tag::convert`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Tag {
	pub(super) header: TagHeader,
	pub(super) extended_header: Option<ExtendedTagHeader>,
	pub(super) frames: FrameSet,
	padding: u32,
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self {
			header: TagHeader {
				version: Id3Version::ID3_V2_4,
				unsync: false,
				extended: false,
				experimental: false,
				footer: false,
				tag_size: 0,
			},
			extended_header: None,
			frames: FrameSet::new(),
			padding: 0,
		}
	}
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = Box<dyn Iterator<Item = &'a Frame> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		(&self.frames).into_iter()
	}
}

impl Id3v2Tag {
	/// Create a new empty ID3v2.4 tag
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v2::Id3v2Tag;
	///
	/// let tag = Id3v2Tag::new();
	/// assert_eq!(tag.version(), Id3Version::ID3_V2_4);
	/// assert!(tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Read a tag
	///
	/// The reader is expected to be at the start of the tag. If no tag is found, `Ok(None)`
	/// is returned. Recoverable problems are reported to `sink`.
	///
	/// # Errors
	///
	/// * The tag header or extended header is invalid, see [`TagHeader::parse`]
	/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) is used and the frames are invalid
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::ParseOptions;
	/// use id3_codec::diagnostic::LogSink;
	/// use id3_codec::id3::v2::Id3v2Tag;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let bytes = b"ID3\x04\x00\x00\x00\x00\x00\x0FTIT2\x00\x00\x00\x05\x00\x00\x00Song";
	///
	/// let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new(), &mut LogSink)?.unwrap();
	/// assert_eq!(tag.title().as_deref(), Some("Song"));
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(
		reader: &mut R,
		options: ParseOptions,
		sink: &mut dyn DiagnosticSink,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Some(header) = TagHeader::parse(reader)? else {
			log::debug!("No ID3v2 tag found");
			return Ok(None);
		};

		log::debug!(
			"Parsing ID3v2 tag, version: {}, size: {}",
			header.version,
			header.tag_size
		);

		let extended_header = if header.extended {
			Some(ExtendedTagHeader::parse(reader, header.version)?)
		} else {
			None
		};

		let mut frames = FrameSet::new();
		let padding = frames.parse(reader, &header, extended_header.as_ref(), options, sink)?;

		if header.footer {
			let mut footer = [0; TagHeader::SIZE as usize];
			match reader.read_exact(&mut footer) {
				Ok(()) if &footer[..3] == ID3V2_FOOTER_MAGIC => {},
				_ => log::warn!("Tag claims to have a footer, but none was found"),
			}
		}

		Ok(Some(Self {
			header,
			extended_header,
			frames,
			padding,
		}))
	}

	/// Render the tag for `options.version`
	///
	/// The tag is converted to the target version first (see [`Id3v2Tag::convert`]).
	/// An empty tag renders to nothing.
	///
	/// # Errors
	///
	/// * `options.version` is not ID3v2.3 or ID3v2.4
	/// * Any frame fails to render, see [`FrameContent::as_bytes`]
	/// * The tag is too large
	pub fn render(&self, options: WriteOptions) -> Result<Vec<u8>> {
		super::write::create_tag(self, options)
	}

	/// Render the tag (see [`Id3v2Tag::render`]) and write it to `writer`
	///
	/// # Errors
	///
	/// * See [`Id3v2Tag::render`]
	/// * `writer` fails
	pub fn dump_to<W: Write>(&self, writer: &mut W, options: WriteOptions) -> Result<()> {
		let bytes = self.render(options)?;
		writer.write_all(&bytes)?;

		Ok(())
	}

	/// The version of the tag
	///
	/// For tags that were read, this is the version they were stored as, until they are converted.
	pub fn version(&self) -> Id3Version {
		self.header.version
	}

	/// The header the tag was read with
	///
	/// The size and flags are recalculated when writing.
	pub fn header(&self) -> &TagHeader {
		&self.header
	}

	/// The extended header, if there is one
	pub fn extended_header(&self) -> Option<&ExtendedTagHeader> {
		self.extended_header.as_ref()
	}

	/// Set or remove the extended header
	pub fn set_extended_header(&mut self, extended_header: Option<ExtendedTagHeader>) {
		self.header.extended = extended_header.is_some();
		self.extended_header = extended_header;
	}

	/// The frames of the tag
	pub fn frames(&self) -> &FrameSet {
		&self.frames
	}

	/// A mutable reference to the frames of the tag
	///
	/// Nothing stops frames from being duplicated through this.
	pub fn frames_mut(&mut self) -> &mut FrameSet {
		&mut self.frames
	}

	/// The size of the padding that followed the frames when the tag was read
	pub fn padding(&self) -> u32 {
		self.padding
	}

	/// The total number of frames
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Remove every frame
	pub fn clear(&mut self) {
		self.frames.clear();
	}

	/// Get the raw text of the first text frame with `id`
	///
	/// This does not include dates, see [`Id3v2Tag::recording_date`] and friends.
	pub fn text(&self, id: &str) -> Option<&str> {
		self.frames.get(id).iter().find_map(|frame| match &frame.content {
			FrameContent::Text(text) => Some(text.value.as_str()),
			_ => None,
		})
	}

	/// Set the text of a text or date frame, see [`FrameSet::set_text_frame`]
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	/// * `id` is not a text or date frame
	pub fn set_text(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
		self.frames.set_text_frame(id, &value.into())
	}

	fn set_known_text(&mut self, id: &'static str, value: String) {
		if let Err(e) = self.frames.set_text_frame(id, &value) {
			log::error!("Unable to set \"{id}\": {e}");
		}
	}

	text_accessors! {
		title => "TIT2";
		artist => "TPE1";
		album => "TALB";
		album_artist => "TPE2";
		composer => "TCOM";
		genre => "TCON";
	}

	/// The numeric genre, stored as `(nn)` or `nn`
	///
	/// Only the first genre is checked.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_genre("(17)Rock");
	/// assert_eq!(tag.genre_id(), Some(17));
	///
	/// tag.set_genre("Rock");
	/// assert_eq!(tag.genre_id(), None);
	/// ```
	pub fn genre_id(&self) -> Option<u8> {
		let genre = self.text("TCON")?.split(V4_MULTI_VALUE_SEPARATOR).next()?.trim();

		let number = match genre.strip_prefix('(') {
			Some(rest) => rest.split_once(')')?.0,
			None => genre,
		};

		number.parse().ok()
	}

	/// The track number and total, from "TRCK"
	pub fn track_num(&self) -> (Option<u32>, Option<u32>) {
		self.text("TRCK").map_or((None, None), split_number_pair)
	}

	/// Set the track number and total
	///
	/// The frame is removed when both are `None`.
	pub fn set_track_num(&mut self, number: Option<u32>, total: Option<u32>) {
		self.set_number_pair("TRCK", number, total);
	}

	/// The disc number and total, from "TPOS"
	pub fn disc_num(&self) -> (Option<u32>, Option<u32>) {
		self.text("TPOS").map_or((None, None), split_number_pair)
	}

	/// Set the disc number and total
	///
	/// The frame is removed when both are `None`.
	pub fn set_disc_num(&mut self, number: Option<u32>, total: Option<u32>) {
		self.set_number_pair("TPOS", number, total);
	}

	fn set_number_pair(&mut self, id: &'static str, number: Option<u32>, total: Option<u32>) {
		match format_number_pair(number, total) {
			Some(pair) => self.set_known_text(id, pair),
			None => {
				let _ = self.frames.remove(id);
			},
		}
	}

	fn date(&self, id: &str) -> Option<Date> {
		self.frames.get(id).iter().find_map(|frame| match &frame.content {
			FrameContent::Date(date) => date.date,
			_ => None,
		})
	}

	fn set_date(&mut self, id: &'static str, date: Date) {
		let _ = self.frames.remove(id);
		self.frames.insert(Frame::known(id, DateFrame::new(date)));
	}

	/// The recording date
	///
	/// This is "TDRC", falling back to the ID3v2.3 "TYER", "TDAT" and "TIME" frames.
	pub fn recording_date(&self) -> Option<Date> {
		self.date("TDRC").or_else(|| {
			conversion::v3_recording_date(self.text("TYER")?, self.text("TDAT"), self.text("TIME"))
		})
	}

	/// Set the recording date ("TDRC")
	pub fn set_recording_date(&mut self, date: Date) {
		self.set_date("TDRC", date);
	}

	/// The release date ("TDRL")
	pub fn release_date(&self) -> Option<Date> {
		self.date("TDRL")
	}

	/// Set the release date ("TDRL")
	pub fn set_release_date(&mut self, date: Date) {
		self.set_date("TDRL", date);
	}

	/// The original release date
	///
	/// This is "TDOR", falling back to the ID3v2.3 "TORY" frame.
	pub fn original_release_date(&self) -> Option<Date> {
		self.date("TDOR")
			.or_else(|| conversion::v3_year(self.text("TORY")?))
	}

	/// Set the original release date ("TDOR")
	pub fn set_original_release_date(&mut self, date: Date) {
		self.set_date("TDOR", date);
	}

	/// The play counter ("PCNT")
	pub fn play_count(&self) -> Option<u64> {
		self.frames.get("PCNT").iter().find_map(|frame| match &frame.content {
			FrameContent::PlayCount(counter) => Some(counter.count),
			_ => None,
		})
	}

	/// Set the play counter ("PCNT")
	pub fn set_play_count(&mut self, count: u64) {
		let _ = self.frames.remove("PCNT");
		self.frames.insert(Frame::known("PCNT", PlayCountFrame::new(count)));
	}

	// Replace the first frame under `id` that `matches`, or append a new one
	fn replace_where<F>(&mut self, id: &'static str, content: FrameContent, matches: F) -> Option<Frame>
	where
		F: Fn(&FrameContent) -> bool,
	{
		let frame = Frame::known(id, content);

		if let Some(existing) = self
			.frames
			.get_mut(id)
			.and_then(|frames| frames.iter_mut().find(|existing| matches(&existing.content)))
		{
			return Some(std::mem::replace(existing, frame));
		}

		self.frames.insert(frame);
		None
	}

	fn remove_where<F>(&mut self, id: &str, matches: F) -> Option<Frame>
	where
		F: Fn(&FrameContent) -> bool,
	{
		let frames = self.frames.get_mut(id)?;
		let position = frames.iter().position(|frame| matches(&frame.content))?;
		let removed = frames.remove(position);

		if frames.is_empty() {
			let _ = self.frames.remove(id);
		}

		Some(removed)
	}

	content_accessors! {
		/// All comment ("COMM") frames
		comments => "COMM", Comment(CommentFrame);
		/// All lyrics ("USLT") frames
		lyrics => "USLT", Lyrics(LyricsFrame);
		/// All user defined text ("TXXX") frames
		user_texts => "TXXX", UserText(UserTextFrame);
		/// All user defined URL ("WXXX") frames
		user_urls => "WXXX", UserUrl(UserUrlFrame);
		/// All attached pictures ("APIC")
		images => "APIC", Image(ImageFrame);
		/// All encapsulated objects ("GEOB")
		objects => "GEOB", Object(ObjectFrame);
		/// All private ("PRIV") frames
		privates => "PRIV", Private(PrivateFrame);
		/// All unique file identifiers ("UFID")
		unique_file_ids => "UFID", UniqueFileId(UniqueFileIdFrame);
		/// All terms of use ("USER") frames
		terms_of_use => "USER", TermsOfUse(TermsOfUseFrame);
		/// All popularimeters ("POPM")
		popularities => "POPM", Popularity(PopularityFrame);
	}

	/// Get the comment with `description` and `language`
	pub fn comment(&self, description: &str, language: [u8; 3]) -> Option<&CommentFrame> {
		self.comments()
			.find(|comment| comment.description == description && comment.language == language)
	}

	/// Insert a comment, replacing any with the same description and language
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::items::CommentFrame;
	/// use id3_codec::id3::v2::{Id3v2Tag, TextEncoding};
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_comment(CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "first"));
	/// tag.set_comment(CommentFrame::new(TextEncoding::UTF8, *b"deu", "", "erste"));
	///
	/// // Replaces the first comment
	/// let replaced = tag.set_comment(CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "second"));
	/// assert!(replaced.is_some());
	///
	/// assert_eq!(tag.comments().count(), 2);
	/// assert_eq!(tag.comment("", *b"eng").unwrap().content, "second");
	/// ```
	pub fn set_comment(&mut self, comment: CommentFrame) -> Option<Frame> {
		let (description, language) = (comment.description.clone(), comment.language);
		self.replace_where("COMM", comment.into(), |content| {
			matches!(content, FrameContent::Comment(c) if c.description == description && c.language == language)
		})
	}

	/// Remove the comment with `description` and `language`
	pub fn remove_comment(&mut self, description: &str, language: [u8; 3]) -> Option<Frame> {
		self.remove_where("COMM", |content| {
			matches!(content, FrameContent::Comment(c) if c.description == description && c.language == language)
		})
	}

	/// Insert lyrics, replacing any with the same description and language
	pub fn set_lyrics(&mut self, lyrics: LyricsFrame) -> Option<Frame> {
		let (description, language) = (lyrics.description.clone(), lyrics.language);
		self.replace_where("USLT", lyrics.into(), |content| {
			matches!(content, FrameContent::Lyrics(l) if l.description == description && l.language == language)
		})
	}

	/// Get the content of the user defined text frame with `description`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_user_text("MusicBrainz Album Id", "0123");
	///
	/// assert_eq!(tag.user_text("MusicBrainz Album Id"), Some("0123"));
	/// assert!(tag.user_text("Something else").is_none());
	/// ```
	pub fn user_text(&self, description: &str) -> Option<&str> {
		self.user_texts()
			.find(|frame| frame.description == description)
			.map(|frame| frame.content.as_str())
	}

	/// Set a user defined text frame, replacing any with the same description
	pub fn set_user_text(
		&mut self,
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Option<Frame> {
		let (description, content) = (description.into(), content.into());
		let encoding = best_encoding(&[&description, &content]);

		let frame = UserTextFrame::new(encoding, description.clone(), content);
		self.replace_where("TXXX", frame.into(), |existing| {
			matches!(existing, FrameContent::UserText(f) if f.description == description)
		})
	}

	/// Remove the user defined text frame with `description`
	pub fn remove_user_text(&mut self, description: &str) -> Option<Frame> {
		self.remove_where("TXXX", |content| {
			matches!(content, FrameContent::UserText(f) if f.description == description)
		})
	}

	/// Get the URL of the user defined URL frame with `description`
	pub fn user_url(&self, description: &str) -> Option<&str> {
		self.user_urls()
			.find(|frame| frame.description == description)
			.map(|frame| frame.url.as_str())
	}

	/// Set a user defined URL frame, replacing any with the same description
	pub fn set_user_url(
		&mut self,
		description: impl Into<String>,
		url: impl Into<String>,
	) -> Option<Frame> {
		let description = description.into();
		let encoding = best_encoding(&[&description]);

		let frame = UserUrlFrame::new(encoding, description.clone(), url);
		self.replace_where("WXXX", frame.into(), |existing| {
			matches!(existing, FrameContent::UserUrl(f) if f.description == description)
		})
	}

	/// Insert an image, replacing any with the same description
	pub fn add_image(&mut self, image: ImageFrame) -> Option<Frame> {
		let description = image.description.clone();
		self.replace_where("APIC", image.into(), |existing| {
			matches!(existing, FrameContent::Image(f) if f.description == description)
		})
	}

	/// Remove the image with `description`
	pub fn remove_image(&mut self, description: &str) -> Option<Frame> {
		self.remove_where("APIC", |content| {
			matches!(content, FrameContent::Image(f) if f.description == description)
		})
	}

	/// Insert an encapsulated object, replacing any with the same description
	pub fn add_object(&mut self, object: ObjectFrame) -> Option<Frame> {
		let description = object.description.clone();
		self.replace_where("GEOB", object.into(), |existing| {
			matches!(existing, FrameContent::Object(f) if f.description == description)
		})
	}

	/// Remove the encapsulated object with `description`
	pub fn remove_object(&mut self, description: &str) -> Option<Frame> {
		self.remove_where("GEOB", |content| {
			matches!(content, FrameContent::Object(f) if f.description == description)
		})
	}

	/// Get the identifier owned by `owner`
	pub fn unique_file_id(&self, owner: &str) -> Option<&[u8]> {
		self.unique_file_ids()
			.find(|frame| frame.owner == owner)
			.map(|frame| frame.identifier.as_slice())
	}

	/// Set the identifier owned by `owner`, replacing any existing one
	pub fn set_unique_file_id(&mut self, owner: impl Into<String>, identifier: Vec<u8>) -> Option<Frame> {
		let owner = owner.into();

		let frame = UniqueFileIdFrame::new(owner.clone(), identifier);
		self.replace_where("UFID", frame.into(), |existing| {
			matches!(existing, FrameContent::UniqueFileId(f) if f.owner == owner)
		})
	}
}

fn best_encoding(values: &[&str]) -> TextEncoding {
	if values.iter().all(|value| TextEncoding::verify_latin1(value)) {
		return TextEncoding::Latin1;
	}

	TextEncoding::UTF8
}
