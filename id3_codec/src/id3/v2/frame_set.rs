use super::extended_header::ExtendedTagHeader;
use super::frame::read::ParseContext;
use super::header::TagHeader;
use super::items::{DateFrame, TextFrame};
use super::util::synchsafe::resynchronise;
use super::util::upgrade::upgrade_v2;
use super::{Frame, FrameContent, FrameHeader, FrameId, is_date_frame};
use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::date::Date;
use crate::diagnostic::{DiagnosticKind, DiagnosticSink};
use crate::error::Result;
use crate::id3::VersionFamily;
use crate::util::text::TextEncoding;

use std::collections::HashMap;
use std::io::Read;
use std::ops::Index;

/// The frames of an ID3v2 tag, grouped by ID
///
/// IDs are kept in the order they were first inserted, and frames sharing an ID are kept in
/// insertion order. Nothing stops multiple frames from sharing an ID, the accessors on
/// [`Id3v2Tag`](crate::id3::v2::Id3v2Tag) are responsible for keeping them unique where required.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::{Frame, FrameSet};
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let mut frames = FrameSet::new();
/// frames.insert(Frame::text("TIT2", "Song")?);
/// frames.insert(Frame::text("TPE1", "Artist")?);
/// frames.insert(Frame::text("TPE1", "Another artist")?);
///
/// assert_eq!(frames.len(), 3);
/// assert_eq!(frames["TPE1"].len(), 2);
/// assert!(frames["TALB"].is_empty());
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSet {
	frames: HashMap<FrameId, Vec<Frame>>,
	order: Vec<FrameId>,
}

impl FrameSet {
	/// Create an empty `FrameSet`
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a frame, after any other frames with the same ID
	pub fn insert(&mut self, frame: Frame) {
		match self.frames.get_mut(frame.id_str()) {
			Some(existing) => existing.push(frame),
			None => {
				let id = frame.id().clone();
				self.order.push(id.clone());
				self.frames.insert(id, vec![frame]);
			},
		}
	}

	/// Get all frames with `id`
	///
	/// This is empty when no frames exist.
	pub fn get(&self, id: &str) -> &[Frame] {
		self.frames.get(id).map_or(&[], Vec::as_slice)
	}

	/// Get a mutable reference to all frames with `id`
	pub fn get_mut(&mut self, id: &str) -> Option<&mut Vec<Frame>> {
		self.frames.get_mut(id)
	}

	/// Remove all frames with `id`
	pub fn remove(&mut self, id: &str) -> Vec<Frame> {
		let Some(removed) = self.frames.remove(id) else {
			return Vec::new();
		};

		self.order.retain(|existing| existing.as_str() != id);
		removed
	}

	/// Whether any frames with `id` exist
	pub fn contains(&self, id: &str) -> bool {
		self.frames.contains_key(id)
	}

	/// The IDs in the set, in insertion order
	pub fn ids(&self) -> impl Iterator<Item = &FrameId> {
		self.order.iter()
	}

	/// Iterate over all frames, grouped by ID in insertion order
	pub fn iter(&self) -> impl Iterator<Item = &Frame> {
		self.order
			.iter()
			.filter_map(|id| self.frames.get(id))
			.flatten()
	}

	/// Iterate mutably over all frames, in no particular order
	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
		self.frames.values_mut().flatten()
	}

	/// The total number of frames
	pub fn len(&self) -> usize {
		self.frames.values().map(Vec::len).sum()
	}

	/// Whether the set has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.values().all(Vec::is_empty)
	}

	/// Remove every frame
	pub fn clear(&mut self) {
		self.frames.clear();
		self.order.clear();
	}

	/// Retain only the frames matching `predicate`
	///
	/// IDs left without any frames are removed.
	pub fn retain<P>(&mut self, mut predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(|_, frames| {
			frames.retain(&mut predicate);
			!frames.is_empty()
		});

		let frames = &self.frames;
		self.order.retain(|id| frames.contains_key(id));
	}

	/// Set the text of a text or date frame
	///
	/// An existing frame is updated in place, otherwise a new one is created. Date frames
	/// ([`is_date_frame`]) parse `text` as a [`Date`], and are cleared if it is invalid.
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	/// * `id` is not a text or date frame
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::{FrameContent, FrameSet};
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let mut frames = FrameSet::new();
	/// frames.set_text_frame("TIT2", "Song")?;
	/// frames.set_text_frame("TDRC", "2024-06-03")?;
	///
	/// let FrameContent::Date(date) = &frames["TDRC"][0].content else {
	/// 	unreachable!()
	/// };
	/// assert_eq!(date.date.unwrap().year, 2024);
	///
	/// assert!(frames.set_text_frame("APIC", "Not a picture").is_err());
	/// # Ok(()) }
	/// ```
	pub fn set_text_frame(&mut self, id: &str, text: &str) -> Result<()> {
		let date = is_date_frame(id).then(|| parse_date(text));

		if let Some(first) = self.frames.get_mut(id).and_then(|existing| {
			if existing.len() > 1 {
				log::debug!(
					"Replacing {} \"{id}\" frames with a single frame",
					existing.len()
				);
				existing.truncate(1);
			}

			existing.first_mut()
		}) {
			match (&mut first.content, date) {
				(FrameContent::Date(frame), Some(date)) => {
					frame.date = date;
					return Ok(());
				},
				(FrameContent::Text(frame), None) => {
					if frame.encoding == TextEncoding::Latin1 && !TextEncoding::verify_latin1(text) {
						frame.encoding = TextEncoding::UTF8;
					}

					text.clone_into(&mut frame.value);
					return Ok(());
				},
				// Raw content, replaced with a decoded frame below
				_ => {},
			}
		}

		let frame = match date {
			Some(date) => Frame::new(id, DateFrame { date })?,
			None => Frame::new(id, TextFrame::new(TextEncoding::best_for(text), text))?,
		};

		match self.frames.get_mut(id) {
			Some(existing) => {
				existing.clear();
				existing.push(frame);
			},
			None => self.insert(frame),
		}

		Ok(())
	}

	/// Read the frames of a tag
	///
	/// The reader is expected to be positioned after the tag header, and extended header if there
	/// is one. Frames are read until the tag size is exhausted, or padding is found.
	///
	/// Returns the size of the padding.
	///
	/// # Errors
	///
	/// * The reader fails
	/// * [`ParsingMode::Strict`] is used and any frame is invalid
	pub fn parse<R>(
		&mut self,
		reader: &mut R,
		header: &TagHeader,
		extended_header: Option<&ExtendedTagHeader>,
		options: ParseOptions,
		sink: &mut dyn DiagnosticSink,
	) -> Result<u32>
	where
		R: Read,
	{
		let version = header.version;
		let family = version.family();
		let size_left = header
			.tag_size
			.saturating_sub(extended_header.map_or(0, ExtendedTagHeader::size));

		log::debug!("Parsing ID3v2 frames, size: {size_left}, version: {version}");

		let mut content = Vec::new();
		reader.take(u64::from(size_left)).read_to_end(&mut content)?;

		let mut ctx = ParseContext::new(version, options, sink);

		if content.len() < size_left as usize {
			ctx.report(
				DiagnosticKind::TruncatedFrame,
				format!(
					"Tag claims to be {size_left} bytes, only {} are available",
					content.len()
				),
			)?;
		}

		// ID3v2.4 unsynchronises frames individually
		if header.unsync && family != VersionFamily::V2_4 {
			log::trace!("Resynchronising tag content");
			content = resynchronise(&content);
		}

		// Header + 1 byte of content
		let min_frame_size = FrameHeader::size_for(version) as usize + 1;

		let mut remaining = content.as_slice();
		while remaining.len() >= min_frame_size {
			let padding = remaining.len();

			let Some(mut frame_header) = FrameHeader::parse(&mut remaining, version)? else {
				log::debug!("Found {padding} bytes of padding");
				return Ok(padding as u32);
			};

			ctx.frame_id = Some(frame_header.id.as_str().to_owned());

			if frame_header.reserved_flags != 0 {
				ctx.report(
					DiagnosticKind::ReservedFlags,
					format!("Reserved flag bits set: {:#06x}", frame_header.reserved_flags),
				)?;
			}

			let data_size = frame_header.data_size as usize;
			if data_size > remaining.len() {
				ctx.report(
					DiagnosticKind::TruncatedFrame,
					format!(
						"Frame claims to be {data_size} bytes, only {} remain in the tag",
						remaining.len()
					),
				)?;
				return Ok(0);
			}

			let (data, rest) = remaining.split_at(data_size);
			remaining = rest;

			if data.is_empty() {
				ctx.report(DiagnosticKind::EmptyFrame, "Frame has no content, skipping")?;
				continue;
			}

			if let FrameId::Outdated(id) = &frame_header.id {
				if let Some(upgraded) = upgrade_v2(id) {
					log::trace!("Upgrading frame ID \"{id}\" to \"{upgraded}\"");
					frame_header.id = FrameId::Valid(upgraded.to_owned());
				}
			}

			if !options.read_images && frame_header.id.as_str() == "APIC" {
				log::trace!("Skipping image frame");
				continue;
			}

			match Frame::parse(frame_header, data, &mut ctx) {
				Ok(frame) => self.insert(frame),
				Err(e) if options.parsing_mode == ParsingMode::Strict => return Err(e),
				Err(e) => {
					log::warn!(
						"Failed to read frame \"{}\", discarding: {e}",
						ctx.frame_id.as_deref().unwrap_or_default()
					);
				},
			}
		}

		Ok(remaining.len() as u32)
	}

	/// Render every frame for `options.version`
	///
	/// Frames with an [`FrameId::Outdated`] ID cannot be written, and are skipped.
	///
	/// # Errors
	///
	/// Any frame fails to render, see [`FrameContent::as_bytes`]
	pub fn render(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let mut bytes = Vec::new();
		for frame in self.iter() {
			if frame.id().is_outdated() {
				log::warn!("Discarding outdated frame \"{}\"", frame.id());
				continue;
			}

			bytes.extend(frame.render(options)?);
		}

		Ok(bytes)
	}
}

fn parse_date(text: &str) -> Option<Date> {
	match Date::parse(text, ParsingMode::BestAttempt) {
		Ok(date) => date,
		Err(e) => {
			log::warn!("Invalid date \"{text}\", clearing: {e}");
			None
		},
	}
}

impl Index<&str> for FrameSet {
	type Output = [Frame];

	fn index(&self, id: &str) -> &Self::Output {
		self.get(id)
	}
}

impl Extend<Frame> for FrameSet {
	fn extend<T: IntoIterator<Item = Frame>>(&mut self, iter: T) {
		for frame in iter {
			self.insert(frame);
		}
	}
}

impl FromIterator<Frame> for FrameSet {
	fn from_iter<T: IntoIterator<Item = Frame>>(iter: T) -> Self {
		let mut set = Self::new();
		set.extend(iter);
		set
	}
}

impl IntoIterator for FrameSet {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Frame>;

	fn into_iter(mut self) -> Self::IntoIter {
		let mut frames = Vec::with_capacity(self.len());
		for id in self.order {
			if let Some(group) = self.frames.remove(&id) {
				frames.extend(group);
			}
		}

		frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a FrameSet {
	type Item = &'a Frame;
	type IntoIter = Box<dyn Iterator<Item = &'a Frame> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}
