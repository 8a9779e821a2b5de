use super::{Id3v2Tag, V4_MULTI_VALUE_SEPARATOR};
use crate::date::Date;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, LogSink};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::items::{DateFrame, TextFrame};
use crate::id3::v2::{Frame, FrameContent, FrameId, frame_info};
use crate::id3::{Id3Version, VersionFamily};
use crate::util::text::TextEncoding;

// ID3v2.3 multi-value frames (TCON, TPE1, ...) are slash separated
const V3_MULTI_VALUE_SEPARATOR: char = '/';

/// Combine the ID3v2.3 "TYER", "TDAT" ("DDMM") and "TIME" ("HHMM") frames
///
/// Invalid "TDAT" and "TIME" values are ignored.
pub(super) fn v3_recording_date(year: &str, date: Option<&str>, time: Option<&str>) -> Option<Date> {
	let mut recording_date = v3_year(year)?;

	let Some((day, month)) = date.and_then(digit_pair) else {
		return Some(recording_date);
	};

	recording_date.month = Some(month);
	recording_date.day = Some(day);

	if let Some((hour, minute)) = time.and_then(digit_pair) {
		recording_date.hour = Some(hour);
		recording_date.minute = Some(minute);
	}

	if let Err(e) = recording_date.verify() {
		log::warn!("Invalid ID3v2.3 date, only keeping the year: {e}");
		return v3_year(year);
	}

	Some(recording_date)
}

pub(super) fn v3_year(year: &str) -> Option<Date> {
	let year = year.trim();
	if year.len() != 4 {
		return None;
	}

	year.parse().ok().map(Date::from_year)
}

// "DDMM" or "HHMM"
fn digit_pair(text: &str) -> Option<(u8, u8)> {
	let text = text.trim();
	if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	Some((text[..2].parse().ok()?, text[2..].parse().ok()?))
}

fn dropped(sink: &mut dyn DiagnosticSink, id: &str, target: Id3Version) {
	sink.report(Diagnostic::new(
		DiagnosticKind::UnconvertibleFrameId,
		Some(id.to_owned()),
		format!("\"{id}\" has no equivalent in {target}, discarding"),
	));
}

impl Id3v2Tag {
	/// Convert the tag's frames to `target`
	///
	/// Dropped frames are logged, see [`Id3v2Tag::convert_with`].
	///
	/// # Errors
	///
	/// `target` is not ID3v2.3 or ID3v2.4
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::date::Date;
	/// use id3_codec::id3::Id3Version;
	/// use id3_codec::id3::v2::Id3v2Tag;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_recording_date("2024-06-03T12:30".parse::<Date>()?);
	///
	/// tag.convert(Id3Version::ID3_V2_3)?;
	/// assert_eq!(tag.text("TYER"), Some("2024"));
	/// assert_eq!(tag.text("TDAT"), Some("0306"));
	/// assert_eq!(tag.text("TIME"), Some("1230"));
	/// # Ok(()) }
	/// ```
	pub fn convert(&mut self, target: Id3Version) -> Result<()> {
		self.convert_with(target, &mut LogSink)
	}

	/// Convert the tag's frames to `target`, reporting dropped frames to `sink`
	///
	/// The following frames are converted:
	///
	/// | ID3v2.3                      | ID3v2.4         |
	/// |------------------------------|-----------------|
	/// | "TYER" + "TDAT" + "TIME"     | "TDRC"          |
	/// | "TORY" (or "XDOR")           | "TDOR"          |
	/// | "IPLS"                       | "TIPL" + "TMCL" |
	///
	/// In addition, when converting to ID3v2.3, multiple text values are joined with `"/"` and
	/// numeric genres are wrapped in parentheses.
	///
	/// Frames that are not defined in `target` (and any remaining ID3v2.2 frames) are dropped,
	/// with a [`DiagnosticKind::UnconvertibleFrameId`] diagnostic.
	///
	/// # Errors
	///
	/// `target` is not ID3v2.3 or ID3v2.4
	pub fn convert_with(&mut self, target: Id3Version, sink: &mut dyn DiagnosticSink) -> Result<()> {
		let family = target.family();
		if !matches!(family, VersionFamily::V2_3 | VersionFamily::V2_4) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::UnwritableVersion(target)).into());
		}

		log::debug!("Converting tag from {} to {target}", self.header.version);

		if family == VersionFamily::V2_4 {
			self.convert_to_v4();
		} else {
			self.convert_to_v3();
		}

		let unsupported: Vec<String> = self
			.frames
			.ids()
			.filter(|id| match id {
				FrameId::Outdated(_) => true,
				FrameId::Valid(id) => frame_info(id).is_some_and(|info| !info.supported_in(family)),
			})
			.map(|id| id.as_str().to_owned())
			.collect();

		for id in unsupported {
			let _ = self.frames.remove(&id);
			dropped(sink, &id, target);
		}

		self.header.version = target;
		Ok(())
	}

	fn convert_to_v4(&mut self) {
		if !self.frames.contains("TDRC") {
			let recording_date = self.text("TYER").and_then(|year| {
				v3_recording_date(year, self.text("TDAT"), self.text("TIME"))
			});

			if let Some(date) = recording_date {
				self.frames.insert(Frame::known("TDRC", DateFrame::new(date)));
			}
		}

		for id in ["TYER", "TDAT", "TIME"] {
			let _ = self.frames.remove(id);
		}

		if !self.frames.contains("TDOR") {
			// "XDOR" holds a full date, prefer it over the year
			let original_date = self
				.text("XDOR")
				.and_then(|date| date.parse::<Date>().ok())
				.or_else(|| v3_year(self.text("TORY")?));

			if let Some(date) = original_date {
				self.frames.insert(Frame::known("TDOR", DateFrame::new(date)));
			}
		}

		for id in ["TORY", "XDOR"] {
			let _ = self.frames.remove(id);
		}

		for frame in self.frames.remove("IPLS") {
			if self.frames.contains("TIPL") {
				log::warn!("Tag has both \"IPLS\" and \"TIPL\", discarding \"IPLS\"");
				break;
			}

			if let FrameContent::Text(people) = frame.content {
				self.frames.insert(Frame::known("TIPL", people));
			}
		}
	}

	fn convert_to_v3(&mut self) {
		if let Some(date) = self.date("TDRC") {
			let _ = self.frames.remove("TDRC");
			self.set_v3_text("TYER", format!("{:04}", date.year));

			if let (Some(month), Some(day)) = (date.month, date.day) {
				self.set_v3_text("TDAT", format!("{day:02}{month:02}"));

				if let (Some(hour), Some(minute)) = (date.hour, date.minute) {
					self.set_v3_text("TIME", format!("{hour:02}{minute:02}"));
				}
			}
		}

		if let Some(date) = self.date("TDOR") {
			let _ = self.frames.remove("TDOR");
			self.set_v3_text("TORY", format!("{:04}", date.year));
		}

		// "TIPL" and "TMCL" are both pairs of "role\0name"
		let people: Vec<String> = ["TIPL", "TMCL"]
			.into_iter()
			.flat_map(|id| self.frames.remove(id))
			.filter_map(|frame| match frame.content {
				FrameContent::Text(text) => Some(text.value),
				_ => None,
			})
			.collect();

		if !people.is_empty() && !self.frames.contains("IPLS") {
			let people = people.join("\0");
			self.frames.insert(Frame::known(
				"IPLS",
				TextFrame::new(TextEncoding::best_for(&people), people),
			));
		}

		for frame in self.frames.iter_mut() {
			let FrameContent::Text(text) = &mut frame.content else {
				continue;
			};

			if frame.header.id.as_str() == "IPLS" || !text.value.contains(V4_MULTI_VALUE_SEPARATOR) {
				continue;
			}

			let joined = if frame.header.id.as_str() == "TCON" {
				v3_genres(text)
			} else {
				text.values()
					.collect::<Vec<_>>()
					.join(&V3_MULTI_VALUE_SEPARATOR.to_string())
			};

			text.value = joined;
		}

		let numeric_genre = self
			.text("TCON")
			.filter(|genre| genre.parse::<u8>().is_ok())
			.map(|genre| format!("({genre})"));
		if let Some(genre) = numeric_genre {
			self.set_v3_text("TCON", genre);
		}
	}

	fn set_v3_text(&mut self, id: &'static str, value: String) {
		let _ = self.frames.remove(id);
		self.frames
			.insert(Frame::known(id, TextFrame::new(TextEncoding::Latin1, value)));
	}
}

// Numeric genres are written as "(nn)" references, followed by the rest
fn v3_genres(genres: &TextFrame) -> String {
	let mut references = String::new();
	let mut names = Vec::new();

	for genre in genres.values() {
		match genre.parse::<u8>() {
			Ok(id) => references.push_str(&format!("({id})")),
			Err(_) => names.push(genre),
		}
	}

	references + &names.join(&V3_MULTI_VALUE_SEPARATOR.to_string())
}
