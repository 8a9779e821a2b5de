use super::FrameContent;
use super::header::FrameId;
use super::read::ParseContext;
use super::registry::{FrameKind, frame_info};
use crate::diagnostic::DiagnosticKind;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::items::{
	CommentFrame, DateFrame, ImageFrame, LyricsFrame, MusicCdIdFrame, ObjectFrame,
	PlayCountFrame, PopularityFrame, PrivateFrame, RelativeVolumeAdjustmentFrame, TermsOfUseFrame,
	TextFrame, UniqueFileIdFrame, UrlFrame, UserTextFrame, UserUrlFrame,
};

// The codec for IDs missing from the registry
fn unregistered_kind(id: &str) -> FrameKind {
	match id {
		"TXXX" | "WXXX" => FrameKind::Raw,
		_ if id.starts_with('T') => FrameKind::Text,
		_ if id.starts_with('W') => FrameKind::Url,
		_ => FrameKind::Raw,
	}
}

#[rustfmt::skip]
pub(super) fn parse_content(
	id: &FrameId,
	data: &[u8],
	ctx: &mut ParseContext<'_>,
) -> Result<FrameContent> {
	log::trace!("Parsing frame content for ID: {}", id);

	let kind = match id {
		// Anything that is still outdated at this point couldn't be upgraded
		FrameId::Outdated(_) => FrameKind::Raw,
		FrameId::Valid(id_str) => match frame_info(id_str) {
			Some(info) => {
				if info.nonstandard {
					ctx.report(
						DiagnosticKind::NonstandardFrameId,
						format!("\"{id_str}\" is a nonstandard frame ID ({})", info.description),
					)?;
				}

				info.kind
			},
			None => {
				ctx.report(DiagnosticKind::UnknownFrameId, format!("Unknown frame ID \"{id_str}\""))?;
				unregistered_kind(id_str)
			},
		},
	};

	Ok(match kind {
		FrameKind::Text => FrameContent::Text(TextFrame::parse(data, ctx)?),
		FrameKind::Date => FrameContent::Date(DateFrame::parse(data, ctx)?),
		FrameKind::UserText => FrameContent::UserText(UserTextFrame::parse(data, ctx)?),
		FrameKind::Url => FrameContent::Url(UrlFrame::parse(data, ctx)?),
		FrameKind::UserUrl => FrameContent::UserUrl(UserUrlFrame::parse(data, ctx)?),
		FrameKind::Image => FrameContent::Image(ImageFrame::parse(data, ctx)?),
		FrameKind::Object => FrameContent::Object(ObjectFrame::parse(data, ctx)?),
		FrameKind::Private => FrameContent::Private(PrivateFrame::parse(data, ctx)?),
		FrameKind::UniqueFileId => FrameContent::UniqueFileId(UniqueFileIdFrame::parse(data, ctx)?),
		FrameKind::PlayCount => FrameContent::PlayCount(PlayCountFrame::parse(data, ctx)?),
		FrameKind::MusicCdId => FrameContent::MusicCdId(MusicCdIdFrame::parse(data)),
		FrameKind::Comment => FrameContent::Comment(CommentFrame::parse(data, ctx)?),
		FrameKind::Lyrics => FrameContent::Lyrics(LyricsFrame::parse(data, ctx)?),
		FrameKind::TermsOfUse => FrameContent::TermsOfUse(TermsOfUseFrame::parse(data, ctx)?),
		FrameKind::Popularity => FrameContent::Popularity(PopularityFrame::parse(data, ctx)?),
		FrameKind::RelativeVolumeAdjustment => FrameContent::RelativeVolumeAdjustment(RelativeVolumeAdjustmentFrame::parse(data, ctx)?),
		// SYLT, ETCO, etc.
		FrameKind::Raw => FrameContent::Raw(data.to_vec()),
	})
}

/// Verify that `content` can be stored under `id`
pub(crate) fn verify_frame(id: &FrameId, content: &FrameContent) -> Result<()> {
	let kind = content.kind();
	if kind == FrameKind::Raw {
		return Ok(());
	}

	let id_str = id.as_str();
	let expected = match frame_info(id_str) {
		Some(info) => info.kind,
		None => unregistered_kind(id_str),
	};

	if kind == expected {
		return Ok(());
	}

	Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(id_str.to_owned(), content.name())).into())
}

#[cfg(test)]
mod tests {
	use super::parse_content;
	use crate::config::{ParseOptions, ParsingMode};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::frame::read::ParseContext;
	use crate::id3::v2::items::{TextFrame, UrlFrame};
	use crate::id3::v2::{FrameContent, FrameId, TextEncoding};

	fn parse(id: &str, data: &[u8], sink: &mut Vec<Diagnostic>) -> FrameContent {
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), sink);
		parse_content(&FrameId::new(id).unwrap(), data, &mut ctx).unwrap()
	}

	#[test_log::test]
	fn dispatch() {
		let mut sink = Vec::new();

		assert_eq!(
			parse("TIT2", b"\x00Song", &mut sink),
			FrameContent::Text(TextFrame::new(TextEncoding::Latin1, "Song"))
		);
		assert_eq!(
			parse("WOAR", b"https://example.com", &mut sink),
			FrameContent::Url(UrlFrame::new("https://example.com"))
		);
		assert_eq!(
			parse("SYLT", b"\x00eng\x02\x01", &mut sink),
			FrameContent::Raw(b"\x00eng\x02\x01".to_vec())
		);
		assert!(sink.is_empty());
	}

	#[test_log::test]
	fn unknown_and_nonstandard_ids() {
		let mut sink = Vec::new();

		assert_eq!(
			parse("ZZZZ", b"\x01\x02", &mut sink),
			FrameContent::Raw(vec![1, 2])
		);
		assert_eq!(
			parse("TZZZ", b"\x00a", &mut sink),
			FrameContent::Text(TextFrame::new(TextEncoding::Latin1, "a"))
		);
		assert_eq!(
			parse("TCMP", b"\x001", &mut sink),
			FrameContent::Text(TextFrame::new(TextEncoding::Latin1, "1"))
		);

		let kinds: Vec<_> = sink.iter().map(|d| d.kind).collect();
		assert_eq!(
			kinds,
			[
				DiagnosticKind::UnknownFrameId,
				DiagnosticKind::UnknownFrameId,
				DiagnosticKind::NonstandardFrameId
			]
		);

		// Informational only, even when strict
		let mut strict_sink = Vec::new();
		let mut ctx = ParseContext::new(
			Id3Version::ID3_V2_4,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
			&mut strict_sink,
		);
		assert!(parse_content(&FrameId::new("ZZZZ").unwrap(), b"\x01", &mut ctx).is_ok());
	}

	#[test_log::test]
	fn outdated_ids_are_raw() {
		let mut sink = Vec::new();
		assert_eq!(
			parse("ZZZ", b"\x00a", &mut sink),
			FrameContent::Raw(b"\x00a".to_vec())
		);
	}
}
