//! The table of known frame IDs

use crate::id3::VersionFamily;

use std::collections::HashMap;
use std::sync::OnceLock;

/// The content codec used for a frame ID
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FrameKind {
	Text,
	Date,
	UserText,
	Url,
	UserUrl,
	Image,
	Object,
	Private,
	UniqueFileId,
	PlayCount,
	MusicCdId,
	Comment,
	Lyrics,
	TermsOfUse,
	Popularity,
	RelativeVolumeAdjustment,
	/// Known, but kept as raw bytes
	Raw,
}

/// Information about a known frame ID
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameInfo {
	/// The 4 character ID
	pub id: &'static str,
	/// A human readable description
	pub description: &'static str,
	/// The versions the ID is defined in
	pub versions: &'static [VersionFamily],
	/// The content codec
	pub kind: FrameKind,
	/// Whether the ID is only used by specific software (iTunes, MusicMatch, etc.)
	pub nonstandard: bool,
}

impl FrameInfo {
	/// Whether the ID is defined in `family`
	///
	/// Nonstandard IDs are accepted everywhere.
	pub fn supported_in(&self, family: VersionFamily) -> bool {
		self.nonstandard || self.versions.contains(&family)
	}
}

/// Look up a frame ID
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::VersionFamily;
/// use id3_codec::id3::v2::{FrameKind, frame_info};
///
/// let info = frame_info("TDRC").unwrap();
/// assert_eq!(info.kind, FrameKind::Date);
/// assert!(info.supported_in(VersionFamily::V2_4));
/// assert!(!info.supported_in(VersionFamily::V2_3));
///
/// assert!(frame_info("ZZZZ").is_none());
/// ```
pub fn frame_info(id: &str) -> Option<&'static FrameInfo> {
	frame_table().get(id).copied()
}

/// Whether the frame holds a [`Date`](crate::date::Date)
pub fn is_date_frame(id: &str) -> bool {
	matches!(id, "TDEN" | "TDOR" | "TDRC" | "TDRL" | "TDTG")
}

const BOTH: &[VersionFamily] = &[VersionFamily::V2_3, VersionFamily::V2_4];
const V3: &[VersionFamily] = &[VersionFamily::V2_3];
const V4: &[VersionFamily] = &[VersionFamily::V2_4];

macro_rules! frames {
	(@nonstandard nonstandard) => { true };
	(@nonstandard) => { false };
	($($id:literal => ($versions:ident, $kind:ident, $description:literal $(, $nonstandard:ident)?)),+ $(,)?) => {
		const FRAMES: &[FrameInfo] = &[
			$(
				FrameInfo {
					id: $id,
					description: $description,
					versions: $versions,
					kind: FrameKind::$kind,
					nonstandard: frames!(@nonstandard $($nonstandard)?),
				},
			)+
		];
	};
}

frames! {
	"AENC" => (BOTH, Raw, "Audio encryption"),
	"APIC" => (BOTH, Image, "Attached picture"),
	"ASPI" => (V4, Raw, "Audio seek point index"),
	"COMM" => (BOTH, Comment, "Comments"),
	"COMR" => (BOTH, Raw, "Commercial frame"),
	"ENCR" => (BOTH, Raw, "Encryption method registration"),
	"EQU2" => (V4, Raw, "Equalisation (2)"),
	"EQUA" => (V3, Raw, "Equalization"),
	"ETCO" => (BOTH, Raw, "Event timing codes"),
	"GEOB" => (BOTH, Object, "General encapsulated object"),
	"GRID" => (BOTH, Raw, "Group identification registration"),
	"IPLS" => (V3, Text, "Involved people list"),
	"LINK" => (BOTH, Raw, "Linked information"),
	"MCDI" => (BOTH, MusicCdId, "Music CD identifier"),
	"MLLT" => (BOTH, Raw, "MPEG location lookup table"),
	"OWNE" => (BOTH, Raw, "Ownership frame"),
	"PRIV" => (BOTH, Private, "Private frame"),
	"PCNT" => (BOTH, PlayCount, "Play counter"),
	"POPM" => (BOTH, Popularity, "Popularimeter"),
	"POSS" => (BOTH, Raw, "Position synchronisation frame"),
	"RBUF" => (BOTH, Raw, "Recommended buffer size"),
	"RVA2" => (V4, RelativeVolumeAdjustment, "Relative volume adjustment (2)"),
	"RVAD" => (V3, Raw, "Relative volume adjustment"),
	"RVRB" => (BOTH, Raw, "Reverb"),
	"SEEK" => (V4, Raw, "Seek frame"),
	"SIGN" => (V4, Raw, "Signature frame"),
	"SYLT" => (BOTH, Raw, "Synchronised lyric/text"),
	"SYTC" => (BOTH, Raw, "Synchronised tempo codes"),
	"TALB" => (BOTH, Text, "Album/Movie/Show title"),
	"TBPM" => (BOTH, Text, "BPM (beats per minute)"),
	"TCOM" => (BOTH, Text, "Composer"),
	"TCON" => (BOTH, Text, "Content type"),
	"TCOP" => (BOTH, Text, "Copyright message"),
	"TDAT" => (V3, Text, "Date"),
	"TDEN" => (V4, Date, "Encoding time"),
	"TDLY" => (BOTH, Text, "Playlist delay"),
	"TDOR" => (V4, Date, "Original release time"),
	"TDRC" => (V4, Date, "Recording time"),
	"TDRL" => (V4, Date, "Release time"),
	"TDTG" => (V4, Date, "Tagging time"),
	"TENC" => (BOTH, Text, "Encoded by"),
	"TEXT" => (BOTH, Text, "Lyricist/Text writer"),
	"TFLT" => (BOTH, Text, "File type"),
	"TIME" => (V3, Text, "Time"),
	"TIPL" => (V4, Text, "Involved people list"),
	"TIT1" => (BOTH, Text, "Content group description"),
	"TIT2" => (BOTH, Text, "Title/songname/content description"),
	"TIT3" => (BOTH, Text, "Subtitle/Description refinement"),
	"TKEY" => (BOTH, Text, "Initial key"),
	"TLAN" => (BOTH, Text, "Language(s)"),
	"TLEN" => (BOTH, Text, "Length"),
	"TMCL" => (V4, Text, "Musician credits list"),
	"TMED" => (BOTH, Text, "Media type"),
	"TMOO" => (V4, Text, "Mood"),
	"TOAL" => (BOTH, Text, "Original album/movie/show title"),
	"TOFN" => (BOTH, Text, "Original filename"),
	"TOLY" => (BOTH, Text, "Original lyricist(s)/text writer(s)"),
	"TOPE" => (BOTH, Text, "Original artist(s)/performer(s)"),
	"TORY" => (V3, Text, "Original release year"),
	"TOWN" => (BOTH, Text, "File owner/licensee"),
	"TPE1" => (BOTH, Text, "Lead performer(s)/Soloist(s)"),
	"TPE2" => (BOTH, Text, "Band/orchestra/accompaniment"),
	"TPE3" => (BOTH, Text, "Conductor/performer refinement"),
	"TPE4" => (BOTH, Text, "Interpreted, remixed, or otherwise modified by"),
	"TPOS" => (BOTH, Text, "Part of a set"),
	"TPRO" => (V4, Text, "Produced notice"),
	"TPUB" => (BOTH, Text, "Publisher"),
	"TRCK" => (BOTH, Text, "Track number/Position in set"),
	"TRDA" => (V3, Text, "Recording dates"),
	"TRSN" => (BOTH, Text, "Internet radio station name"),
	"TRSO" => (BOTH, Text, "Internet radio station owner"),
	"TSIZ" => (V3, Text, "Size"),
	"TSOA" => (V4, Text, "Album sort order"),
	"TSOP" => (V4, Text, "Performer sort order"),
	"TSOT" => (V4, Text, "Title sort order"),
	"TSRC" => (BOTH, Text, "ISRC (international standard recording code)"),
	"TSSE" => (BOTH, Text, "Software/Hardware and settings used for encoding"),
	"TSST" => (V4, Text, "Set subtitle"),
	"TXXX" => (BOTH, UserText, "User defined text information frame"),
	"TYER" => (V3, Text, "Year"),
	"UFID" => (BOTH, UniqueFileId, "Unique file identifier"),
	"USER" => (BOTH, TermsOfUse, "Terms of use"),
	"USLT" => (BOTH, Lyrics, "Unsynchronised lyric/text transcription"),
	"WCOM" => (BOTH, Url, "Commercial information"),
	"WCOP" => (BOTH, Url, "Copyright/Legal information"),
	"WOAF" => (BOTH, Url, "Official audio file webpage"),
	"WOAR" => (BOTH, Url, "Official artist/performer webpage"),
	"WOAS" => (BOTH, Url, "Official audio source webpage"),
	"WORS" => (BOTH, Url, "Official Internet radio station homepage"),
	"WPAY" => (BOTH, Url, "Payment"),
	"WPUB" => (BOTH, Url, "Publishers official webpage"),
	"WXXX" => (BOTH, UserUrl, "User defined URL link frame"),

	// iTunes
	"TCMP" => (BOTH, Text, "iTunes compilation flag", nonstandard),
	"TSO2" => (BOTH, Text, "iTunes album artist sort order", nonstandard),
	"TSOC" => (BOTH, Text, "iTunes composer sort order", nonstandard),
	"GRP1" => (BOTH, Text, "iTunes grouping", nonstandard),
	"MVNM" => (BOTH, Text, "iTunes movement name", nonstandard),
	"MVIN" => (BOTH, Text, "iTunes movement number/count", nonstandard),
	"WFED" => (BOTH, Text, "iTunes podcast feed URL", nonstandard),
	"PCST" => (BOTH, Raw, "iTunes podcast flag", nonstandard),
	"TKWD" => (BOTH, Text, "iTunes podcast keywords", nonstandard),
	"TDES" => (BOTH, Text, "iTunes podcast description", nonstandard),
	"TGID" => (BOTH, Text, "iTunes podcast identifier", nonstandard),
	"TCAT" => (BOTH, Text, "iTunes podcast category", nonstandard),

	// MusicMatch
	"XSOA" => (BOTH, Text, "Album sort order (ID3v2.3)", nonstandard),
	"XSOP" => (BOTH, Text, "Performer sort order (ID3v2.3)", nonstandard),
	"XSOT" => (BOTH, Text, "Title sort order (ID3v2.3)", nonstandard),
	"XDOR" => (BOTH, Text, "Original release time (ID3v2.3)", nonstandard),
}

fn frame_table() -> &'static HashMap<&'static str, &'static FrameInfo> {
	static INSTANCE: OnceLock<HashMap<&'static str, &'static FrameInfo>> = OnceLock::new();
	INSTANCE.get_or_init(|| FRAMES.iter().map(|info| (info.id, info)).collect())
}

#[cfg(test)]
mod tests {
	use super::{FRAMES, FrameKind, frame_info, is_date_frame};
	use crate::id3::VersionFamily;

	use std::collections::HashSet;

	#[test_log::test]
	fn ids_are_unique() {
		let ids: HashSet<_> = FRAMES.iter().map(|info| info.id).collect();
		assert_eq!(ids.len(), FRAMES.len());
	}

	#[test_log::test]
	fn date_frames() {
		for info in FRAMES {
			assert_eq!(is_date_frame(info.id), info.kind == FrameKind::Date);
		}
	}

	#[test_log::test]
	fn version_specific() {
		let tyer = frame_info("TYER").unwrap();
		assert!(tyer.supported_in(VersionFamily::V2_3));
		assert!(!tyer.supported_in(VersionFamily::V2_4));

		let tcmp = frame_info("TCMP").unwrap();
		assert!(tcmp.nonstandard);
		assert!(tcmp.supported_in(VersionFamily::V2_4));

		assert_eq!(frame_info("WFED").unwrap().kind, FrameKind::Text);
		assert_eq!(frame_info("PCST").unwrap().kind, FrameKind::Raw);
	}
}
