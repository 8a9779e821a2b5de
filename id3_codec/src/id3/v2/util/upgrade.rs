//! Utilities for converting frame IDs between ID3v2 versions

use std::collections::HashMap;

/// Upgrade an ID3v2.2 key to its ID3v2.3 equivalent
///
/// A few ID3v2.2 keys are iTunes extensions, and map to nonstandard (or ID3v2.4 only) keys.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::upgrade_v2;
///
/// let old_title = "TT2";
/// let new_title = upgrade_v2(old_title);
///
/// assert_eq!(new_title, Some("TIT2"));
/// assert_eq!(upgrade_v2("TYE"), Some("TYER"));
/// assert_eq!(upgrade_v2("XYZ"), None);
/// ```
pub fn upgrade_v2(key: &str) -> Option<&'static str> {
	v2keys().get(key).copied()
}

/// Upgrade an ID3v2.3 key to an ID3v2.4 key
///
/// Only keys that were renamed are covered. Keys with no ID3v2.4 counterpart at all
/// (ex. "TDAT") are handled during tag conversion.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::upgrade_v3;
///
/// let old_involved_people_list = "IPLS";
/// let new_involved_people_list = upgrade_v3(old_involved_people_list);
///
/// assert_eq!(new_involved_people_list, Some("TIPL"));
/// ```
pub fn upgrade_v3(key: &str) -> Option<&'static str> {
	v3keys().get(key).copied()
}

/// Downgrade an ID3v2.3 key to its ID3v2.2 equivalent
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::downgrade_v3;
///
/// assert_eq!(downgrade_v3("TIT2"), Some("TT2"));
/// // No ID3v2.2 equivalent
/// assert_eq!(downgrade_v3("OWNE"), None);
/// ```
pub fn downgrade_v3(key: &str) -> Option<&'static str> {
	v3_to_v2keys().get(key).copied()
}

macro_rules! gen_upgrades {
    (V2 => [$($($v2_key:literal)|* => $id3v23_from_v2:literal),+]; V3 => [$($($v3_key:literal)|* => $id3v24_from_v3:literal),+]) => {
		use std::sync::OnceLock;

		fn v2keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map = HashMap::new();
				$(
					$(
						map.insert($v2_key, $id3v23_from_v2);
					)+
				)+
				map
			})
		}

		fn v3_to_v2keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map = HashMap::new();
				$(
					$(
						map.insert($id3v23_from_v2, $v2_key);
					)+
				)+
				map
			})
		}

		fn v3keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| {
				let mut map = HashMap::new();
				$(
					$(
						map.insert($v3_key, $id3v24_from_v3);
					)+
				)+
				map
			})
		}
	};
}

gen_upgrades!(
	// ID3v2.2 => ID3v2.3
	V2 => [
		// Standard frames
		"BUF" => "RBUF",
		"CNT" => "PCNT",
		"COM" => "COMM",
		"CRA" => "AENC",
		"EQU" => "EQUA",
		"ETC" => "ETCO",
		"GEO" => "GEOB",
		"IPL" => "IPLS",
		"LNK" => "LINK",
		"MCI" => "MCDI",
		"MLL" => "MLLT",
		"PIC" => "APIC",
		"POP" => "POPM",
		"REV" => "RVRB",
		"RVA" => "RVAD",
		"SLT" => "SYLT",
		"STC" => "SYTC",
		"TAL" => "TALB",
		"TBP" => "TBPM",
		"TCM" => "TCOM",
		"TCO" => "TCON",
		"TCR" => "TCOP",
		"TDA" => "TDAT",
		"TDY" => "TDLY",
		"TEN" => "TENC",
		"TFT" => "TFLT",
		"TIM" => "TIME",
		"TKE" => "TKEY",
		"TLA" => "TLAN",
		"TLE" => "TLEN",
		"TMT" => "TMED",
		"TOA" => "TOPE",
		"TOF" => "TOFN",
		"TOL" => "TOLY",
		"TOR" => "TORY",
		"TOT" => "TOAL",
		"TP1" => "TPE1",
		"TP2" => "TPE2",
		"TP3" => "TPE3",
		"TP4" => "TPE4",
		"TPA" => "TPOS",
		"TPB" => "TPUB",
		"TRC" => "TSRC",
		"TRD" => "TRDA",
		"TRK" => "TRCK",
		"TSI" => "TSIZ",
		"TSS" => "TSSE",
		"TT1" => "TIT1",
		"TT2" => "TIT2",
		"TT3" => "TIT3",
		"TXT" => "TEXT",
		"TXX" => "TXXX",
		"TYE" => "TYER",
		"UFI" => "UFID",
		"ULT" => "USLT",
		"WAF" => "WOAF",
		"WAR" => "WOAR",
		"WAS" => "WOAS",
		"WCM" => "WCOM",
		"WCP" => "WCOP",
		"WPB" => "WPUB",
		"WXX" => "WXXX",

		// iTunes non-standard frames
		"TCP" => "TCMP",
		"TS2" => "TSO2",
		"TSA" => "TSOA",
		"TSC" => "TSOC",
		"TSP" => "TSOP",
		"TST" => "TSOT",

		// Podcast
		"PCS" => "PCST",
		"TCT" => "TCAT",
		"TDS" => "TDES",
		"TID" => "TGID",
		"WFD" => "WFED",

		// Identifiers
		"MVI" => "MVIN",
		"MVN" => "MVNM",
		"GP1" => "GRP1",
		"TDR" => "TDRL"
	];
	// ID3v2.3 => ID3v2.4
	V3 => [
		// Standard frames
		"TORY" => "TDOR",
		"TYER" => "TDRC",
		"IPLS" => "TIPL"
	]
);
