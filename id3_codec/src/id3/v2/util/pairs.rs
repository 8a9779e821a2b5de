//! Contains utilities for ID3v2 style number pairs ("TRCK", "TPOS")

use std::fmt::Display;

pub(crate) const NUMBER_PAIR_SEPARATOR: char = '/';

// This is used as the default number of track and disk.
pub(crate) const DEFAULT_NUMBER_IN_PAIR: u32 = 0;

/// Creates an ID3v2 style number pair
pub(crate) fn format_number_pair<N, T>(number: Option<N>, total: Option<T>) -> Option<String>
where
	N: Display,
	T: Display,
{
	match (number, total) {
		(Some(number), None) => Some(number.to_string()),
		(None, Some(total)) => Some(format!(
			"{DEFAULT_NUMBER_IN_PAIR}{NUMBER_PAIR_SEPARATOR}{total}"
		)),
		(Some(number), Some(total)) => Some(format!("{number}{NUMBER_PAIR_SEPARATOR}{total}")),
		(None, None) => None,
	}
}

/// Splits a number pair ("3/12") into its parts
///
/// Either side may be missing or unparsable, which yields `None` for that side only.
pub(crate) fn split_number_pair(text: &str) -> (Option<u32>, Option<u32>) {
	let mut split = text.splitn(2, NUMBER_PAIR_SEPARATOR);

	let number = split.next().and_then(parse_number);
	let total = split.next().and_then(parse_number);

	(number, total)
}

fn parse_number(text: &str) -> Option<u32> {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return None;
	}

	match trimmed.parse::<u32>() {
		Ok(number) => Some(number),
		Err(parse_error) => {
			log::warn!("\"{trimmed}\" cannot be parsed as a number: {parse_error}");
			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::{format_number_pair, split_number_pair};

	#[test_log::test]
	fn whitespace_in_number() {
		assert_eq!(split_number_pair("  12  "), (Some(12), None));
		assert_eq!(split_number_pair(" 3 / 12 "), (Some(3), Some(12)));
	}

	#[test_log::test]
	fn empty_number_string() {
		assert_eq!(split_number_pair(""), (None, None));
		assert_eq!(split_number_pair("        "), (None, None));
		assert_eq!(split_number_pair("/5"), (None, Some(5)));
		assert_eq!(split_number_pair("x/5"), (None, Some(5)));
	}

	#[test_log::test]
	fn format() {
		assert_eq!(format_number_pair(Some(1), Some(2)).as_deref(), Some("1/2"));
		assert_eq!(format_number_pair(None::<u32>, Some(2)).as_deref(), Some("0/2"));
		assert_eq!(format_number_pair(Some(1), None::<u32>).as_deref(), Some("1"));
		assert_eq!(format_number_pair(None::<u32>, None::<u32>), None);
	}
}
