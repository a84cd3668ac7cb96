//! Best-effort decoding of compact `header.payload.signature` tokens for debugging.
//!
//! Nothing here verifies signatures. Decoded claims are for display only and must never be used
//! to establish trust. Every helper returns `None` on malformed input instead of failing.

// crates.io
use base64::{
	Engine as _, alphabet,
	engine::{GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::Value;
// self
use crate::_prelude::*;

// Issuers are not always strict about the unused low bits of the final symbol.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Borrowed view over a compact token such as a JWT access or ID token.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompactToken<'a> {
	raw: &'a str,
}
impl<'a> CompactToken<'a> {
	/// Wraps a raw token string.
	pub fn new(raw: &'a str) -> Self {
		Self { raw }
	}

	/// Header segment as pretty-printed JSON.
	pub fn header(&self) -> Option<String> {
		self.header_value().and_then(|value| pretty(&value))
	}

	/// Payload segment as pretty-printed JSON.
	pub fn payload(&self) -> Option<String> {
		self.payload_value().and_then(|value| pretty(&value))
	}

	/// Header segment as a dynamic JSON tree.
	pub fn header_value(&self) -> Option<Value> {
		decode_segment(self.segments()?[0])
	}

	/// Payload segment as a dynamic JSON tree.
	pub fn payload_value(&self) -> Option<Value> {
		decode_segment(self.segments()?[1])
	}

	/// Raw (still encoded) signature segment.
	pub fn signature(&self) -> Option<&'a str> {
		Some(self.segments()?[2])
	}

	// Anything other than exactly three segments is treated as opaque.
	fn segments(&self) -> Option<[&'a str; 3]> {
		let mut parts = self.raw.split('.');
		let segments = [parts.next()?, parts.next()?, parts.next()?];

		match parts.next() {
			Some(_) => None,
			None => Some(segments),
		}
	}
}
impl Debug for CompactToken<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CompactToken(<redacted>)")
	}
}

/// Decodes one base64url segment into a JSON tree.
pub fn decode_segment(segment: &str) -> Option<Value> {
	let bytes = decode_base64url(segment)?;

	serde_json::from_slice(&bytes).ok()
}

fn decode_base64url(segment: &str) -> Option<Vec<u8>> {
	let mut standard = segment
		.chars()
		.map(|c| match c {
			'-' => '+',
			'_' => '/',
			other => other,
		})
		.collect::<String>();

	while standard.len() % 4 != 0 {
		standard.push('=');
	}

	LENIENT.decode(standard).ok()
}

fn pretty(value: &Value) -> Option<String> {
	serde_json::to_string_pretty(value).ok()
}
