// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// Module: output
// Purpose: Serialize comparison reports as the classic text lines or JSON.

use crate::chv::compare::{ArtifactHash, ComparisonReport, Verdict};
use clap::ValueEnum;
use std::fmt;
use strum::EnumIter;

pub const RELEASE_LABEL: &str = "In release, code hash:";
pub const BUILD_LABEL: &str = "In res,     code hash:";
pub const EXPECTED_LABEL: &str = "Expected,   code hash:";
pub const IDENTICAL_LINE: &str = "OK, Code hash are identical.";
pub const DIFFERENT_LINE: &str = "Err!!! Two code hash are diffrent.";

/// Report formats surfaced via the CLI `--format` flag.
#[derive(
	Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum, EnumIter,
)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
	#[default]
	Text,
	Json,
}

impl ReportFormat {
	pub fn canonical_name(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Json => "json",
		}
	}
}

/// A rendered report line, tagged so the caller can style it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReportLine {
	Hash(String),
	Verdict(Verdict, String),
	Json(String),
}

impl ReportLine {
	pub fn text(&self) -> &str {
		match self {
			Self::Hash(line) | Self::Json(line) => line,
			Self::Verdict(_, line) => line,
		}
	}
}

/// Error type emitted by report serializers.
#[derive(Debug)]
pub struct OutputError {
	message: String,
}

impl OutputError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl fmt::Display for OutputError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for OutputError {}

pub fn verdict_line(verdict: Verdict) -> Option<&'static str> {
	match verdict {
		Verdict::Identical => Some(IDENTICAL_LINE),
		Verdict::Different => Some(DIFFERENT_LINE),
		Verdict::Skipped => None,
	}
}

pub fn release_line(release: &ArtifactHash) -> ReportLine {
	ReportLine::Hash(format!("{} {}", RELEASE_LABEL, release.code_hash))
}

/// Text lines that follow the release line: build, expected and verdict.
pub fn comparison_lines(report: &ComparisonReport) -> Vec<ReportLine> {
	let mut lines = Vec::new();

	if let Some(build) = &report.build {
		lines.push(ReportLine::Hash(format!(
			"{} {}",
			BUILD_LABEL, build.code_hash
		)));
	}

	if let Some(expected) = &report.expected {
		lines.push(ReportLine::Hash(format!(
			"{} {}",
			EXPECTED_LABEL, expected
		)));
	}

	if let Some(line) = verdict_line(report.verdict) {
		lines.push(ReportLine::Verdict(report.verdict, line.to_string()));
	}

	lines
}

/// Render the report as the fixed-width text lines used since the first
/// release script, typos included.
pub fn render_text(report: &ComparisonReport) -> Vec<ReportLine> {
	let mut lines = vec![release_line(&report.release)];
	lines.extend(comparison_lines(report));
	lines
}

pub fn render_json(
	report: &ComparisonReport,
) -> Result<ReportLine, OutputError> {
	let serialized = serde_json::to_string(report)
		.map_err(|err| OutputError::new(err.to_string()))?;
	Ok(ReportLine::Json(serialized))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chv::compare::CompareMode;
	use crate::chv::encoding::DigestEncoding;
	use std::path::PathBuf;

	const HASH_A: &str = "6mAfWNyTPyUDabZd46snm7911Py7S3Luxe7PPmX7YdzC";

	fn report(
		build: bool,
		verdict: Verdict,
	) -> ComparisonReport {
		ComparisonReport {
			mode: CompareMode::Legacy,
			encoding: DigestEncoding::Base58,
			release: ArtifactHash {
				path: PathBuf::from("release.wasm"),
				code_hash: HASH_A.to_string(),
			},
			build: build.then(|| ArtifactHash {
				path: PathBuf::from("res/build.wasm"),
				code_hash: HASH_A.to_string(),
			}),
			expected: None,
			verdict,
		}
	}

	fn texts(lines: &[ReportLine]) -> Vec<&str> {
		lines.iter().map(ReportLine::text).collect()
	}

	#[test]
	fn skipped_report_has_single_line() {
		let lines = render_text(&report(false, Verdict::Skipped));
		assert_eq!(
			texts(&lines),
			[format!("In release, code hash: {HASH_A}")]
		);
	}

	#[test]
	fn identical_report_uses_classic_wording() {
		let lines = render_text(&report(true, Verdict::Identical));
		let release = format!("In release, code hash: {HASH_A}");
		let build = format!("In res,     code hash: {HASH_A}");
		assert_eq!(
			texts(&lines),
			[
				release.as_str(),
				build.as_str(),
				"OK, Code hash are identical.",
			]
		);
	}

	#[test]
	fn different_report_keeps_legacy_typo() {
		let lines = render_text(&report(true, Verdict::Different));
		assert_eq!(
			lines.last(),
			Some(&ReportLine::Verdict(
				Verdict::Different,
				"Err!!! Two code hash are diffrent.".to_string()
			))
		);
	}

	#[test]
	fn comparison_lines_exclude_release_line() {
		let full = render_text(&report(true, Verdict::Identical));
		let tail = comparison_lines(&report(true, Verdict::Identical));
		assert_eq!(full.len(), tail.len() + 1);
		assert_eq!(full[1..], tail[..]);
		assert_eq!(
			full[0],
			release_line(&report(false, Verdict::Skipped).release)
		);
	}

	#[test]
	fn json_report_carries_verdict() {
		let line = render_json(&report(true, Verdict::Identical))
			.expect("json");
		let value: serde_json::Value =
			serde_json::from_str(line.text()).expect("valid json");
		assert_eq!(value["mode"], "legacy");
		assert_eq!(value["encoding"], "base58");
		assert_eq!(value["verdict"], "identical");
		assert_eq!(value["release"]["code_hash"], HASH_A);
		assert_eq!(value["build"]["path"], "res/build.wasm");
		assert!(value["expected"].is_null());
	}

	#[test]
	fn json_report_without_build_has_null_build() {
		let line = render_json(&report(false, Verdict::Skipped))
			.expect("json");
		let value: serde_json::Value =
			serde_json::from_str(line.text()).expect("valid json");
		assert!(value["build"].is_null());
		assert_eq!(value["verdict"], "skipped");
	}
}
