// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// File: compare.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! Release/build comparison of encoded code hashes.

use crate::chv::digest::{CodeHash, DigestError};
use crate::chv::encoding::{encode_digest, DigestEncoding, EncodingError};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use strum::EnumIter;

/// Which file feeds the "build" side of the comparison.
#[derive(
	Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum, EnumIter,
	Serialize,
)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
	/// Re-hash the release file for the build side. The build file is
	/// only checked for existence, so an existing build file always
	/// matches.
	#[default]
	Legacy,
	/// Hash the build file's own content.
	Content,
}

impl CompareMode {
	pub fn canonical_name(self) -> &'static str {
		match self {
			Self::Legacy => "legacy",
			Self::Content => "content",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
	Identical,
	Different,
	Skipped,
}

impl Verdict {
	fn from_equality(equal: bool) -> Self {
		if equal {
			Self::Identical
		} else {
			Self::Different
		}
	}

	pub fn is_mismatch(self) -> bool {
		matches!(self, Self::Different)
	}

	/// Combine the build and expected-hash checks; any mismatch wins.
	fn merge(self, other: Verdict) -> Verdict {
		match (self, other) {
			(Self::Different, _) | (_, Self::Different) => {
				Self::Different
			}
			(Self::Skipped, v) | (v, Self::Skipped) => v,
			_ => Self::Identical,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ArtifactHash {
	pub path: PathBuf,
	pub code_hash: String,
}

/// Everything a run learned about the two artifacts.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonReport {
	pub mode: CompareMode,
	pub encoding: DigestEncoding,
	pub release: ArtifactHash,
	pub build: Option<ArtifactHash>,
	pub expected: Option<String>,
	pub verdict: Verdict,
}

/// Inputs for a single comparison run.
#[derive(Clone, Debug)]
pub struct ComparePlan {
	pub release: PathBuf,
	pub build: Option<PathBuf>,
	pub expected: Option<CodeHash>,
	pub mode: CompareMode,
	pub encoding: DigestEncoding,
}

impl ComparePlan {
	pub fn new(release: impl Into<PathBuf>) -> Self {
		Self {
			release: release.into(),
			build: None,
			expected: None,
			mode: CompareMode::default(),
			encoding: DigestEncoding::default(),
		}
	}

	pub fn with_build(mut self, build: impl Into<PathBuf>) -> Self {
		self.build = Some(build.into());
		self
	}

	pub fn with_expected(mut self, expected: CodeHash) -> Self {
		self.expected = Some(expected);
		self
	}

	pub fn with_mode(mut self, mode: CompareMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_encoding(mut self, encoding: DigestEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	/// Path whose content is hashed for the build side, if the build
	/// file exists at all.
	fn build_source(&self) -> Option<(&Path, &Path)> {
		let build = self.build.as_deref()?;
		if !build.exists() {
			return None;
		}
		let source = match self.mode {
			CompareMode::Legacy => self.release.as_path(),
			CompareMode::Content => build,
		};
		Some((build, source))
	}
}

#[derive(Debug)]
pub enum CompareError {
	Digest(DigestError),
	Encoding(EncodingError),
}

impl fmt::Display for CompareError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Digest(err) => write!(f, "{}", err),
			Self::Encoding(err) => write!(f, "{}", err),
		}
	}
}

impl std::error::Error for CompareError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Digest(err) => Some(err),
			Self::Encoding(err) => Some(err),
		}
	}
}

impl From<DigestError> for CompareError {
	fn from(err: DigestError) -> Self {
		Self::Digest(err)
	}
}

impl From<EncodingError> for CompareError {
	fn from(err: EncodingError) -> Self {
		Self::Encoding(err)
	}
}

fn encoded_hash_of(
	path: &Path,
	encoding: DigestEncoding,
) -> Result<String, CompareError> {
	let hash = CodeHash::of_file(path)?;
	Ok(encode_digest(&hash, encoding)?)
}

/// Hash the release side of a plan. Callers that print incrementally
/// emit the release line before the build side is touched.
pub fn hash_release(
	plan: &ComparePlan,
) -> Result<ArtifactHash, CompareError> {
	Ok(ArtifactHash {
		path: plan.release.clone(),
		code_hash: encoded_hash_of(&plan.release, plan.encoding)?,
	})
}

/// Hash the build side chosen by the plan's mode, when a build file
/// exists, and check any expected hash against the release.
pub fn complete_comparison(
	plan: &ComparePlan,
	release: ArtifactHash,
) -> Result<ComparisonReport, CompareError> {
	let mut verdict = Verdict::Skipped;

	let build = match plan.build_source() {
		Some((build_path, source)) => {
			let build_hash = encoded_hash_of(source, plan.encoding)?;
			verdict = verdict.merge(Verdict::from_equality(
				release.code_hash == build_hash,
			));
			Some(ArtifactHash {
				path: build_path.to_path_buf(),
				code_hash: build_hash,
			})
		}
		None => None,
	};

	let expected = match plan.expected.as_ref() {
		Some(expected) => {
			let expected_hash = encode_digest(expected, plan.encoding)?;
			verdict = verdict.merge(Verdict::from_equality(
				release.code_hash == expected_hash,
			));
			Some(expected_hash)
		}
		None => None,
	};

	Ok(ComparisonReport {
		mode: plan.mode,
		encoding: plan.encoding,
		release,
		build,
		expected,
		verdict,
	})
}

/// Run both steps. The release file is always hashed first, so an
/// unreadable release aborts before any comparison.
pub fn compare_artifacts(
	plan: &ComparePlan,
) -> Result<ComparisonReport, CompareError> {
	let release = hash_release(plan)?;
	complete_comparison(plan, release)
}
