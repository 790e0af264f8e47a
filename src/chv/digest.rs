// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// File: digest.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! SHA-256 code hashes over whole-file contents.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Length in bytes of a SHA-256 code hash.
pub const CODE_HASH_LEN: usize = 32;

/// Raw SHA-256 digest of an artifact.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CodeHash([u8; CODE_HASH_LEN]);

impl CodeHash {
	pub fn of_bytes(data: &[u8]) -> Self {
		let mut bytes = [0u8; CODE_HASH_LEN];
		bytes.copy_from_slice(&Sha256::digest(data));
		Self(bytes)
	}

	/// Reads the whole file into memory and hashes it in one pass.
	pub fn of_file(path: &Path) -> Result<Self, DigestError> {
		let content = std::fs::read(path).map_err(|source| {
			DigestError::FileAccess {
				path: path.to_path_buf(),
				source,
			}
		})?;
		Ok(Self::of_bytes(&content))
	}

	pub fn from_array(bytes: [u8; CODE_HASH_LEN]) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; CODE_HASH_LEN] {
		&self.0
	}

	pub fn to_base58(&self) -> String {
		multibase::Base::Base58Btc.encode(self.0)
	}
}

impl AsRef<[u8]> for CodeHash {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Display for CodeHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_base58())
	}
}

/// Error raised when an artifact cannot be hashed.
#[derive(Debug)]
pub enum DigestError {
	FileAccess { path: PathBuf, source: io::Error },
}

impl fmt::Display for DigestError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FileAccess { path, source } => write!(
				f,
				"unable to read {}: {}",
				path.display(),
				source
			),
		}
	}
}

impl std::error::Error for DigestError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::FileAccess { source, .. } => Some(source),
		}
	}
}

/// Hash the file at `path` and return its Base58 code hash.
pub fn compute_encoded_digest(
	path: &Path,
) -> Result<String, DigestError> {
	Ok(CodeHash::of_file(path)?.to_base58())
}
