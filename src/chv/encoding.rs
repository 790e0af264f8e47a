// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// Module: encoding
// Purpose: Render code hashes as Base58 (default), hex, base64 or a
//          base58btc multihash, and parse Base58 code hashes back.
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::chv::digest::{CodeHash, CODE_HASH_LEN};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::ValueEnum;
use multibase::Base;
use multihash::{Code, MultihashDigest};
use serde::Serialize;
use std::fmt;
use strum::EnumIter;

/// Display encodings surfaced via the CLI `--encoding` flag.
#[derive(
	Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum, EnumIter,
	Serialize,
)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DigestEncoding {
	#[default]
	Base58,
	Hex,
	Base64,
	Multihash,
}

impl DigestEncoding {
	pub fn canonical_name(self) -> &'static str {
		match self {
			Self::Base58 => "base58",
			Self::Hex => "hex",
			Self::Base64 => "base64",
			Self::Multihash => "multihash",
		}
	}
}

/// Error type for encoding and decoding code hashes.
#[derive(Debug)]
pub enum EncodingError {
	InvalidBase58 {
		input: String,
		reason: multibase::Error,
	},
	InvalidLength {
		expected: usize,
		actual: usize,
	},
	Multihash(multihash::Error),
}

impl fmt::Display for EncodingError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::InvalidBase58 { input, reason } => write!(
				f,
				"`{}` is not a valid base58 code hash: {}",
				input, reason
			),
			Self::InvalidLength { expected, actual } => write!(
				f,
				"code hash must decode to {} bytes, but decoded to {} bytes",
				expected, actual
			),
			Self::Multihash(source) => write!(
				f,
				"failed to wrap code hash into a multihash: {}",
				source
			),
		}
	}
}

impl std::error::Error for EncodingError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::InvalidBase58 { reason, .. } => Some(reason),
			Self::Multihash(source) => Some(source),
			Self::InvalidLength { .. } => None,
		}
	}
}

/// Render a code hash with the requested encoding.
pub fn encode_digest(
	hash: &CodeHash,
	encoding: DigestEncoding,
) -> Result<String, EncodingError> {
	let token = match encoding {
		DigestEncoding::Base58 => hash.to_base58(),
		DigestEncoding::Hex => hex::encode(hash),
		DigestEncoding::Base64 => STANDARD.encode(hash),
		DigestEncoding::Multihash => {
			let multihash = Code::Sha2_256
				.wrap(hash.as_ref())
				.map_err(EncodingError::Multihash)?;
			multibase::encode(Base::Base58Btc, multihash.to_bytes())
		}
	};
	Ok(token)
}

/// Decode a Base58 string (no multibase prefix) into raw bytes.
pub fn decode_base58(input: &str) -> Result<Vec<u8>, EncodingError> {
	Base::Base58Btc.decode(input).map_err(|reason| {
		EncodingError::InvalidBase58 {
			input: input.to_string(),
			reason,
		}
	})
}

/// Parse a user-supplied Base58 code hash, enforcing the SHA-256 length.
pub fn parse_code_hash(input: &str) -> Result<CodeHash, EncodingError> {
	let bytes = decode_base58(input.trim())?;
	let array: [u8; CODE_HASH_LEN] =
		bytes.as_slice().try_into().map_err(|_| {
			EncodingError::InvalidLength {
				expected: CODE_HASH_LEN,
				actual: bytes.len(),
			}
		})?;
	Ok(CodeHash::from_array(array))
}
