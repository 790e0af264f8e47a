// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// File: lib.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

pub mod chv {
	pub mod app;
	pub mod compare;
	pub mod digest;
	pub mod encoding;
	pub mod output;
}
