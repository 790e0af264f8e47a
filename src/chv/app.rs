// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: codehash-verify
// File: app.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::chv::compare::{
	complete_comparison, hash_release, CompareMode, ComparePlan,
	ComparisonReport, Verdict,
};
use crate::chv::encoding::{parse_code_hash, DigestEncoding};
use crate::chv::output::{
	comparison_lines, release_line, render_json, ReportFormat,
	ReportLine,
};
use clap::{crate_name, Arg, ArgAction, ArgMatches};
use colored::*;
use std::error::Error;
use std::path::PathBuf;
use strum::IntoEnumIterator;

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
Written by {author-with-newline}{about-with-newline}
Compare the SHA-256 code hash of a release artifact with a build artifact:
  chv out/release.wasm res/build.wasm
{usage-heading} {usage}

{all-args}{after-help}
";

const LEGACY_WARNING: &str = "legacy mode hashes the release file twice; pass --mode content to verify the build file";

/// Settings resolved from the command line for a single run.
#[derive(Clone, Debug)]
pub struct RunConfig {
	pub plan: ComparePlan,
	pub format: ReportFormat,
	pub strict: bool,
}

impl RunConfig {
	pub fn from_matches(
		matches: &ArgMatches,
	) -> Result<Self, Box<dyn Error>> {
		let release = matches
			.get_one::<PathBuf>("RELEASE")
			.cloned()
			.ok_or("No release file provided.")?;
		let mode = matches
			.get_one::<CompareMode>("mode")
			.copied()
			.unwrap_or_default();
		let encoding = matches
			.get_one::<DigestEncoding>("encoding")
			.copied()
			.unwrap_or_default();
		let format = matches
			.get_one::<ReportFormat>("format")
			.copied()
			.unwrap_or_default();

		let mut plan = ComparePlan::new(release)
			.with_mode(mode)
			.with_encoding(encoding);
		if let Some(build) = matches.get_one::<PathBuf>("BUILD") {
			plan = plan.with_build(build.clone());
		}
		if let Some(expected) = matches.get_one::<String>("expect") {
			plan = plan.with_expected(parse_code_hash(expected)?);
		}

		Ok(Self {
			plan,
			format,
			strict: matches.get_flag("strict"),
		})
	}
}

fn possible_values<T: IntoEnumIterator>(
	name: fn(T) -> &'static str,
) -> String {
	T::iter().map(name).collect::<Vec<_>>().join(", ")
}

pub fn build_cli() -> clap::Command {
	clap::Command::new(crate_name!())
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name("chv")
		.version(clap::crate_version!())
		.author(clap::crate_authors!())
		.about("Verify that a build artifact matches a release by SHA-256 code hash")
		.arg_required_else_help(true)
		.arg(
			Arg::new("RELEASE")
				.help("Release artifact whose code hash is the reference")
				.value_parser(clap::value_parser!(PathBuf))
				.required(true),
		)
		.arg(
			Arg::new("BUILD")
				.help("Build artifact to verify; comparison is skipped when it does not exist")
				.value_parser(clap::value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("mode")
				.short('m')
				.long("mode")
				.value_parser(clap::value_parser!(CompareMode))
				.help(format!(
					"Which content feeds the build side ({})",
					possible_values(CompareMode::canonical_name)
				))
				.default_value("legacy"),
		)
		.arg(
			Arg::new("encoding")
				.short('e')
				.long("encoding")
				.value_parser(clap::value_parser!(DigestEncoding))
				.help(format!(
					"Code hash encoding ({})",
					possible_values(DigestEncoding::canonical_name)
				))
				.default_value("base58"),
		)
		.arg(
			Arg::new("format")
				.short('f')
				.long("format")
				.value_parser(clap::value_parser!(ReportFormat))
				.help(format!(
					"Report format ({})",
					possible_values(ReportFormat::canonical_name)
				))
				.default_value("text"),
		)
		.arg(
			Arg::new("expect")
				.long("expect")
				.value_name("HASH")
				.help("Known base58 code hash the release file must match"),
		)
		.arg(
			Arg::new("strict")
				.long("strict")
				.help("Exit with status 1 when the code hashes differ")
				.action(ArgAction::SetTrue),
		)
}

fn emit_line(line: &ReportLine) {
	match line {
		ReportLine::Verdict(Verdict::Identical, text) => {
			println!("{}", text.green())
		}
		ReportLine::Verdict(_, text) => println!("{}", text.red()),
		other => println!("{}", other.text()),
	}
}

fn warn_legacy_build(config: &RunConfig, report: &ComparisonReport) {
	if report.build.is_some()
		&& matches!(config.plan.mode, CompareMode::Legacy)
	{
		eprintln!(
			"{}",
			format!("warning: {}", LEGACY_WARNING).yellow()
		);
	}
}

/// Run a comparison and print its report. Returns the verdict so the
/// caller can decide on the exit status. In text format the release
/// line is printed before the build side is read.
pub fn execute(config: &RunConfig) -> Result<Verdict, Box<dyn Error>> {
	let release = hash_release(&config.plan)?;

	let report = match config.format {
		ReportFormat::Text => {
			emit_line(&release_line(&release));
			let report = complete_comparison(&config.plan, release)?;
			warn_legacy_build(config, &report);
			for line in comparison_lines(&report) {
				emit_line(&line);
			}
			report
		}
		ReportFormat::Json => {
			let report = complete_comparison(&config.plan, release)?;
			warn_legacy_build(config, &report);
			emit_line(&render_json(&report)?);
			report
		}
	};

	Ok(report.verdict)
}

fn exit_with_error(err: &dyn Error) -> ! {
	eprintln!("{}", format!("error: {}", err).red());
	std::process::exit(1);
}

pub fn run() -> Result<(), Box<dyn Error>> {
	let matches = build_cli().get_matches();
	let config = match RunConfig::from_matches(&matches) {
		Ok(config) => config,
		Err(err) => exit_with_error(&*err),
	};
	let verdict = match execute(&config) {
		Ok(verdict) => verdict,
		Err(err) => exit_with_error(&*err),
	};
	if config.strict && verdict.is_mismatch() {
		std::process::exit(1);
	}
	Ok(())
}
