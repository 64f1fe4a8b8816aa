pub mod logging;

use crate::conformance::{
    contract::{DEFAULT_ADDRESS, DEFAULT_PRODUCT, DEFAULT_SECONDARY_ADDRESS},
    suite::SUITE_NAMES,
};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        PossibleValuesParser, ValueParser,
    },
    Arg, ColorChoice, Command,
};
use std::path::PathBuf;
use url::Url;

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_PRODUCT: &str = "product";
pub const ARG_ADDRESS: &str = "address";
pub const ARG_SECONDARY_ADDRESS: &str = "secondary-address";
pub const ARG_SUITE: &str = "suite";
pub const ARG_REPORT: &str = "report";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

pub fn validator_base_url() -> ValueParser {
    ValueParser::from(move |url: &str| -> std::result::Result<String, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;

        match parsed.scheme() {
            "http" | "https" => Ok(url.to_string()),
            scheme => Err(format!("unsupported scheme {scheme}, expected http or https")),
        }
    })
}

pub fn validator_address() -> ValueParser {
    ValueParser::from(move |address: &str| -> std::result::Result<String, String> {
        let hex = address
            .strip_prefix("0x")
            .ok_or_else(|| "address must start with 0x".to_string())?;

        if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(address.to_string())
        } else {
            Err("address must be 0x followed by hex characters".to_string())
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("wallet2fa-conformance")
        .about("Conformance checks for the Wallet2FA authentication API")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_BASE_URL)
                .short('u')
                .long(ARG_BASE_URL)
                .help("Base URL of the API under test, including the /api prefix")
                .default_value(DEFAULT_BASE_URL)
                .env("WALLET2FA_BASE_URL")
                .value_parser(validator_base_url()),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long(ARG_TIMEOUT)
                .help("Per-request timeout in seconds")
                .default_value("10")
                .env("WALLET2FA_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
        .arg(
            Arg::new(ARG_PRODUCT)
                .long(ARG_PRODUCT)
                .help("Product name the health endpoint's service field must contain")
                .default_value(DEFAULT_PRODUCT)
                .env("WALLET2FA_PRODUCT"),
        )
        .arg(
            Arg::new(ARG_ADDRESS)
                .long(ARG_ADDRESS)
                .help("Wallet address used for nonce and verify requests")
                .default_value(DEFAULT_ADDRESS)
                .env("WALLET2FA_ADDRESS")
                .value_parser(validator_address()),
        )
        .arg(
            Arg::new(ARG_SECONDARY_ADDRESS)
                .long(ARG_SECONDARY_ADDRESS)
                .help("Second, distinct wallet address used by the persistence liveness probe")
                .default_value(DEFAULT_SECONDARY_ADDRESS)
                .env("WALLET2FA_SECONDARY_ADDRESS")
                .value_parser(validator_address()),
        )
        .arg(
            Arg::new(ARG_SUITE)
                .short('s')
                .long(ARG_SUITE)
                .help("Which checks to run")
                .default_value("all")
                .env("WALLET2FA_SUITE")
                .value_parser(PossibleValuesParser::new(SUITE_NAMES)),
        )
        .arg(
            Arg::new(ARG_REPORT)
                .short('r')
                .long(ARG_REPORT)
                .help("Write a JSON report of every result to this path")
                .env("WALLET2FA_REPORT")
                .value_parser(clap::value_parser!(PathBuf)),
        );

    logging::with_args(command)
}
