//! CLI utility to fingerprint the public key of X.509 certificates.
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use certpin::fetch::{fingerprint_for_url, TlsClient, TlsClientParams};
use certpin::fingerprint::public_key_hash;
use certpin::x509::AlgorithmIdentifier;
use certpin::ParsedCertificate;
use clap::ArgMatches;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

// Used in integration tests, not in the binary.
#[cfg(test)]
use assert_cmd as _;
#[cfg(test)]
use predicates as _;
#[cfg(test)]
use tempfile as _;

mod args;

/// Exit code of `check` when the fingerprint could not be computed.
const CHECK_ERROR: u8 = 2;

fn main() -> ExitCode {
    let matches = args::build_command().get_matches();

    // A subcommand is required by clap.
    let Some((name, sub_matches)) = matches.subcommand() else {
        return ExitCode::FAILURE;
    };
    init_logging(sub_matches);

    match name {
        "hash" => hash(sub_matches),
        "dump" => dump(sub_matches),
        "url" => url(sub_matches),
        "check" => check(sub_matches),
        _ => ExitCode::FAILURE,
    }
}

fn init_logging(args: &ArgMatches) {
    let level = match args.get_count("verbose") {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn hash(args: &ArgMatches) -> ExitCode {
    let mut status = ExitCode::SUCCESS;

    for path in args.get_many::<PathBuf>("files").into_iter().flatten() {
        match load_certificate(path) {
            Ok(cert) => println!("{}  {}", public_key_hash(&cert), path.display()),
            Err(err) => {
                eprintln!("{err}");
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}

fn dump(args: &ArgMatches) -> ExitCode {
    let Some(path) = args.get_one::<PathBuf>("file") else {
        return ExitCode::FAILURE;
    };
    let cert = match load_certificate(path) {
        Ok(cert) => cert,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("version: {}", u32::from(cert.version) + 1);
    println!("serial number: {}", cert.serial_number.to_str_radix(16));
    print_algorithm("signature", &cert.signature);
    println!("issuer: {}", cert.issuer);
    println!("not before: {}", cert.validity.not_before);
    println!("not after: {}", cert.validity.not_after);
    println!("subject: {}", cert.subject);
    println!(
        "public key algorithm: {}",
        certpin::oid::algorithm_name(&cert.subject_public_key_info.algorithm)
            .map_or_else(|| cert.subject_public_key_info.algorithm.to_string(), str::to_owned)
    );
    println!("public key size: {}", cert.public_key().len());
    println!("public key sha256: {}", public_key_hash(&cert));
    println!("optional fields: {}", cert.optional_fields.len());
    print_algorithm("signature algorithm", &cert.signature_algorithm);

    ExitCode::SUCCESS
}

fn print_algorithm(label: &str, algorithm: &AlgorithmIdentifier) {
    match &algorithm.parameters {
        Some(params) if !params.value.is_empty() => {
            println!("{label}: {algorithm} ({})", hex::encode(&params.value));
        }
        _ => println!("{label}: {algorithm}"),
    }
}

fn url(args: &ArgMatches) -> ExitCode {
    match fetch_fingerprint(args) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn check(args: &ArgMatches) -> ExitCode {
    let expected = args
        .get_one::<String>("expected")
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match fetch_fingerprint(args) {
        Ok(hash) if hash == expected => {
            println!("{hash}  OK");
            ExitCode::SUCCESS
        }
        Ok(hash) => {
            println!("{hash}  MISMATCH, expected {expected}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(CHECK_ERROR)
        }
    }
}

fn fetch_fingerprint(args: &ArgMatches) -> Result<String, String> {
    let url = args.get_one::<String>("url").map_or("", String::as_str);

    let mut params = TlsClientParams::default().verify_chain(!args.get_flag("insecure"));
    if let Some(secs) = args.get_one::<u64>("timeout") {
        let timeout = Some(Duration::from_secs(*secs));
        params = params.connect_timeout(timeout).timeout(timeout);
    }

    tracing::info!(url, "retrieving certificate");
    let client = TlsClient::with_params(params)
        .map_err(|err| format!("Cannot create TLS client: {err}"))?;
    fingerprint_for_url(url, &client).map_err(|err| format!("Cannot fingerprint {url}: {err}"))
}

fn load_certificate(path: &Path) -> Result<ParsedCertificate, String> {
    let contents = if path == Path::new("-") {
        let mut contents = Vec::new();
        let _ = io::stdin()
            .read_to_end(&mut contents)
            .map_err(|err| format!("Cannot read stdin: {err}"))?;
        contents
    } else {
        std::fs::read(path).map_err(|err| format!("Cannot read {}: {err}", path.display()))?
    };

    certpin::parse(&contents).map_err(|err| format!("Cannot parse {}: {err}", path.display()))
}
