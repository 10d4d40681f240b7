use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command};

pub fn build_command() -> Command {
    command!()
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase the verbosity of logs, can be repeated")
                .long_help(
                    "Increase the verbosity of logs, can be repeated.\n\
                     Logs are written on stderr. The RUST_LOG environment variable, \
                     if set, takes precedence over this option.",
                ),
        )
        .subcommand(
            Command::new("hash")
                .about("Print the fingerprint of the public key of certificates")
                .arg(
                    Arg::new("files")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .action(ArgAction::Append)
                        .required(true)
                        .help("DER encoded certificates, '-' to read from stdin"),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Display the fields of a certificate")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .required(true)
                        .help("DER encoded certificate, '-' to read from stdin"),
                ),
        )
        .subcommand(
            add_client_args(
                Command::new("url")
                    .about("Print the fingerprint of the public key of a https server"),
            )
            .arg(url_arg()),
        )
        .subcommand(
            add_client_args(
                Command::new("check")
                    .about("Check the public key of a https server against a pinned fingerprint")
                    .long_about(
                        "Check the public key of a https server against a pinned fingerprint.\n\n\
                         Exit code is 0 if the fingerprint matches, 1 if it does not, and 2 if \
                         the fingerprint of the server could not be computed.",
                    ),
            )
            .arg(url_arg())
            .arg(
                Arg::new("expected")
                    .value_name("HEX")
                    .value_parser(value_parser!(String))
                    .required(true)
                    .help("Expected SHA-256 fingerprint, in hexadecimal"),
            ),
        )
}

fn url_arg() -> Arg {
    Arg::new("url")
        .value_name("URL")
        .value_parser(value_parser!(String))
        .required(true)
        .help("https URL of the server")
}

fn add_client_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("insecure")
                .short('k')
                .long("insecure")
                .action(ArgAction::SetTrue)
                .help("Do not verify the certificate chain of the server"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("Timeout of the connection and of the request, default is 10"),
        )
}
