#![allow(missing_docs)]
#![allow(unused_results)]
#![allow(unused_crate_dependencies)]
#![allow(clippy::pedantic)]


// Fingerprint of the public key.
mod fingerprint;

// Retrieval through an injected client.
mod fetch;

// DER builders and fixtures.
mod utils;
