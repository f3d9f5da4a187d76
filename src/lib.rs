//! # myapi
//!
//! A small user accounts service: create an account, look up anyone's public
//! profile, and read your own full record with the token you got at creation.
//!
//! ## Identity model
//!
//! Each account gets two random values when it is created:
//!
//! - **id**: 20 random bytes, hex encoded. Public and used in URLs.
//! - **token**: 100 random bytes, hex encoded. Returned once by the creation
//!   call and the only credential for the self lookup.
//!
//! Neither is ever regenerated. Usernames and mail addresses are unique; the
//! storage backend enforces it, the API pre-checks it to report which field clashed.
//!
//! ## Storage
//!
//! Workflows talk to an injected [`accounts::storage::Storage`]. Postgres is
//! the production backend; `memory://` keeps accounts in process.

pub mod accounts;
pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
