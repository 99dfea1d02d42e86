//! Hosting API adapters.

pub mod github;

pub use github::{DEFAULT_API_URL, GithubHosting};
