// Repository stats module.
// The cached, failure-tolerant client handed to presentation code.

pub mod client;

pub use client::RepoDataClient;
