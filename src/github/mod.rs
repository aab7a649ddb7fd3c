pub mod api;
pub mod client;
pub mod graphql;

pub use api::GitHubApi;
pub use client::GitHubClient;
