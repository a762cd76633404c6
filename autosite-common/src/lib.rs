//! Common types and utilities shared across autosite crates.
//!
//! This crate defines the network identifiers, observability helpers, and shared error
//! types used throughout the workspace. It stays dependency-light so every crate can
//! depend on it.
//!
//! # Overview
//!
//! - [`Network`]: the social networks the aggregator knows how to poll
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`AutositeError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use autosite_common::Network;
//!
//! let net: Network = "github".parse().unwrap();
//! assert_eq!(net, Network::Github);
//! assert_eq!(net.title(), "Github");
//! ```
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// A social network whose activity feed is aggregated.
///
/// The lowercase name is the key under which credentials and status updates are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Twitter,
    Github,
    Linkedin,
    Xing,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Twitter,
        Network::Github,
        Network::Linkedin,
        Network::Xing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Twitter => "twitter",
            Network::Github => "github",
            Network::Linkedin => "linkedin",
            Network::Xing => "xing",
        }
    }

    /// Capitalised name for display ("twitter" -> "Twitter").
    pub fn title(&self) -> &'static str {
        match self {
            Network::Twitter => "Twitter",
            Network::Github => "Github",
            Network::Linkedin => "Linkedin",
            Network::Xing => "Xing",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = AutositeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" => Ok(Network::Twitter),
            "github" => Ok(Network::Github),
            "linkedin" => Ok(Network::Linkedin),
            "xing" => Ok(Network::Xing),
            other => Err(AutositeError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Error types used across the autosite workspace.
#[derive(thiserror::Error, Debug)]
pub enum AutositeError {
    /// A credential names a network no fetcher exists for.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// A stored credential cannot be used for this refresh.
    #[error("{network}: credential unusable ({reason})")]
    CredentialUnusable { network: String, reason: String },
}

/// Convenient alias for results that use [`AutositeError`].
pub type Result<T> = std::result::Result<T, AutositeError>;
