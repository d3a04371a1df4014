//! Errors raised while building a router.
//!
//! Lookups never fail with an error: a request that matches nothing simply
//! yields no route. Everything here is surfaced at registration time.

use std::path::PathBuf;

use thiserror::Error;

/// A route pattern could not be inserted into the tree.
///
/// These are configuration mistakes in the route table itself, never the
/// result of a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The pattern does not start with `/`.
    #[error("expect pattern beginning with '/', found: '{pattern}'")]
    MissingLeadingSlash { pattern: String },

    /// A `:` or `*` marker without a name.
    #[error("wildcards must be named with a non-empty name in pattern '{pattern}'")]
    UnnamedWildcard { pattern: String },

    /// More than one marker inside a single path segment, e.g. `/:a:b`.
    #[error("only one wildcard per path segment is allowed in pattern '{pattern}'")]
    TooManyWildcards { pattern: String },

    /// A catch-all that is followed by more path.
    #[error("catch-all is only allowed at the end of the pattern '{pattern}'")]
    CatchAllNotLast { pattern: String },

    /// A catch-all that is not directly preceded by `/`.
    #[error("no '/' before catch-all in pattern '{pattern}'")]
    CatchAllWithoutSlash { pattern: String },

    /// The wildcard conflicts with a wildcard already registered at the same
    /// position in the tree.
    #[error("'{segment}' in new pattern '{pattern}' conflicts with existing wildcard '{existing}'")]
    Conflict {
        pattern: String,
        segment: String,
        existing: String,
    },

    /// A custom constraint pattern failed to compile.
    #[error("invalid constraint for parameter '{param}': {message}")]
    InvalidConstraint { param: String, message: String },
}

/// Routes could not be merged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Route merging is turned off in the router configuration.
    #[error("route merging is disabled")]
    Disabled,

    /// Fewer than two routes are registered for the pattern.
    #[error("merging '{pattern}' needs at least two routes, found {found}")]
    TooFewRoutes { pattern: String, found: usize },

    /// Re-inserting the merged route failed.
    #[error(transparent)]
    Insert(#[from] InsertError),
}

/// The router configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse router config: {0}")]
    Parse(#[from] toml::de::Error),
}
