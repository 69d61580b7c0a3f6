use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a `wcli` command.
///
/// Each variant is terminal for the invocation; nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load credentials from {}. Run `wcli setup` to create it", .path.display())]
    CredentialsUnavailable {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("could not write credentials to {}", .path.display())]
    CredentialsWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read credential input")]
    Prompt(#[source] io::Error),

    #[error("request to the weather provider failed")]
    Request(#[source] reqwest::Error),

    #[error("failed to read the weather provider response body")]
    Body(#[source] reqwest::Error),

    #[error("failed to decode the weather provider response")]
    Decode(#[from] serde_json::Error),

    /// The provider returned no daily entries, so there is no summary for today.
    #[error("weather response contains no daily forecast")]
    NoDailyForecast,

    #[error("failed to write output")]
    Output(#[from] io::Error),
}
