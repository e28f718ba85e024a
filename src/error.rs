use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("cannot write report: {0}")]
    Report(#[from] std::io::Error),
}
