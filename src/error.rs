use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not set up logging: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_read_neutrally() {
        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "config.json"));
        assert_eq!(err.to_string(), "i/o failed: config.json");
    }
}
