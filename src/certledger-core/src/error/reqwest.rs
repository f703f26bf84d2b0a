use thiserror::Error;

// reqwest::Error's fmt::Display appends the error descriptions of all sources.
// For this reason, it is not marked as #[source] here, so that we don't
// display the error descriptions of all sources repeatedly.
#[derive(Error, Debug)]
#[error("{}", .0)]
pub struct WrappedReqwestError(pub reqwest::Error);

impl WrappedReqwestError {
    /// True when the server could not be reached at all, as opposed to answering
    /// with an error.
    pub fn is_unreachable(&self) -> bool {
        self.0.is_connect() || self.0.is_timeout()
    }
}
