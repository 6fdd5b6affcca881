/// The two error kinds surfaced to the host. Everything terminal for an
/// operation maps to one of these; no partial results are returned on error.
#[derive(thiserror::Error, Debug)]
pub enum TalkerError {
    /// Transport failure, non-retryable HTTP status, exhausted retries or an
    /// application-level "exception" payload.
    #[error("network error: {0}")]
    Network(String),
    /// Response body is not parseable as the expected structured format.
    #[error("data error: {0}")]
    Data(String),
}

pub type TalkerResult<T> = Result<T, TalkerError>;
