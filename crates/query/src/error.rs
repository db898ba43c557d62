use thiserror::Error;

/// Caller errors on the query façade. These never affect other queries.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unknown pattern: '{0}'")]
    UnknownPattern(String),

    #[error("pattern '{0}' has no rotating variant cycle; variant filters do not apply")]
    FilterUnsupported(String),
}
