// ABOUTME: Error types for Heka: the public ErrorCode/HekaError pair and the locally recovered ExtractFault.
// ABOUTME: Only classification and input problems surface as HekaError; extraction faults degrade to sentinels.

use std::fmt;

/// Error codes representing the failures a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    Fetch,
    NoContent,
    AnalysisUnavailable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidInput => "invalid input",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::NoContent => "no article text found",
            ErrorCode::AnalysisUnavailable => "bias analysis unavailable",
        };
        write!(f, "{}", s)
    }
}

/// The error type returned by the client and the host helpers.
#[derive(Debug, thiserror::Error)]
pub struct HekaError {
    pub code: ErrorCode,
    /// URL, endpoint or path the operation was working on.
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for HekaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heka: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl HekaError {
    fn new(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidInput, target, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, target, op, source)
    }

    /// Create a NoContent error.
    pub fn no_content(target: impl Into<String>, op: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoContent, target, op, None)
    }

    /// Create an AnalysisUnavailable error.
    pub fn analysis_unavailable(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::AnalysisUnavailable, target, op, source)
    }

    /// Returns true if this is an InvalidInput error.
    pub fn is_invalid_input(&self) -> bool {
        self.code == ErrorCode::InvalidInput
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if no article text could be extracted.
    pub fn is_no_content(&self) -> bool {
        self.code == ErrorCode::NoContent
    }

    /// Returns true if the bias service could not produce annotations.
    pub fn is_analysis_unavailable(&self) -> bool {
        self.code == ErrorCode::AnalysisUnavailable
    }
}

/// Faults met while extracting. They never leave the extraction layer:
/// each one is logged and replaced by sentinel metadata or an empty block list.
#[derive(Debug, thiserror::Error)]
pub enum ExtractFault {
    #[error("no structured-data block matched the expected article type")]
    MetadataNotFound,
    #[error("malformed structured-data block: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),
    #[error("no article container matched")]
    ContentContainerNotFound,
}
