use thiserror::Error;

/// A field that must be numeric was not
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid {field}: {value:?}")]
pub struct ParseError {
    /// Name of the field being parsed, e.g. `mem` or `elapsed`
    pub field: &'static str,
    /// The offending raw text
    pub value: String,
}

impl ParseError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SlurmError {
    /// The tool could not be executed or exited with a non-zero status
    #[error("failed to execute `{command}`: {reason}")]
    SourceUnavailable { command: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A parse error located on a specific line of tool output
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record: {0}")]
    Csv(#[from] csv::Error),

    #[error("no nodes available")]
    NoNodesAvailable,
}

pub type Result<T, E = SlurmError> = std::result::Result<T, E>;
