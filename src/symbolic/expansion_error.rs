use std::fmt;

/// Error types for the expansion of indexed expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// a `sum(` or a bracket that is never closed (or closed without being opened)
    UnbalancedDelimiters { fragment: String, position: usize },
    /// `sum(body, index)` where `index` has no domain binding
    UndeclaredIndexDomain { index: String, sum: String },
    /// `sum(` construct without a trailing `, index` part
    MissingSumIndex { sum: String },
    /// the same index name was bound twice
    DuplicateBinding { index: String },
    /// index names must look like identifiers
    InvalidIndexName { index: String },
    /// the expansion took more passes than allowed by the settings
    PassLimitExceeded { limit: usize },
    /// syntax error in a problem-definition string or a task document
    Parse(String),
    /// bad settings value or logger set-up failure
    Config(String),
    /// task document could not be read
    Io(String),
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpansionError::UnbalancedDelimiters { fragment, position } => write!(
                f,
                "Non matching delimiters at position {}: {}",
                position, fragment
            ),
            ExpansionError::UndeclaredIndexDomain { index, sum } => write!(
                f,
                "No domain declared for index '{}' used in {}",
                index, sum
            ),
            ExpansionError::MissingSumIndex { sum } => {
                write!(f, "Sum without index: {}", sum)
            }
            ExpansionError::DuplicateBinding { index } => {
                write!(f, "Index '{}' is bound more than once", index)
            }
            ExpansionError::InvalidIndexName { index } => {
                write!(f, "'{}' is not a valid index name", index)
            }
            ExpansionError::PassLimitExceeded { limit } => {
                write!(f, "Expansion did not finish within {} passes", limit)
            }
            ExpansionError::Parse(msg) => write!(f, "Parsing error: {}", msg),
            ExpansionError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ExpansionError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ExpansionError {}

impl From<std::io::Error> for ExpansionError {
    fn from(err: std::io::Error) -> Self {
        ExpansionError::Io(err.to_string())
    }
}

impl From<regex::Error> for ExpansionError {
    fn from(err: regex::Error) -> Self {
        ExpansionError::Parse(err.to_string())
    }
}
