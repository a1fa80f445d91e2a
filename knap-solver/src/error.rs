#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnapsackError {
    Argument {
        reason: String,
    },
    Io {
        context: String,
        reason: String,
    },
    Format {
        line: usize,
        reason: String,
    },
    Resource {
        reason: String,
    },
    Communication {
        rank: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, KnapsackError>;

impl KnapsackError {
    pub fn argument(reason: impl Into<String>) -> Self {
        KnapsackError::Argument {
            reason: reason.into(),
        }
    }

    pub fn resource(reason: impl Into<String>) -> Self {
        KnapsackError::Resource {
            reason: reason.into(),
        }
    }

    pub fn format(line: usize, reason: impl Into<String>) -> Self {
        KnapsackError::Format {
            line,
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        KnapsackError::Io {
            context: context.into(),
            reason: err.to_string(),
        }
    }

    pub fn communication(rank: usize, reason: impl Into<String>) -> Self {
        KnapsackError::Communication {
            rank,
            reason: reason.into(),
        }
    }

    /// Process exit code used by the front end, one per error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            KnapsackError::Argument { .. } => 2,
            KnapsackError::Io { .. } => 3,
            KnapsackError::Format { .. } => 4,
            KnapsackError::Resource { .. } => 5,
            KnapsackError::Communication { .. } => 6,
        }
    }
}

impl std::fmt::Display for KnapsackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnapsackError::Argument { reason } => write!(f, "Invalid argument: {}", reason),
            KnapsackError::Io { context, reason } => {
                write!(f, "I/O failure while {}: {}", context, reason)
            }
            KnapsackError::Format { line, reason } => {
                write!(f, "Malformed input on line {}: {}", line, reason)
            }
            KnapsackError::Resource { reason } => {
                write!(f, "Resource exhausted: {}", reason)
            }
            KnapsackError::Communication { rank, reason } => {
                write!(f, "Worker {} lost communication: {}", rank, reason)
            }
        }
    }
}

impl std::error::Error for KnapsackError {}
