use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidUrl { field: &'static str, input: String },
    ReservedKey { key: &'static str },
    OverlappingTags { tag: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidUrl { field, input } => {
                write!(f, "{field} must be an absolute http(s) URL: {input}")
            }
            Self::ReservedKey { key } => {
                write!(f, "`{key}` is reserved and cannot be used as a substitution key")
            }
            Self::OverlappingTags { tag } => {
                write!(f, "tag is both added and removed: {tag}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
