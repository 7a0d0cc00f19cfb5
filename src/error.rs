use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NetworkError {
    // Model construction
    InvalidLayerSizes(String),

    // Shape checks, rejected before any computation
    InputShapeMismatch(String),
    TargetShapeMismatch(String),

    // Classifier helpers
    InvalidLabel(String),

    // Persistence
    DecodeError(String),
    ParseError(String),
    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetworkError::InvalidLayerSizes(msg) => write!(f, "Invalid layer sizes: {}", msg),
            NetworkError::InputShapeMismatch(msg) => write!(f, "Input shape mismatch: {}", msg),
            NetworkError::TargetShapeMismatch(msg) => write!(f, "Target shape mismatch: {}", msg),
            NetworkError::InvalidLabel(msg) => write!(f, "Invalid label: {}", msg),
            NetworkError::DecodeError(msg) => write!(f, "Failed to decode model: {}", msg),
            NetworkError::ParseError(msg) => write!(f, "Failed to parse model text: {}", msg),
            NetworkError::IoError(err) => write!(f, "I/O error: {}", err),
            NetworkError::SerializationError(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> NetworkError {
        NetworkError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NetworkError {
    fn from(err: Box<bincode::ErrorKind>) -> NetworkError {
        NetworkError::SerializationError(err)
    }
}

impl Error for NetworkError {}

pub type Result<T> = std::result::Result<T, NetworkError>;
