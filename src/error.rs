use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("matrix is singular and cannot be inverted")]
    NonInvertibleMatrix,

    #[error("surface size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("malformed obj at line {line}: {reason}")]
    ObjParse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
