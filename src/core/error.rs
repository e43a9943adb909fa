//! Error types for scene construction and rendering.

// others
use thiserror::Error;
// sqtrace
use crate::core::parser::Rule;

/// Errors that can occur while building, loading, or rendering a scene.
///
/// Per-ray outcomes (a bounding sphere miss, Newton's method failing
/// to converge) are never errors; they are reported as an infinite
/// distance instead.
#[derive(Error, Debug)]
pub enum SqError {
    /// A transform collapses space (zero scale factor, zero rotation
    /// axis, singular matrix).
    #[error("degenerate transform: {0}")]
    DegenerateTransform(String),

    /// Superquadric exponents must be finite and at least `MIN_EXPONENT`.
    #[error("invalid superquadric exponents e={0}, n={1}")]
    InvalidExponent(f64, f64),

    /// An assembly names a child that was never added.
    #[error("assembly '{assembly}' references unknown child '{child}'")]
    MissingChildReference { assembly: String, child: String },

    /// Two objects were registered under the same name.
    #[error("object '{0}' is defined more than once")]
    DuplicateName(String),

    /// A lookup by name found nothing.
    #[error("unknown object '{0}'")]
    UnknownObject(String),

    /// Children can only be attached to assemblies.
    #[error("object '{0}' is not an assembly")]
    NotAnAssembly(String),

    /// An assembly contains itself, directly or through descendants.
    #[error("assembly '{0}' is part of a reference cycle")]
    CyclicReference(String),

    /// The scene file does not match the grammar.
    #[error("scene syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),

    /// A value in the scene file is out of range or malformed.
    #[error("invalid scene value: {0}")]
    InvalidValue(String),

    /// Reading the scene or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the final image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A render worker thread panicked.
    #[error("render worker panicked")]
    WorkerPanic,
}

/// Result type for all fallible operations of the crate.
pub type Result<T> = std::result::Result<T, SqError>;
