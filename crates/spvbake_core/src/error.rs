use std::fmt;

/// Main error type for spvbake_core.
///
/// Every failure of a build bubbles up unchanged to the batch driver; no step
/// translates or retries errors.
#[derive(Clone)]
pub enum BakeError {
    // ===== Configuration Errors =====
    /// The output directory (or its `TensorOp` subdirectory) could not be created.
    CreateOutputDir { path: String, reason: String },
    /// An operation catalog violated its invariants.
    InvalidCatalog(String),
    /// A data type name or code that is not in the type catalog.
    UnknownDType(String),

    // ===== Toolchain Errors =====
    /// A required external tool did not answer the availability probe.
    ToolNotFound { program: String },
    /// The compiler or optimizer could not be launched.
    Spawn { program: String, reason: String },
    /// The compiler or optimizer ran and exited unsuccessfully.
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    // ===== Batch Errors =====
    /// The worker pool for a parallel batch could not be started.
    ThreadPool(String),
    /// The batch was cancelled before it completed.
    Cancelled,
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateOutputDir { path, reason } => {
                write!(f, "failed to create output directory {}: {}", path, reason)
            },
            Self::InvalidCatalog(reason) => write!(f, "invalid operation catalog: {}", reason),
            Self::UnknownDType(name) => write!(f, "unknown data type: {}", name),
            Self::ToolNotFound { program } => {
                write!(f, "{} not found (install it or pass its path explicitly)", program)
            },
            Self::Spawn { program, reason } => write!(f, "failed to run {}: {}", program, reason),
            Self::CommandFailed { program, code, stderr } => {
                match code {
                    Some(code) => write!(f, "{} exited with status {}", program, code)?,
                    None => write!(f, "{} was terminated by a signal", program)?,
                }
                let stderr = stderr.trim_end();
                if !stderr.is_empty() {
                    write!(f, ":\n{}", stderr)?;
                }
                Ok(())
            },
            Self::ThreadPool(reason) => write!(f, "failed to start worker pool: {}", reason),
            Self::Cancelled => write!(f, "build cancelled"),
        }
    }
}

impl fmt::Debug for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BakeError({})", self)
    }
}

impl std::error::Error for BakeError {}

pub type BakeResult<T> = Result<T, BakeError>;
