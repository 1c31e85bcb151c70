use serde::Serialize;
use std::fmt;

/// Directory under both the source root and the output directory that holds
/// the tensor-op templates and their compiled variants.
pub const TENSOR_OP_DIR: &str = "TensorOp";

/// Value every template expects for the operation symbol it is compiled with,
/// e.g. `-DAddScalar=Operation`.
pub const OPERATION_MACRO: &str = "Operation";

/// Preprocessor symbol carrying the numeric [`DType`](crate::types::DType) code.
pub const DATA_TYPE_ID: &str = "DATA_TYPE_ID";

/// Parametric compute-shader source an operation is instantiated from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateKind {
    /// Writes a constant into every element of one tensor.
    Fill,
    /// `output = op(input, scalar)`.
    ElementWiseUnary,
    /// `output = op(input, other)`.
    ElementWiseBinary,
}

impl TemplateKind {
    /// File name of the template below [`TENSOR_OP_DIR`].
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Fill => "ForEach.comp",
            Self::ElementWiseUnary => "ElementWiseUnary.comp",
            Self::ElementWiseBinary => "ElementWiseBinary.comp",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fill => "fill",
            Self::ElementWiseUnary => "unary",
            Self::ElementWiseBinary => "binary",
        };
        write!(f, "{s}")
    }
}

impl fmt::Debug for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// `--target-env` token handed to the compiler.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TargetEnv(pub String);

impl Default for TargetEnv {
    fn default() -> Self {
        Self("spirv1.6".to_string())
    }
}

impl fmt::Display for TargetEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the in-place optimizer pass optimizes for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OptLevel {
    #[default]
    Performance,
    Size,
}

impl OptLevel {
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Performance => "-O",
            Self::Size => "-Os",
        }
    }
}
