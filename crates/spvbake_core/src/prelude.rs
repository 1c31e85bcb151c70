//! Prelude module for convenient imports
//!
//! Usage: `use spvbake_core::prelude::*;`

pub use crate::catalog::{Catalog, OperationSpec};
pub use crate::command::{synthesize, synthesize_all, CommandGroup, CompileCommand, Define, Step};
pub use crate::config::{BuildConfig, TargetFilter};
pub use crate::error::{BakeError, BakeResult};
pub use crate::runner::{
    exit_status, BatchRunner, BatchSummary, BuildEvent, CancelToken, Executor, ProcessExecutor, FAILURE_STATUS,
    SUCCESS_STATUS,
};
pub use crate::toolchain::Toolchain;
pub use crate::types::{DType, OptLevel, TargetEnv, TemplateKind};
pub use crate::variant::{artifact_path, expand, BuildVariant};
