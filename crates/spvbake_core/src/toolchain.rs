//! External shader toolchain
//!
//! Resolves the compiler and optimizer executables and probes whether they can
//! be launched:
//! - `glslang` : `.comp` → `.spv`
//! - `spirv-opt` : `.spv` → `.spv` (in place)

use crate::error::{BakeError, BakeResult};
use crate::types::TargetEnv;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const DEFAULT_COMPILER: &str = "glslang";
pub const DEFAULT_OPTIMIZER: &str = "spirv-opt";

#[derive(Clone, Debug)]
pub struct Toolchain {
    pub compiler: PathBuf,
    pub optimizer: PathBuf,
    pub target_env: TargetEnv,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            optimizer: PathBuf::from(DEFAULT_OPTIMIZER),
            target_env: TargetEnv::default(),
        }
    }
}

impl Toolchain {
    /// Fails with [`BakeError::ToolNotFound`] for the first tool that does not
    /// answer `--version`. The optimizer is only probed when it will be used.
    pub fn check(&self, with_optimizer: bool) -> BakeResult<()> {
        ensure_available(&self.compiler)?;
        if with_optimizer {
            ensure_available(&self.optimizer)?;
        }
        Ok(())
    }
}

/// Check if `program` can be launched and reports a version
pub fn is_available(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn ensure_available(program: &Path) -> BakeResult<()> {
    if is_available(program) {
        tracing::debug!(program = %program.display(), "tool available");
        Ok(())
    } else {
        Err(BakeError::ToolNotFound {
            program: program.display().to_string(),
        })
    }
}
