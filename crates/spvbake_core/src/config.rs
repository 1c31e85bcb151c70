use crate::catalog::{Catalog, OperationSpec};
use crate::toolchain::Toolchain;
use crate::types::OptLevel;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Set of requested operation or family names.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TargetFilter {
    names: BTreeSet<String>,
}

impl TargetFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a comma-separated list such as `Add,Fill`.
    ///
    /// Returns `None` when the list names nothing, which means "build all".
    pub fn parse(list: &str) -> Option<Self> {
        let filter = Self::new(list.split(',').map(str::trim).filter(|name| !name.is_empty()));
        if filter.is_empty() {
            None
        } else {
            Some(filter)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// An operation is selected by its own name or by its family name.
    pub fn matches(&self, op: &OperationSpec) -> bool {
        self.contains(op.name) || self.contains(op.family)
    }

    /// Requested names that select nothing in `catalog`.
    pub fn unmatched<'a>(&'a self, catalog: &Catalog) -> Vec<&'a str> {
        self.names()
            .filter(|name| {
                !catalog
                    .operations()
                    .iter()
                    .any(|op| op.name == *name || op.family == *name)
            })
            .collect()
    }
}

/// Everything a build needs to turn the catalog into compiler invocations.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// `None` builds every operation.
    pub targets: Option<TargetFilter>,
    /// Artifacts land in `{output_dir}/TensorOp`.
    pub output_dir: PathBuf,
    /// Directory holding `TensorOp/*.comp`; also the include root.
    pub source_root: PathBuf,
    pub enable_optimization: bool,
    pub opt_level: OptLevel,
    pub toolchain: Toolchain,
    /// Variants compiled concurrently; 1 keeps the batch strictly sequential.
    pub jobs: usize,
}

impl BuildConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            targets: None,
            output_dir: output_dir.into(),
            source_root: PathBuf::from("."),
            enable_optimization: false,
            opt_level: OptLevel::default(),
            toolchain: Toolchain::default(),
            jobs: 1,
        }
    }

    pub fn with_targets(mut self, targets: Option<TargetFilter>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = source_root.into();
        self
    }

    pub fn with_optimization(mut self, enable: bool) -> Self {
        self.enable_optimization = enable;
        self
    }

    pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
        self.opt_level = opt_level;
        self
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Whether `op` is part of this build.
    pub fn selects(&self, op: &OperationSpec) -> bool {
        self.targets.as_ref().map_or(true, |filter| filter.matches(op))
    }
}
