use crate::catalog::{Catalog, OperationSpec};
use crate::config::BuildConfig;
use crate::types::{DType, TENSOR_OP_DIR};
use std::path::{Path, PathBuf};

/// One (operation, data type) build unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BuildVariant {
    pub operation: OperationSpec,
    pub dtype: DType,
}

impl BuildVariant {
    pub fn new(operation: OperationSpec, dtype: DType) -> Self {
        Self { operation, dtype }
    }

    /// `{operation}-{dtype}`, the artifact file stem.
    pub fn name(&self) -> String {
        format!("{}-{}", self.operation.name, self.dtype.name())
    }

    pub fn artifact_path(&self, output_dir: &Path) -> PathBuf {
        artifact_path(output_dir, self.operation.name, self.dtype)
    }
}

/// `{output_dir}/TensorOp/{op_name}-{dtype}.spv`.
///
/// The runtime builds the same path to load a pipeline, so this layout is part
/// of the artifact format.
pub fn artifact_path(output_dir: &Path, op_name: &str, dtype: DType) -> PathBuf {
    output_dir
        .join(TENSOR_OP_DIR)
        .join(format!("{}-{}.spv", op_name, dtype.name()))
}

/// Selected operations crossed with their data types, in catalog order and then
/// type order.
///
/// Filter names that match no operation are ignored.
pub fn expand(catalog: &Catalog, config: &BuildConfig) -> Vec<BuildVariant> {
    catalog
        .operations()
        .iter()
        .filter(|op| config.selects(op))
        .flat_map(|op| op.dtypes.iter().map(move |&dtype| BuildVariant::new(*op, dtype)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_name() {
        let op = OperationSpec::unary("AddScalar", "Add");
        assert_eq!(BuildVariant::new(op, DType::I16).name(), "AddScalar-Sint16");
    }

    #[test]
    fn test_artifact_path_layout() {
        let path = artifact_path(Path::new("/out"), "Fill", DType::F8E4M3);
        assert_eq!(path, PathBuf::from("/out/TensorOp/Fill-Float8E4M3.spv"));
    }
}
