//! Operation catalog
//!
//! The table of buildable operation families. Catalog order is the order
//! variants are expanded, compiled and logged in, so it must stay stable for
//! reproducible builds.

use crate::error::{BakeError, BakeResult};
use crate::types::{DType, TemplateKind};
use serde::Serialize;
use std::collections::HashSet;

/// One buildable operation: a template plus the types it is compiled for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct OperationSpec {
    /// Artifact name prefix, e.g. `AddScalar`.
    pub name: &'static str,
    /// Name shared with the operation's scalar/tensor twin, e.g. `Add`.
    pub family: &'static str,
    pub kind: TemplateKind,
    pub dtypes: &'static [DType],
    /// Preprocessor symbol that selects the operation inside its template.
    pub symbol: &'static str,
}

impl OperationSpec {
    pub const fn fill(name: &'static str) -> Self {
        Self {
            name,
            family: name,
            kind: TemplateKind::Fill,
            dtypes: &DType::ALL,
            symbol: name,
        }
    }

    pub const fn unary(name: &'static str, family: &'static str) -> Self {
        Self {
            name,
            family,
            kind: TemplateKind::ElementWiseUnary,
            dtypes: &DType::COMPUTABLE,
            symbol: name,
        }
    }

    pub const fn binary(name: &'static str) -> Self {
        Self {
            name,
            family: name,
            kind: TemplateKind::ElementWiseBinary,
            dtypes: &DType::COMPUTABLE,
            symbol: name,
        }
    }

    fn validate(&self) -> BakeResult<()> {
        if self.name.is_empty() || self.symbol.is_empty() {
            return Err(BakeError::InvalidCatalog("operation with an empty name or symbol".into()));
        }
        if self.dtypes.is_empty() {
            return Err(BakeError::InvalidCatalog(format!("{} has no data types", self.name)));
        }
        match self.kind {
            TemplateKind::Fill => {
                if self.dtypes != DType::ALL.as_slice() {
                    return Err(BakeError::InvalidCatalog(format!(
                        "{} is a fill operation and must cover every data type",
                        self.name
                    )));
                }
            },
            TemplateKind::ElementWiseUnary | TemplateKind::ElementWiseBinary => {
                if let Some(dtype) = self.dtypes.iter().find(|d| !d.is_computable()) {
                    return Err(BakeError::InvalidCatalog(format!(
                        "{} is arithmetic but lists non-computable type {}",
                        self.name, dtype
                    )));
                }
            },
        }
        Ok(())
    }
}

const BUILTIN_OPERATIONS: [OperationSpec; 11] = [
    OperationSpec::fill("Fill"),
    OperationSpec::unary("AddScalar", "Add"),
    OperationSpec::binary("Add"),
    OperationSpec::unary("SubtractScalar", "Subtract"),
    OperationSpec::binary("Subtract"),
    OperationSpec::unary("MultiplyScalar", "Multiply"),
    OperationSpec::binary("Multiply"),
    OperationSpec::unary("DivideScalar", "Divide"),
    OperationSpec::binary("Divide"),
    OperationSpec::unary("RemainderScalar", "Remainder"),
    OperationSpec::binary("Remainder"),
];

/// Ordered, validated set of operations.
#[derive(Clone, Debug)]
pub struct Catalog {
    operations: Vec<OperationSpec>,
}

impl Catalog {
    /// The tensor ops the runtime loads binaries for.
    pub fn builtin() -> Self {
        Self {
            operations: BUILTIN_OPERATIONS.to_vec(),
        }
    }

    pub fn new(operations: Vec<OperationSpec>) -> BakeResult<Self> {
        let mut seen = HashSet::new();
        for op in &operations {
            op.validate()?;
            if !seen.insert(op.name) {
                return Err(BakeError::InvalidCatalog(format!("duplicate operation {}", op.name)));
            }
        }
        Ok(Self { operations })
    }

    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    pub fn find(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Family names in order of first appearance.
    pub fn families(&self) -> Vec<&'static str> {
        let mut families: Vec<&'static str> = Vec::new();
        for op in &self.operations {
            if !families.contains(&op.family) {
                families.push(op.family);
            }
        }
        families
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<&str> = Catalog::builtin().operations().iter().map(|op| op.name).collect();
        assert_eq!(
            names,
            [
                "Fill",
                "AddScalar",
                "Add",
                "SubtractScalar",
                "Subtract",
                "MultiplyScalar",
                "Multiply",
                "DivideScalar",
                "Divide",
                "RemainderScalar",
                "Remainder",
            ]
        );
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = Catalog::builtin();
        assert!(Catalog::new(builtin.operations().to_vec()).is_ok());
        let variants: usize = builtin.operations().iter().map(|op| op.dtypes.len()).sum();
        assert_eq!(variants, 14 + 10 * 7);
    }

    #[test]
    fn test_families() {
        assert_eq!(
            Catalog::builtin().families(),
            ["Fill", "Add", "Subtract", "Multiply", "Divide", "Remainder"]
        );
    }

    #[test]
    fn test_symbol_matches_name() {
        for op in Catalog::builtin().operations() {
            assert_eq!(op.symbol, op.name);
        }
        assert_eq!(Catalog::builtin().find("AddScalar").unwrap().family, "Add");
        assert!(Catalog::builtin().find("Add2").is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Catalog::new(vec![OperationSpec::binary("Add"), OperationSpec::binary("Add")]).unwrap_err();
        assert!(matches!(err, BakeError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_non_computable_arithmetic() {
        let op = OperationSpec {
            dtypes: &[DType::F32, DType::U8],
            ..OperationSpec::binary("Add")
        };
        assert!(Catalog::new(vec![op]).is_err());
    }

    #[test]
    fn test_rejects_empty_types() {
        let op = OperationSpec {
            dtypes: &[],
            ..OperationSpec::unary("AddScalar", "Add")
        };
        assert!(Catalog::new(vec![op]).is_err());
    }

    #[test]
    fn test_rejects_partial_fill() {
        let op = OperationSpec {
            dtypes: &DType::COMPUTABLE,
            ..OperationSpec::fill("Fill")
        };
        assert!(Catalog::new(vec![op]).is_err());
    }
}
