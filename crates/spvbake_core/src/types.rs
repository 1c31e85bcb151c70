pub mod dtype;
pub mod template;

pub use dtype::DType;
pub use template::{OptLevel, TargetEnv, TemplateKind, DATA_TYPE_ID, OPERATION_MACRO, TENSOR_OP_DIR};
