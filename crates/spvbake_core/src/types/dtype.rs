use crate::error::{BakeError, BakeResult};
use serde::Serialize;
use std::fmt;

/// Element data types a tensor-op shader can be specialized for.
///
/// The discriminant is the `DATA_TYPE_ID` the shader templates switch on and
/// the name is part of every artifact file name, so neither may change for an
/// existing variant. New types get new codes at the end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u32)]
pub enum DType {
    #[serde(rename = "Float16")]
    F16 = 1,
    #[serde(rename = "Float32")]
    F32 = 2,
    #[serde(rename = "Float64")]
    F64 = 3,
    #[serde(rename = "Sint8")]
    I8 = 4,
    #[serde(rename = "Sint16")]
    I16 = 5,
    #[serde(rename = "Sint32")]
    I32 = 6,
    #[serde(rename = "Sint64")]
    I64 = 7,
    #[serde(rename = "Uint8")]
    U8 = 8,
    #[serde(rename = "Uint16")]
    U16 = 9,
    #[serde(rename = "Uint32")]
    U32 = 10,
    #[serde(rename = "Uint64")]
    U64 = 11,
    #[serde(rename = "BFloat16")]
    BF16 = 12,
    #[serde(rename = "Float8E4M3")]
    F8E4M3 = 13,
    #[serde(rename = "Float8E5M2")]
    F8E5M2 = 14,
}

impl DType {
    /// Every data type, in code order.
    pub const ALL: [DType; 14] = [
        Self::F16,
        Self::F32,
        Self::F64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::BF16,
        Self::F8E4M3,
        Self::F8E5M2,
    ];

    /// Types the arithmetic element-wise templates are instantiated for.
    pub const COMPUTABLE: [DType; 7] = [
        Self::F16,
        Self::F32,
        Self::F64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
    ];

    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::F16 => "Float16",
            Self::F32 => "Float32",
            Self::F64 => "Float64",
            Self::I8 => "Sint8",
            Self::I16 => "Sint16",
            Self::I32 => "Sint32",
            Self::I64 => "Sint64",
            Self::U8 => "Uint8",
            Self::U16 => "Uint16",
            Self::U32 => "Uint32",
            Self::U64 => "Uint64",
            Self::BF16 => "BFloat16",
            Self::F8E4M3 => "Float8E4M3",
            Self::F8E5M2 => "Float8E5M2",
        }
    }

    /// Looks a type up by its `DATA_TYPE_ID`.
    pub fn from_code(code: u32) -> BakeResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.code() == code)
            .ok_or_else(|| BakeError::UnknownDType(code.to_string()))
    }

    /// Looks a type up by its artifact name (`Float32`, `Sint8`, ...).
    pub fn from_name(name: &str) -> BakeResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.name() == name)
            .ok_or_else(|| BakeError::UnknownDType(name.to_string()))
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            Self::F8E4M3 | Self::F8E5M2 | Self::BF16 | Self::F16 | Self::F32 | Self::F64
        )
    }

    pub fn is_sint(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Full-width floats and signed integers. Unsigned integers and the narrow
    /// float encodings only support fill/copy.
    pub fn is_computable(&self) -> bool {
        matches!(self, Self::F16 | Self::F32 | Self::F64) || self.is_sint()
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
