//! Arithmetic tools.
//!
//! - `add`: sum of two numbers
//! - `multiply`: product of two numbers
//!
//! Both are pure and idempotent. Integer inputs stay integers unless the
//! result overflows `i64`, in which case the computation falls back to `f64`.

pub mod add;
pub mod multiply;

pub use add::AddTool;
pub use multiply::MultiplyTool;

use serde::Deserialize;
use serde_json::Number;

use crate::domains::tools::error::ToolError;
use crate::domains::tools::schema::{ParamSpec, ParamType, ToolDescriptor};

/// Parameters shared by the binary arithmetic tools.
#[derive(Debug, Clone, Deserialize)]
pub struct OperandParams {
    pub a: Number,
    pub b: Number,
}

/// Descriptor for a tool taking two numeric operands `a` and `b`.
fn binary_descriptor(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, description)
        .param(ParamSpec::required("a", ParamType::Number).describe("First operand"))
        .param(ParamSpec::required("b", ParamType::Number).describe("Second operand"))
}

/// Apply an integer operation when both operands are integers and the result
/// fits, otherwise the floating-point one.
fn apply(
    params: &OperandParams,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Number, ToolError> {
    if let (Some(a), Some(b)) = (params.a.as_i64(), params.b.as_i64()) {
        if let Some(result) = int_op(a, b) {
            return Ok(result.into());
        }
    }

    let (a, b) = match (params.a.as_f64(), params.b.as_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ToolError::execution_failed("operands are not representable as f64")),
    };

    Number::from_f64(float_op(a, b))
        .ok_or_else(|| ToolError::execution_failed("result is not a finite number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(a: Number, b: Number) -> OperandParams {
        OperandParams { a, b }
    }

    #[test]
    fn test_integer_path() {
        let result = apply(&operands(5.into(), 3.into()), i64::checked_add, |a, b| a + b).unwrap();
        assert_eq!(result.to_string(), "8");
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let result = apply(
            &operands(i64::MAX.into(), 1.into()),
            i64::checked_add,
            |a, b| a + b,
        )
        .unwrap();
        assert!(result.is_f64());
    }

    #[test]
    fn test_non_finite_result_fails() {
        let big = Number::from_f64(f64::MAX).unwrap();
        let err = apply(&operands(big.clone(), big), i64::checked_mul, |a, b| a * b).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }
}
