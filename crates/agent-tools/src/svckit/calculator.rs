//! Calculator Tool
//!
//! Basic arithmetic on two floating point operands.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use agent_core::{ToolBuilder, ToolDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Perform basic arithmetic (addition, subtraction, multiplication, division)
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct CalculatorArgs {
    /// Operation to apply: add, subtract, multiply or divide
    pub operation: Operation,
    /// First operand
    pub a: f64,
    /// Second operand
    pub b: f64,
}

/// Apply the requested operation.
///
/// Dividing by zero yields infinity. JSON has no infinity, so non-finite
/// results are returned as strings (`"inf"`, `"-inf"`, `"NaN"`).
pub fn calculator(args: CalculatorArgs) -> anyhow::Result<Value> {
    let CalculatorArgs { operation, a, b } = args;

    let result = match operation {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide if b == 0.0 => f64::INFINITY,
        Operation::Divide => a / b,
    };

    tracing::debug!(?operation, a, b, result, "calculator");

    if result.is_finite() {
        Ok(json!(result))
    } else {
        Ok(json!(result.to_string()))
    }
}

pub fn calculator_tool() -> ToolDescriptor {
    ToolBuilder::new().sync_fn(calculator)
}

#[cfg(test)]
mod tests {
    use agent_core::{AgentError, ParamType, ToolRegistry};
    use serde_json::Map;

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_schema_derived_from_arguments() {
        let tool = calculator_tool();
        assert_eq!(tool.name, "calculator");
        assert!(tool.description.starts_with("Perform basic arithmetic"));

        let operation = tool.parameters.iter().find(|p| p.name == "operation").unwrap();
        assert_eq!(operation.param_type, ParamType::String);
        assert!(operation.required);
        assert_eq!(
            operation.enum_values.as_deref(),
            Some(&[json!("add"), json!("subtract"), json!("multiply"), json!("divide")][..])
        );

        let a = tool.parameters.iter().find(|p| p.name == "a").unwrap();
        assert_eq!(a.param_type, ParamType::Number);
    }

    #[tokio::test]
    async fn test_operations() {
        let mut registry = ToolRegistry::new();
        registry.register(calculator_tool()).unwrap();

        let cases = [
            ("add", 2.0, 3.0, json!(5.0)),
            ("subtract", 2.0, 3.0, json!(-1.0)),
            ("multiply", 4.0, 2.5, json!(10.0)),
            ("divide", 9.0, 2.0, json!(4.5)),
        ];
        for (operation, a, b, expected) in cases {
            let result = registry
                .execute("calculator", args(json!({"operation": operation, "a": a, "b": b})))
                .await
                .unwrap();
            assert_eq!(result, expected, "{operation}");
        }
    }

    #[test]
    fn test_divide_by_zero_is_infinity() {
        let result = calculator(CalculatorArgs {
            operation: Operation::Divide,
            a: 1.0,
            b: 0.0,
        })
        .unwrap();
        assert_eq!(result, json!("inf"));
    }

    #[tokio::test]
    async fn test_unknown_operation_is_error() {
        let mut registry = ToolRegistry::new();
        registry.register(calculator_tool()).unwrap();

        let err = registry
            .execute("calculator", args(json!({"operation": "modulo", "a": 1, "b": 2})))
            .await
            .unwrap_err();

        match err {
            AgentError::ToolInvocation { tool, message } => {
                assert_eq!(tool, "calculator");
                assert!(message.contains("invalid arguments"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
