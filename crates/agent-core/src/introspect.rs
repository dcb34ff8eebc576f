//! Tool Introspection
//!
//! Turns a typed handler into a [`ToolDescriptor`] without a hand-written
//! schema. The argument type's `JsonSchema` supplies parameter names, types,
//! required-ness and descriptions; its doc comment becomes the tool
//! description; the handler's function name becomes the tool name.
//!
//! ```rust,ignore
//! /// Get the weather for a city
//! #[derive(Deserialize, JsonSchema)]
//! struct GetWeatherArgs {
//!     /// City name
//!     city: String,
//! }
//!
//! fn get_weather(args: GetWeatherArgs) -> anyhow::Result<String> { ... }
//!
//! let descriptor = ToolBuilder::new().sync_fn(get_weather);
//! assert_eq!(descriptor.name, "get_weather");
//! ```
//!
//! Derivation is pure: the same handler always yields the same descriptor.

use std::future::Future;

use schemars::{JsonSchema, schema_for};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::tool::{Arguments, ParamType, ParameterSchema, ToolDescriptor, ToolHandler, ToolSchema};

const ARGUMENT_SUFFIXES: [&str; 4] = ["Arguments", "Params", "Args", "Input"];

/// Builds descriptors from typed handlers, with optional overrides
#[derive(Clone, Debug, Default)]
pub struct ToolBuilder {
    name: Option<String>,
    description: Option<String>,
}

impl ToolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the derived tool name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the derived description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Derive the schema part of a descriptor for handler `F` taking `A`
    pub fn schema<A: JsonSchema, F>(&self) -> ToolSchema {
        let args = ArgumentSchema::of::<A>();

        let name = self
            .name
            .clone()
            .or_else(callable_name::<F>)
            .unwrap_or_else(|| type_to_tool_name(&args.type_name));

        let description = self
            .description
            .as_deref()
            .or(args.description.as_deref())
            .map(clean_doc)
            .unwrap_or_default();

        ToolSchema {
            name,
            description,
            parameters: args.parameters,
        }
    }

    /// Build a descriptor around a synchronous handler
    pub fn sync_fn<A, R, F>(self, f: F) -> ToolDescriptor
    where
        A: DeserializeOwned + JsonSchema + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        let schema = self.schema::<A, F>();
        let handler = ToolHandler::sync(move |args| {
            let output = f(decode(args)?)?;
            Ok(serde_json::to_value(output)?)
        });
        ToolDescriptor::new(schema, handler)
    }

    /// Build a descriptor around an asynchronous handler
    pub fn async_fn<A, R, F, Fut>(self, f: F) -> ToolDescriptor
    where
        A: DeserializeOwned + JsonSchema + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        let schema = self.schema::<A, F>();
        let handler = ToolHandler::asynchronous(move |args| {
            let pending = decode(args).map(&f);
            async move {
                let output = pending?.await?;
                Ok(serde_json::to_value(output)?)
            }
        });
        ToolDescriptor::new(schema, handler)
    }
}

/// Parameter list derived from an argument type
pub fn derive_parameters<A: JsonSchema>() -> Vec<ParameterSchema> {
    ArgumentSchema::of::<A>().parameters
}

fn decode<A: DeserializeOwned>(args: Arguments) -> anyhow::Result<A> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| anyhow::anyhow!("invalid arguments: {e}"))
}

/// What the JSON schema of an argument type tells us
struct ArgumentSchema {
    type_name: String,
    description: Option<String>,
    parameters: Vec<ParameterSchema>,
}

impl ArgumentSchema {
    fn of<A: JsonSchema>() -> Self {
        let root = serde_json::to_value(schema_for!(A)).unwrap_or_default();
        let definitions = root.get("definitions").cloned().unwrap_or_default();

        let required: Vec<&str> = root
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let parameters = root
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let (param_type, enum_values) = classify(prop, &definitions);
                        ParameterSchema {
                            name: name.clone(),
                            param_type,
                            description: prop
                                .get("description")
                                .and_then(Value::as_str)
                                .map(clean_doc)
                                .unwrap_or_default(),
                            required: required.contains(&name.as_str()),
                            default: prop.get("default").cloned(),
                            enum_values,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let type_name = A::schema_name();
        let text = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_string);

        // A multi-paragraph doc comment is split into title and description
        let description = match (text("title").filter(|t| *t != type_name), text("description")) {
            (Some(title), Some(rest)) => Some(format!("{title}\n\n{rest}")),
            (title, rest) => rest.or(title),
        };

        Self {
            type_name,
            description,
            parameters,
        }
    }
}

/// Map a property schema onto the parameter type vocabulary
fn classify(schema: &Value, definitions: &Value) -> (ParamType, Option<Vec<Value>>) {
    let Some(obj) = schema.as_object() else {
        // `true` schema: anything goes
        return (ParamType::Any, None);
    };

    if let Some(target) = obj.get("$ref").and_then(Value::as_str) {
        let resolved = target
            .strip_prefix("#/definitions/")
            .and_then(|name| definitions.get(name));
        return resolved.map_or((ParamType::Object, None), |s| classify(s, definitions));
    }

    for key in ["allOf", "anyOf", "oneOf"] {
        if let Some(variants) = obj.get(key).and_then(Value::as_array) {
            return classify_variants(variants, definitions);
        }
    }

    let enum_values = obj.get("enum").and_then(Value::as_array).map(|values| {
        values.iter().filter(|v| !v.is_null()).cloned().collect::<Vec<_>>()
    });

    let param_type = match obj.get("type") {
        Some(Value::String(ty)) => type_keyword(ty),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .map_or(ParamType::Any, type_keyword),
        _ if enum_values.is_some() => ParamType::String,
        _ => ParamType::Any,
    };

    (param_type, enum_values)
}

fn classify_variants(variants: &[Value], definitions: &Value) -> (ParamType, Option<Vec<Value>>) {
    let mut kinds = variants
        .iter()
        .filter(|v| v.get("type").and_then(Value::as_str) != Some("null"))
        .map(|v| classify(v, definitions));

    let Some(first) = kinds.next() else {
        return (ParamType::Any, None);
    };

    let mut enum_values = first.1;
    for (kind, values) in kinds {
        if kind != first.0 {
            return (ParamType::Any, None);
        }
        // string-only enums are spread over several variants by schemars
        match (&mut enum_values, values) {
            (Some(all), Some(more)) => all.extend(more),
            _ => enum_values = None,
        }
    }

    (first.0, enum_values)
}

fn type_keyword(ty: &str) -> ParamType {
    match ty {
        "string" => ParamType::String,
        "integer" => ParamType::Integer,
        "number" => ParamType::Number,
        "boolean" => ParamType::Boolean,
        "object" => ParamType::Object,
        "array" => ParamType::Array,
        _ => ParamType::Any,
    }
}

/// Last path segment of a function's type name; `None` for closures
fn callable_name<F>() -> Option<String> {
    let full = std::any::type_name::<F>();
    if full.contains("{{closure}}") {
        return None;
    }
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::")
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// `GetWeatherArgs` -> `get_weather`
fn type_to_tool_name(title: &str) -> String {
    let base = ARGUMENT_SUFFIXES
        .iter()
        .find_map(|suffix| title.strip_suffix(suffix).filter(|b| !b.is_empty()))
        .unwrap_or(title);

    let mut name = String::with_capacity(base.len() + 4);
    for (i, c) in base.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

fn clean_doc(doc: &str) -> String {
    doc.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
