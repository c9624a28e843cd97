//! Shared argument parsing for tools.

use courseforge_core::ToolFailure;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize a tool's typed argument struct from the raw model
/// arguments. `null` is treated as an empty object, since models often
/// omit the argument payload entirely for parameterless tools.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolFailure> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolFailure::invalid_arguments(e.to_string()))
}
