use redis::{Script, aio::ConnectionLike};
use serde::Serialize;
use serde_json::Value;

use crate::errors::PlatformError;

/// Runs one mutation script: the command is serialized to JSON and passed as
/// `ARGV[1]`; the script replies with a JSON object, either a result or an
/// `{ "error": code }` envelope that is decoded into a typed error here.
pub async fn run_script<C, T>(conn: &mut C, script: &Script, command: &T) -> Result<Value, PlatformError>
where
    C: ConnectionLike + Send,
    T: Serialize,
{
    let payload = serde_json::to_string(command)
        .map_err(|err| PlatformError::other(format!("failed to serialize store command: {err}")))?;

    let mut invocation = script.prepare_invoke();
    invocation.arg(payload);
    let raw: String = invocation.invoke_async(conn).await.map_err(PlatformError::StoreWrite)?;

    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| PlatformError::other(format!("failed to parse script response: {err}")))?;

    if let Some(code) = value.get("error").and_then(|error| error.as_str()) {
        let entity_id = value
            .get("entity_id")
            .and_then(|id| id.as_str())
            .map(|id| id.to_string());
        return Err(match code {
            "entity_not_found" => PlatformError::NotFound { entity_id },
            other => PlatformError::other(other.to_string()),
        });
    }

    Ok(value)
}
