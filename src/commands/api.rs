use anyhow::{Context, Result};
use serde_json::Value;

use crate::http::ApiClient;

/// Invokes an arbitrary API route and prints the JSON reply.
///
/// Raw invocations are not assumed safe to reissue; transient failures
/// are still retried per the transport's policy for the status.
pub async fn api(client: &ApiClient, route: &str, input: Option<&str>) -> Result<()> {
    let input = parse_input(input)?;
    let result = client.call(&normalize_route(route), input, false).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_input(input: Option<&str>) -> Result<Value> {
    match input {
        Some(raw) => serde_json::from_str(raw).context("Input is not valid JSON"),
        None => Ok(Value::Object(Default::default())),
    }
}

/// Routes may be given with or without the leading slash.
fn normalize_route(route: &str) -> String {
    if route.starts_with('/') || route.starts_with("http://") || route.starts_with("https://") {
        route.to_string()
    } else {
        format!("/{}", route)
    }
}
