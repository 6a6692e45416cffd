use anyhow::Result;
use serde_json::json;

use crate::api;
use crate::http::ApiClient;

/// Prints the description of any platform object addressed by id.
pub async fn describe(client: &ApiClient, id: &str) -> Result<()> {
    let description = api::object_describe(client, id, json!({})).await?;
    println!("{}", serde_json::to_string_pretty(&description)?);
    Ok(())
}
