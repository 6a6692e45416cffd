//! Thin wrappers over the transport, one per API server route.
//!
//! Every platform operation is a POST of a JSON input to its route;
//! these functions only build the route string and carry the route's
//! retry-safety flag into the transport. Searches and describes are
//! safe to reissue; mutations are not, unless a caller opts in through
//! the transport directly.

use anyhow::Result;
use serde_json::Value;

use crate::http::ApiClient;

/// Route for an operation on a single object, e.g. `/record-1/describe`.
fn object_route(object_id: &str, operation: &str) -> String {
    format!("/{}/{}", object_id, operation)
}

/// Route for an app operation. Apps are addressed either by id, or by
/// name plus an optional version alias.
fn app_route(app_name_or_id: &str, alias: Option<&str>, operation: &str) -> String {
    match alias {
        Some(alias) => format!("/{}/{}/{}", app_name_or_id, alias, operation),
        None => format!("/{}/{}", app_name_or_id, operation),
    }
}

pub async fn system_greet(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/system/greet", input, true).await
}

pub async fn system_find_projects(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/system/findProjects", input, true).await
}

pub async fn system_find_data_objects(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/system/findDataObjects", input, true).await
}

pub async fn system_find_jobs(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/system/findJobs", input, true).await
}

pub async fn project_new(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/project/new", input, false).await
}

pub async fn project_describe(client: &ApiClient, project_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(project_id, "describe"), input, true)
        .await
}

pub async fn project_list_folder(
    client: &ApiClient,
    project_id: &str,
    input: Value,
) -> Result<Value> {
    client
        .call(&object_route(project_id, "listFolder"), input, true)
        .await
}

pub async fn file_new(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/file/new", input, false).await
}

pub async fn file_describe(client: &ApiClient, file_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(file_id, "describe"), input, true)
        .await
}

pub async fn file_close(client: &ApiClient, file_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(file_id, "close"), input, false)
        .await
}

pub async fn record_new(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/record/new", input, false).await
}

pub async fn record_describe(client: &ApiClient, record_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(record_id, "describe"), input, true)
        .await
}

pub async fn job_describe(client: &ApiClient, job_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(job_id, "describe"), input, true)
        .await
}

pub async fn job_terminate(client: &ApiClient, job_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(job_id, "terminate"), input, false)
        .await
}

pub async fn app_new(client: &ApiClient, input: Value) -> Result<Value> {
    client.call("/app/new", input, false).await
}

pub async fn app_describe(
    client: &ApiClient,
    app_name_or_id: &str,
    alias: Option<&str>,
    input: Value,
) -> Result<Value> {
    client
        .call(&app_route(app_name_or_id, alias, "describe"), input, true)
        .await
}

pub async fn app_run(
    client: &ApiClient,
    app_name_or_id: &str,
    alias: Option<&str>,
    input: Value,
) -> Result<Value> {
    client
        .call(&app_route(app_name_or_id, alias, "run"), input, false)
        .await
}

pub async fn app_publish(
    client: &ApiClient,
    app_name_or_id: &str,
    alias: Option<&str>,
    input: Value,
) -> Result<Value> {
    client
        .call(&app_route(app_name_or_id, alias, "publish"), input, false)
        .await
}

/// Describe for any object addressed by id, regardless of class.
pub async fn object_describe(client: &ApiClient, object_id: &str, input: Value) -> Result<Value> {
    client
        .call(&object_route(object_id, "describe"), input, true)
        .await
}
