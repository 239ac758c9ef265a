//! Gadget inventory endpoints.
//!
//! Every handler is scoped to the authenticated owner. Ids that belong to
//! someone else answer `404`, exactly like ids that do not exist.
//!
//! ```text
//! GET    /api/gadgets/
//! POST   /api/gadgets/              {"name":"Smart Watch Pro","description":"..."}
//! POST   /api/gadgets/bulk_delete/  {"ids":[1,2,3]}
//! GET    /api/gadgets/{id}/
//! PUT    /api/gadgets/{id}/
//! PATCH  /api/gadgets/{id}/
//! DELETE /api/gadgets/{id}/
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, Gadget, GadgetChanges, GadgetDraft, GadgetId, GadgetName, GadgetValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for create and full update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct GadgetRequest {
    #[serde(default)]
    #[schema(example = "Smart Watch Pro")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "Advanced smartwatch with health monitoring.")]
    pub description: Option<String>,
}

/// Body for partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct GadgetPatchRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    #[schema(value_type = Option<Vec<i64>>, example = json!([1, 2, 3]))]
    pub ids: Option<Vec<GadgetId>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    /// Ids actually removed, ascending.
    #[schema(value_type = Vec<i64>)]
    pub deleted: Vec<GadgetId>,
}

fn map_name_error(err: GadgetValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

fn parse_name(raw: String) -> Result<GadgetName, Error> {
    GadgetName::new(raw).map_err(map_name_error)
}

impl TryFrom<GadgetRequest> for GadgetDraft {
    type Error = Error;

    fn try_from(value: GadgetRequest) -> Result<Self, Self::Error> {
        let name = value.name.ok_or_else(|| {
            Error::invalid_request("This field is required.")
                .with_details(json!({ "field": "name", "code": "required" }))
        })?;
        Ok(Self::new(parse_name(name)?, value.description))
    }
}

impl TryFrom<GadgetPatchRequest> for GadgetChanges {
    type Error = Error;

    fn try_from(value: GadgetPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(parse_name).transpose()?,
            description: value.description,
        })
    }
}

/// List the caller's gadgets, newest first.
#[utoipa::path(
    get,
    path = "/api/gadgets/",
    responses(
        (status = 200, description = "Caller's gadgets", body = [Gadget]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "listGadgets"
)]
#[get("/gadgets/")]
pub async fn list_gadgets(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Gadget>>> {
    let gadgets = state.gadgets.list(caller.id()).await?;
    Ok(web::Json(gadgets))
}

/// Create a gadget owned by the caller.
#[utoipa::path(
    post,
    path = "/api/gadgets/",
    request_body = GadgetRequest,
    responses(
        (status = 201, description = "Created", body = Gadget),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "createGadget"
)]
#[post("/gadgets/")]
pub async fn create_gadget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<GadgetRequest>,
) -> ApiResult<HttpResponse> {
    let draft = GadgetDraft::try_from(payload.into_inner())?;
    let gadget = state.gadget_commands.create(caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(gadget))
}

/// Delete several of the caller's gadgets at once.
///
/// Ids the caller does not own are ignored. The response lists the ids
/// that were removed.
#[utoipa::path(
    post,
    path = "/api/gadgets/bulk_delete/",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Removed ids", body = BulkDeleteResponse),
        (status = 400, description = "No ids provided", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "bulkDeleteGadgets"
)]
#[post("/gadgets/bulk_delete/")]
pub async fn bulk_delete_gadgets(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Option<web::Json<BulkDeleteRequest>>,
) -> ApiResult<web::Json<BulkDeleteResponse>> {
    let ids = payload
        .and_then(|body| body.into_inner().ids)
        .unwrap_or_default();
    let deleted = state.gadget_commands.bulk_delete(caller.id(), ids).await?;
    Ok(web::Json(BulkDeleteResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/api/gadgets/{id}/",
    params(("id" = i64, Path, description = "Gadget id")),
    responses(
        (status = 200, description = "Gadget", body = Gadget),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Missing or not owned by the caller", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "getGadget"
)]
#[get("/gadgets/{id}/")]
pub async fn get_gadget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Gadget>> {
    let gadget = state
        .gadgets
        .get(caller.id(), GadgetId::new(path.into_inner()))
        .await?;
    Ok(web::Json(gadget))
}

/// Replace a gadget's editable fields. An omitted description is kept.
#[utoipa::path(
    put,
    path = "/api/gadgets/{id}/",
    params(("id" = i64, Path, description = "Gadget id")),
    request_body = GadgetRequest,
    responses(
        (status = 200, description = "Updated gadget", body = Gadget),
        (status = 400, description = "Invalid name", body = Error),
        (status = 404, description = "Missing or not owned by the caller", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "replaceGadget"
)]
#[put("/gadgets/{id}/")]
pub async fn replace_gadget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<GadgetRequest>,
) -> ApiResult<web::Json<Gadget>> {
    let draft = GadgetDraft::try_from(payload.into_inner())?;
    let gadget = state
        .gadget_commands
        .replace(caller.id(), GadgetId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(gadget))
}

#[utoipa::path(
    patch,
    path = "/api/gadgets/{id}/",
    params(("id" = i64, Path, description = "Gadget id")),
    request_body = GadgetPatchRequest,
    responses(
        (status = 200, description = "Updated gadget", body = Gadget),
        (status = 400, description = "Invalid name", body = Error),
        (status = 404, description = "Missing or not owned by the caller", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "updateGadget"
)]
#[patch("/gadgets/{id}/")]
pub async fn update_gadget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<GadgetPatchRequest>,
) -> ApiResult<web::Json<Gadget>> {
    let changes = GadgetChanges::try_from(payload.into_inner())?;
    let gadget = state
        .gadget_commands
        .update(caller.id(), GadgetId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(gadget))
}

#[utoipa::path(
    delete,
    path = "/api/gadgets/{id}/",
    params(("id" = i64, Path, description = "Gadget id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Missing or not owned by the caller", body = Error)
    ),
    tags = ["gadgets"],
    operation_id = "deleteGadget"
)]
#[delete("/gadgets/{id}/")]
pub async fn delete_gadget(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .gadget_commands
        .delete(caller.id(), GadgetId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "gadgets_tests.rs"]
mod tests;
