use actix_web::{
    web::{self, Json, Path, Query},
    HttpResponse, Responder, ResponseError,
};
use log::{debug, error, info, warn};

use crate::asset::models::{
    Asset, BuyerQuery, CreatorQuery, PurchaseRequest, RegisterAssetRequest,
};
use crate::error::CatalogError;
use crate::{db::AppState, ErrorResponse};

/// Logs a failed operation with its cause and renders the caller-facing body.
fn failure(context: &str, err: CatalogError) -> HttpResponse {
    match &err {
        CatalogError::Store(cause) => error!("{}: {}", context, cause),
        other => warn!("{}: {}", context, other),
    }
    err.error_response()
}

fn asset_list(context: &str, result: Result<Vec<Asset>, CatalogError>) -> HttpResponse {
    match result {
        Ok(assets) => {
            debug!("{}: returning {} assets", context, assets.len());
            HttpResponse::Ok().json(assets)
        }
        Err(e) => failure(context, e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    post,
    path = "/assets",
    request_body = RegisterAssetRequest,
    responses(
        (status = 201, description = "Asset registered", body = Asset),
        (status = 400, description = "Duplicate arweaveId or invalid body", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn register_asset(
    body: Json<RegisterAssetRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing register_asset handler");
    match data.register_asset(body.into_inner()).await {
        Ok(asset) => {
            info!(
                "Asset {} registered for arweaveId '{}'",
                asset.id, asset.arweave_id
            );
            HttpResponse::Created().json(asset)
        }
        Err(e) => failure("Failed to register asset", e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    get,
    path = "/courses",
    responses(
        (status = 200, description = "All courses, newest first", body = [Asset]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_courses(data: web::Data<AppState>) -> impl Responder {
    info!("Executing list_courses handler");
    asset_list("Failed to list courses", data.list_all_assets().await)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    get,
    path = "/courses/my-courses",
    params(
        ("creator" = String, Query, description = "Identifier of the creator")
    ),
    responses(
        (status = 200, description = "Courses registered by the creator, newest first", body = [Asset]),
        (status = 400, description = "Creator address required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_my_courses(
    query: Query<CreatorQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing list_my_courses handler");
    asset_list(
        "Failed to list courses by creator",
        data.list_by_creator(query.creator.as_deref()).await,
    )
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    get,
    path = "/courses/purchased",
    params(
        ("buyer" = String, Query, description = "Identifier of the buyer")
    ),
    responses(
        (status = 200, description = "Courses purchased by the buyer, newest first", body = [Asset]),
        (status = 400, description = "Buyer address required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_purchased_courses(
    query: Query<BuyerQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing list_purchased_courses handler");
    asset_list(
        "Failed to list purchased courses",
        data.list_purchased_by(query.buyer.as_deref()).await,
    )
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    get,
    path = "/courses/{id}",
    params(
        ("id" = String, Path, description = "Identifier of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = Asset),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn get_course(id: Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = id.into_inner();
    info!("Executing get_course handler for ID: {}", id);
    match data.get_asset(&id).await {
        Ok(asset) => HttpResponse::Ok().json(asset),
        Err(e) => failure(&format!("Failed to get course '{}'", id), e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    post,
    path = "/courses/{id}/purchase",
    params(
        ("id" = String, Path, description = "Identifier of the course")
    ),
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = Asset),
        (status = 400, description = "Buyer address required or already purchased", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn purchase_course(
    id: Path<String>,
    body: Json<PurchaseRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = id.into_inner();
    info!("Executing purchase_course handler for ID: {}", id);
    match data.purchase_asset(&id, body.buyer.as_deref()).await {
        Ok(asset) => {
            info!(
                "Recorded purchase of course {} ({} buyers)",
                asset.id,
                asset.purchased_by.len()
            );
            HttpResponse::Ok().json(asset)
        }
        Err(e) => failure(&format!("Failed to purchase course '{}'", id), e),
    }
}

/// Older clients list the catalog through `/api/assets`.
#[utoipa::path(
    context_path = "/api",
    tag = "Catalog Service",
    get,
    path = "/assets",
    responses(
        (status = 200, description = "All assets, newest first", body = [Asset]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_assets_legacy(data: web::Data<AppState>) -> impl Responder {
    info!("Executing list_assets_legacy handler");
    asset_list("Failed to list assets", data.list_all_assets().await)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // The fixed `/courses/...` resources are registered ahead of `/courses/{id}`.
    cfg.service(
        web::resource("/assets")
            .route(web::get().to(list_assets_legacy))
            .route(web::post().to(register_asset)),
    )
    .service(web::resource("/courses").route(web::get().to(list_courses)))
    .service(web::resource("/courses/my-courses").route(web::get().to(list_my_courses)))
    .service(web::resource("/courses/purchased").route(web::get().to(list_purchased_courses)))
    .service(web::resource("/courses/{id}").route(web::get().to(get_course)))
    .service(web::resource("/courses/{id}/purchase").route(web::post().to(purchase_course)));
}
