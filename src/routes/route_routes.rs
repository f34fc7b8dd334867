use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    ApiResponse, CreateRouteRequest, RouteResponse, SearchQuery, SuggestionsQuery,
    TemplateViaResponse, ToggleFavoriteRequest, ToggleFavoriteResponse, ToggleStatusRequest,
    TemplateViasQuery,
};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/add", post(publish_route))
        .route("/get", get(my_routes))
        .route("/search", get(search_routes))
        .route("/suggestions", get(location_suggestions))
        .route("/template-vias", get(template_vias))
        .route("/delete/:id", delete(delete_route))
        .route("/toggle-status", post(toggle_route_status))
        .route("/toggle-favorite", post(toggle_favorite))
        .route("/my-favorites", get(my_favorites))
}

async fn publish_route(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RouteResponse>>), AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.publish(auth.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn my_routes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.my_routes(auth.user_id).await?;
    Ok(Json(response))
}

async fn search_routes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller
        .search(
            query.from.as_deref().unwrap_or(""),
            query.to.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(Json(response))
}

async fn location_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller
        .suggestions(query.q.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(response))
}

async fn template_vias(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<TemplateViasQuery>,
) -> Result<Json<Vec<TemplateViaResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller
        .template_vias(
            query.start.as_deref().unwrap_or(""),
            query.end.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    controller.delete(auth.user_id, id).await?;
    Ok(Json(serde_json::json!({
        "message": "Route deleted successfully"
    })))
}

async fn toggle_route_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ToggleStatusRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.toggle_status(auth.user_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Route status updated".to_string(),
    )))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ToggleFavoriteRequest>,
) -> Result<Json<ToggleFavoriteResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.toggle_favorite(auth.user_id, request.route_id).await?;
    Ok(Json(response))
}

async fn my_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.my_favorites(auth.user_id).await?;
    Ok(Json(response))
}
