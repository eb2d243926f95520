//! Route table. Reads are public; every mutating route carries the admin
//! gate through its handler's extractor.

use crate::handlers::{auth, brands, cameras, lenses, mounts, users};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

/// Import uploads are whole spreadsheets; cap them well above any realistic
/// catalog sheet.
const MAX_IMPORT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "healthy" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Stateless service routes: GET /health, GET /version.
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // auth
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
        // users
        .route("/users/", post(users::create_user).get(users::list_users))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/activate", patch(users::activate_user))
        .route("/users/:id/deactivate", patch(users::deactivate_user))
        // brands
        .route("/brands/", post(brands::create_brand).get(brands::list_brands))
        .route("/brands/types/", get(brands::brand_types))
        .route("/brands/name/:name", get(brands::get_brand_by_name))
        .route(
            "/brands/:id",
            get(brands::get_brand)
                .put(brands::update_brand)
                .delete(brands::delete_brand),
        )
        .route("/brands/:id/activate", patch(brands::activate_brand))
        .route("/brands/:id/deactivate", patch(brands::deactivate_brand))
        .route(
            "/brands/import",
            post(brands::import_brands)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_IMPORT_BYTES)),
        )
        .route("/brands/template", get(brands::brand_template))
        // cameras
        .route(
            "/cameras/",
            post(cameras::create_camera).get(cameras::list_cameras),
        )
        .route("/cameras/query", get(cameras::query_cameras))
        .route("/cameras/sensor-sizes/", get(cameras::sensor_sizes))
        .route("/cameras/model/:model", get(cameras::get_camera_by_model))
        .route(
            "/cameras/:id",
            get(cameras::get_camera)
                .put(cameras::update_camera)
                .delete(cameras::delete_camera),
        )
        .route("/cameras/:id/activate", patch(cameras::activate_camera))
        .route("/cameras/:id/deactivate", patch(cameras::deactivate_camera))
        .route(
            "/cameras/import",
            post(cameras::import_cameras)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_IMPORT_BYTES)),
        )
        .route("/cameras/template", get(cameras::camera_template))
        // lenses
        .route("/lenses/", post(lenses::create_lens).get(lenses::list_lenses))
        .route("/lenses/query", get(lenses::query_lenses))
        .route("/lenses/types/", get(lenses::lens_types))
        .route("/lenses/focus-types/", get(lenses::focus_types))
        .route("/lenses/search/", get(lenses::search_lenses))
        .route("/lenses/model/:model", get(lenses::get_lens_by_model))
        .route(
            "/lenses/:id",
            get(lenses::get_lens)
                .put(lenses::update_lens)
                .delete(lenses::delete_lens),
        )
        .route("/lenses/:id/activate", patch(lenses::activate_lens))
        .route("/lenses/:id/deactivate", patch(lenses::deactivate_lens))
        .route(
            "/lenses/import",
            post(lenses::import_lenses)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_IMPORT_BYTES)),
        )
        .route("/lenses/template", get(lenses::lens_template))
        // mounts
        .route("/mounts/", post(mounts::create_mount).get(mounts::list_mounts))
        .route("/mounts/search/", get(mounts::search_mounts))
        .route("/mounts/name/:name", get(mounts::get_mount_by_name))
        .route(
            "/mounts/:id",
            get(mounts::get_mount)
                .put(mounts::update_mount)
                .delete(mounts::delete_mount),
        )
        .route("/mounts/:id/activate", patch(mounts::activate_mount))
        .route("/mounts/:id/deactivate", patch(mounts::deactivate_mount))
        .route(
            "/mounts/:id/brands",
            post(mounts::add_brand_to_mount).get(mounts::list_mount_brands),
        )
        .route(
            "/mounts/:id/brands/:brand_id",
            axum::routing::delete(mounts::remove_brand_from_mount),
        )
        .route("/mounts/:id/cameras", get(mounts::list_mount_cameras))
        .route("/mounts/:id/lenses", get(mounts::list_mount_lenses))
        .with_state(state);

    Router::new().merge(common_routes()).merge(api)
}
