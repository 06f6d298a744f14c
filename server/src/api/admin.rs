//! Admin dashboards under `/api/admin`.

use super::ApiResult;
use crate::gates::AdminAccess;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use voyage_core::model::{CarProvider, Hotel, User};

/// Every traveller.
///
/// # Errors
///
/// 401 for a wrong admin key.
pub async fn users(_: AdminAccess, State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.accounts.users().await?))
}

/// Every car provider.
///
/// # Errors
///
/// 401 for a wrong admin key.
pub async fn car_providers(
    _: AdminAccess,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CarProvider>>> {
    Ok(Json(state.accounts.car_providers().await?))
}

/// Every hotel.
///
/// # Errors
///
/// 401 for a wrong admin key.
pub async fn hotels(_: AdminAccess, State(state): State<AppState>) -> ApiResult<Json<Vec<Hotel>>> {
    Ok(Json(state.catalog.hotels().await?))
}
