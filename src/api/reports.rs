//! Spreadsheet report endpoints

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppResult,
    models::{
        account::AccountQuery, equipment::EquipmentQuery, location::LocationQuery,
        maintenance::MaintenanceQuery, person::PersonQuery,
    },
    services::reports::XLSX_CONTENT_TYPE,
    AppState,
};

use super::AuthenticatedUser;

fn xlsx(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        bytes,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/reports/equipment.xlsx",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn equipment_report(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.equipment(&query).await?;
    Ok(xlsx("equipment.xlsx", bytes))
}

#[utoipa::path(
    get,
    path = "/reports/locations.xlsx",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(LocationQuery),
    responses(
        (status = 200, description = "Locations workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn locations_report(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.locations(&query).await?;
    Ok(xlsx("locations.xlsx", bytes))
}

#[utoipa::path(
    get,
    path = "/reports/maintenance-people.xlsx",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(PersonQuery),
    responses(
        (status = 200, description = "Maintenance people workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn people_report(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<PersonQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.people(&query).await?;
    Ok(xlsx("maintenance-people.xlsx", bytes))
}

#[utoipa::path(
    get,
    path = "/reports/maintenance.xlsx",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Maintenance workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    )
)]
pub async fn maintenance_report(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.maintenance(&query).await?;
    Ok(xlsx("maintenance.xlsx", bytes))
}

#[utoipa::path(
    get,
    path = "/reports/accounts.xlsx",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(AccountQuery),
    responses(
        (status = 200, description = "Accounts workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn accounts_report(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<AccountQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.accounts(&ctx, &query).await?;
    Ok(xlsx("accounts.xlsx", bytes))
}
