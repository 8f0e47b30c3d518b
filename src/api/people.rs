//! Maintenance people API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::person::{
        MaintenancePerson, PersonDraft, PersonPatch, PersonQuery, ResolveLabelQuery, SuggestQuery,
    },
    services::people::Suggestions,
    AppState,
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/maintenance-people",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(PersonQuery),
    responses(
        (status = 200, description = "Maintenance people", body = Vec<MaintenancePerson>)
    )
)]
pub async fn list_people(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<PersonQuery>,
) -> AppResult<Json<Vec<MaintenancePerson>>> {
    let people = state.services.people.list(&query).await?;
    Ok(Json(people))
}

/// Resolve a picker label (`<national id> — <family>, <given>`) or a bare
/// national id to one person
#[utoipa::path(
    get,
    path = "/maintenance-people/resolve",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(ResolveLabelQuery),
    responses(
        (status = 200, description = "Matching person", body = MaintenancePerson),
        (status = 400, description = "Unknown or ambiguous label", body = crate::error::ErrorListResponse)
    )
)]
pub async fn resolve_person(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<ResolveLabelQuery>,
) -> AppResult<Json<MaintenancePerson>> {
    let person = state.services.people.resolve_label(&query.label).await?;
    Ok(Json(person))
}

/// Typeahead suggestions; a newer request for the same field supersedes this one
#[utoipa::path(
    get,
    path = "/maintenance-people/suggest",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(SuggestQuery),
    responses(
        (status = 200, description = "Suggestions, or an empty superseded answer", body = Suggestions)
    )
)]
pub async fn suggest_people(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<SuggestQuery>,
) -> Json<Suggestions> {
    Json(state.services.people.suggest(&ctx, &query.field, &query.q).await)
}

#[utoipa::path(
    get,
    path = "/maintenance-people/{id}",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Maintenance person", body = MaintenancePerson),
        (status = 404, description = "Person not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenancePerson>> {
    let person = state.services.people.get_by_id(id).await?;
    Ok(Json(person))
}

#[utoipa::path(
    post,
    path = "/maintenance-people",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    request_body = PersonDraft,
    responses(
        (status = 201, description = "Person created", body = MaintenancePerson),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<PersonDraft>,
) -> AppResult<(StatusCode, Json<MaintenancePerson>)> {
    let person = state.services.people.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

#[utoipa::path(
    put,
    path = "/maintenance-people/{id}",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Person ID")),
    request_body = PersonPatch,
    responses(
        (status = 200, description = "Person updated", body = MaintenancePerson),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<PersonPatch>,
) -> AppResult<Json<MaintenancePerson>> {
    let person = state.services.people.update(&ctx, id, patch).await?;
    Ok(Json(person))
}

#[utoipa::path(
    delete,
    path = "/maintenance-people/{id}",
    tag = "maintenance-people",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 409, description = "Person is responsible for maintenance records", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.people.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
