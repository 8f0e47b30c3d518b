//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    accounts, auth, custodians, enums, equipment, health, locations, maintenance, people, positions,
    reports, uploads,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodia API",
        version = "1.0.0",
        description = "Equipment inventory and maintenance tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        auth::update_me,
        auth::forgot_password,
        auth::reset_password,
        // Accounts
        accounts::list_accounts,
        accounts::get_account,
        accounts::create_account,
        accounts::update_account,
        accounts::delete_account,
        // Equipment
        equipment::list_equipment,
        equipment::list_equipment_min,
        equipment::resolve_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::update_location,
        locations::delete_location,
        // Custodians
        custodians::list_custodians,
        custodians::get_custodian,
        custodians::create_custodian,
        custodians::update_custodian,
        custodians::delete_custodian,
        // Positions
        positions::list_positions,
        positions::get_position,
        positions::create_position,
        positions::update_position,
        positions::delete_position,
        // Maintenance people
        people::list_people,
        people::resolve_person,
        people::suggest_people,
        people::get_person,
        people::create_person,
        people::update_person,
        people::delete_person,
        // Maintenance records
        maintenance::list_maintenance,
        maintenance::maintenance_options,
        maintenance::get_maintenance,
        maintenance::create_maintenance,
        maintenance::update_maintenance,
        maintenance::delete_maintenance,
        // Registry
        enums::list_enums,
        // Reports
        reports::equipment_report,
        reports::locations_report,
        reports::people_report,
        reports::maintenance_report,
        reports::accounts_report,
        // Uploads
        uploads::upload_file,
    ),
    components(
        schemas(
            // Auth & accounts
            crate::models::account::Account,
            crate::models::account::AccountDraft,
            crate::models::account::LoginRequest,
            crate::models::account::LoginResponse,
            crate::models::account::ForgotPasswordRequest,
            crate::models::account::ResetPasswordRequest,
            crate::models::account::MessageResponse,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentCode,
            crate::models::equipment::EquipmentDraft,
            // Locations, custodians, positions
            crate::models::location::Location,
            crate::models::location::LocationDraft,
            crate::models::custodian::Custodian,
            crate::models::custodian::CustodianDraft,
            crate::models::position::Position,
            crate::models::position::PositionDraft,
            crate::models::position::PositionPatch,
            // People
            crate::models::person::MaintenancePerson,
            crate::models::person::PersonDraft,
            crate::models::person::PersonPatch,
            crate::models::Choice,
            crate::services::people::Suggestions,
            // Maintenance
            crate::models::maintenance::MaintenanceView,
            crate::models::maintenance::MaintenanceDraft,
            crate::models::maintenance::MaintenancePatch,
            crate::models::maintenance::MaintenanceOptions,
            // Enumerations
            crate::models::enums::EquipmentType,
            crate::models::enums::EquipmentState,
            crate::models::enums::MaintenanceKind,
            crate::models::enums::MaintenancePriority,
            crate::models::enums::MaintenanceResult,
            crate::models::enums::Role,
            crate::models::enums::PositionKind,
            crate::models::enums::EnumField,
            crate::models::enums::RegistryEntry,
            // Uploads
            crate::services::uploads::StoredUpload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ErrorListResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and password recovery"),
        (name = "accounts", description = "Account management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "locations", description = "Physical locations"),
        (name = "custodians", description = "Responsible areas"),
        (name = "positions", description = "Job positions"),
        (name = "maintenance-people", description = "People responsible for maintenance"),
        (name = "maintenance", description = "Maintenance records"),
        (name = "enums", description = "Enumeration registry"),
        (name = "reports", description = "Spreadsheet exports"),
        (name = "uploads", description = "Attachment uploads")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("bearer_auth", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
