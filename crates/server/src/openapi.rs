//! OpenAPI document served at `/api-docs/openapi.json` and rendered under `/docs`.
//!
//! Request bodies are described by doc-only schemas so the service crate stays
//! free of utoipa.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    /// Cliente (default) or Prestador
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CategoryRequest { pub name: String, pub description: Option<String>, pub parent_id: Option<Uuid> }

#[derive(ToSchema)]
pub struct ServiceRequest { pub category_id: Uuid, pub name: String, pub description: String, pub price: Option<f64> }

#[derive(ToSchema)]
pub struct RequisitionRequest { pub service_id: Uuid, pub additional_info: Option<String> }

#[derive(ToSchema)]
pub struct CommentRequest {
    pub requisition_id: Uuid,
    pub comment: Option<String>,
    /// 1..=5
    pub evaluation: Option<i32>,
}

#[derive(ToSchema)]
pub struct CommentEditRequest { pub comment: Option<String>, pub evaluation: Option<i32> }

#[derive(ToSchema)]
pub struct GamificationRequest {
    pub name: String,
    pub points_per_comment: i32,
    pub points_per_evaluation: i32,
    pub points_per_service: i32,
}

#[derive(ToSchema)]
pub struct ComplaintRequest { pub service_id: Option<Uuid>, pub target_user_id: Option<Uuid>, pub reason: String }

#[derive(ToSchema)]
pub struct FormationRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    /// RFC 3339 timestamp
    pub starts_at: String,
    pub duration_minutes: i32,
    pub capacity: i32,
}

#[derive(ToSchema)]
pub struct ContentRequest { pub title: String, pub body: String, pub position: Option<i32> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::metrics,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::list,
        crate::routes::users::ranking,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::users::set_role,
        crate::routes::users::block,
        crate::routes::users::unblock,
        crate::routes::categories::tree,
        crate::routes::categories::get,
        crate::routes::categories::create,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::services::list,
        crate::routes::services::mine,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::services::activate,
        crate::routes::services::deactivate,
        crate::routes::services::block,
        crate::routes::services::unblock,
        crate::routes::services::comments,
        crate::routes::services::commentable,
        crate::routes::requisitions::made,
        crate::routes::requisitions::received,
        crate::routes::requisitions::create,
        crate::routes::requisitions::get,
        crate::routes::requisitions::transition,
        crate::routes::comments::create,
        crate::routes::comments::get,
        crate::routes::comments::update,
        crate::routes::comments::remove,
        crate::routes::gamification::list,
        crate::routes::gamification::get,
        crate::routes::gamification::create,
        crate::routes::gamification::update,
        crate::routes::gamification::delete,
        crate::routes::gamification::activate,
        crate::routes::gamification::deactivate,
        crate::routes::complaints::mine,
        crate::routes::complaints::all,
        crate::routes::complaints::file,
        crate::routes::complaints::get,
        crate::routes::complaints::delete,
        crate::routes::complaints::handle,
        crate::routes::formations::list,
        crate::routes::formations::get,
        crate::routes::formations::create,
        crate::routes::formations::update,
        crate::routes::formations::delete,
        crate::routes::formations::enroll,
        crate::routes::formations::withdraw,
        crate::routes::formations::enrollments,
        crate::routes::notifications::list,
        crate::routes::notifications::unread_count,
        crate::routes::notifications::read_all,
        crate::routes::notifications::get,
        crate::routes::notifications::mark_read,
        crate::routes::notifications::delete,
        crate::routes::content::page,
        crate::routes::content::create,
        crate::routes::content::get,
        crate::routes::content::update,
        crate::routes::content::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CategoryRequest,
            ServiceRequest,
            RequisitionRequest,
            CommentRequest,
            CommentEditRequest,
            GamificationRequest,
            ComplaintRequest,
            FormationRequest,
            ContentRequest,
            crate::routes::users::RenameInput,
            crate::routes::users::RoleInput,
            crate::routes::complaints::ResolutionInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "categories"),
        (name = "services"),
        (name = "requisitions"),
        (name = "comments"),
        (name = "gamification"),
        (name = "complaints"),
        (name = "formations"),
        (name = "notifications"),
        (name = "content")
    )
)]
pub struct ApiDoc;
