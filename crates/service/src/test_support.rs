#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Live database for integration-style tests; `None` when `DATABASE_URL` is unset.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else { return Ok(None) };
    let cfg = DatabaseConfig { url, max_connections: 20, min_connections: 1, ..DatabaseConfig::default() };
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    Ok(Some(connect_with_config(&cfg).await?))
}

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn smtp_settings() -> configs::SmtpSettings {
    configs::SmtpSettings { host: "localhost".into(), from_address: "no-reply@prestar.pt".into(), ..Default::default() }
}

/// Ready-made rows for mocked query results.
pub mod fixtures {
    use chrono::{Duration, Utc};
    use models::{
        comment_evaluation, complaint, content_section, enrollment, formation, gamification, notification, service,
        service_category, service_requisition, user,
    };
    use models::service_requisition::RequisitionStatus;
    use models::user::Role;
    use sea_orm::prelude::DateTimeWithTimeZone;
    use uuid::Uuid;

    fn now() -> DateTimeWithTimeZone { Utc::now().into() }

    pub fn user(role: Role) -> user::Model {
        let id = Uuid::new_v4();
        user::Model {
            id,
            email: format!("{}@example.com", id.simple()),
            name: "Utilizador".into(),
            role,
            total_points: 0,
            is_blocked: false,
            failed_login_attempts: 0,
            lockout_end: None,
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        }
    }

    pub fn category(parent_id: Option<Uuid>) -> service_category::Model {
        service_category::Model {
            id: Uuid::new_v4(),
            name: "Reparações".into(),
            description: None,
            parent_id,
            last_updated_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn service(provider_id: Uuid) -> service::Model {
        service::Model {
            id: Uuid::new_v4(),
            provider_id,
            category_id: Uuid::new_v4(),
            name: "Canalização".into(),
            description: "Reparação de canos".into(),
            price: Some(25.0),
            is_active: true,
            is_blocked: false,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn requisition(service_id: Uuid, requisitioner_id: Uuid, status: RequisitionStatus) -> service_requisition::Model {
        service_requisition::Model {
            id: Uuid::new_v4(),
            service_id,
            requisitioner_id,
            status,
            additional_info: None,
            created_at: now(),
            updated_at: now(),
            conclusion_date: None,
        }
    }

    pub fn comment(req: &service_requisition::Model, comment: Option<&str>, evaluation: Option<i32>) -> comment_evaluation::Model {
        comment_evaluation::Model {
            id: Uuid::new_v4(),
            service_id: req.service_id,
            author_id: req.requisitioner_id,
            requisition_id: req.id,
            comment: comment.map(str::to_string),
            evaluation,
            is_removed: false,
            removed_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn gamification(active: bool, comment: i32, evaluation: i32, service: i32) -> gamification::Model {
        gamification::Model {
            id: Uuid::new_v4(),
            name: "Temporada".into(),
            points_per_comment: comment,
            points_per_evaluation: evaluation,
            points_per_service: service,
            is_active: active,
            last_updated_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn complaint(complainant_id: Uuid, service_id: Option<Uuid>) -> complaint::Model {
        complaint::Model {
            id: Uuid::new_v4(),
            complainant_id,
            service_id,
            target_user_id: None,
            reason: "Não compareceu".into(),
            state: complaint::ComplaintState::Pending,
            resolution: None,
            handled_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn formation(capacity: i32, starts_in_days: i64) -> formation::Model {
        formation::Model {
            id: Uuid::new_v4(),
            title: "Primeiros socorros".into(),
            description: "Formação prática".into(),
            location: "Lisboa".into(),
            starts_at: (Utc::now() + Duration::days(starts_in_days)).into(),
            duration_minutes: 90,
            capacity,
            last_updated_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn enrollment(formation_id: Uuid, user_id: Uuid) -> enrollment::Model {
        enrollment::Model { id: Uuid::new_v4(), formation_id, user_id, created_at: now() }
    }

    pub fn notification(user_id: Uuid) -> notification::Model {
        notification::Model {
            id: Uuid::new_v4(),
            user_id,
            title: "Aviso".into(),
            message: "Mensagem".into(),
            link: None,
            is_read: false,
            created_at: now(),
        }
    }

    pub fn content(kind: content_section::ContentKind, position: i32) -> content_section::Model {
        content_section::Model {
            id: Uuid::new_v4(),
            kind,
            title: format!("Secção {position}"),
            body: "Texto".into(),
            position,
            last_updated_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }
}
