use crate::errors::ModelError;
use crate::{comment_evaluation, complaint, content_section, formation, gamification, service, user};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn is_validation<T: std::fmt::Debug>(r: Result<T, ModelError>) -> bool {
    matches!(r, Err(ModelError::Validation(_)))
}

#[test]
fn email_needs_local_part_and_dotted_domain() {
    assert!(user::validate_email("ana@example.com").is_ok());
    assert!(is_validation(user::validate_email("ana")));
    assert!(is_validation(user::validate_email("@example.com")));
    assert!(is_validation(user::validate_email("ana@localhost")));
    assert!(is_validation(user::validate_email("ana@example.")));
}

#[test]
fn only_client_and_provider_are_self_assignable() {
    assert!(user::Role::Cliente.is_self_assignable());
    assert!(user::Role::Prestador.is_self_assignable());
    assert!(!user::Role::Moderador.is_self_assignable());
    assert!(!user::Role::Administrador.is_self_assignable());
}

#[test]
fn blank_names_are_rejected() {
    assert!(is_validation(user::validate_name("   ")));
    assert!(is_validation(service::validate_name("")));
    assert!(is_validation(gamification::validate_name("\t")));
}

#[test]
fn price_must_be_finite_and_non_negative() {
    assert!(service::validate_price(None).is_ok());
    assert!(service::validate_price(Some(0.0)).is_ok());
    assert!(is_validation(service::validate_price(Some(-1.0))));
    assert!(is_validation(service::validate_price(Some(f64::NAN))));
}

#[test]
fn comment_needs_text_or_score_in_range() {
    assert!(comment_evaluation::validate_content(Some("great"), None).is_ok());
    assert!(comment_evaluation::validate_content(None, Some(5)).is_ok());
    assert!(is_validation(comment_evaluation::validate_content(None, None)));
    assert!(is_validation(comment_evaluation::validate_content(Some("  "), None)));
    assert!(is_validation(comment_evaluation::validate_content(None, Some(0))));
    assert!(is_validation(comment_evaluation::validate_content(Some("ok"), Some(6))));
}

#[test]
fn gamification_points_are_non_negative() {
    assert!(gamification::validate_points(0, 0, 0).is_ok());
    assert!(is_validation(gamification::validate_points(1, -1, 1)));
}

#[test]
fn complaint_needs_a_target() {
    assert!(is_validation(complaint::validate_target(None, None)));
    assert!(complaint::validate_target(Some(Uuid::new_v4()), None).is_ok());
    assert!(complaint::validate_target(None, Some(Uuid::new_v4())).is_ok());
}

#[test]
fn formation_capacity_and_duration_are_positive() {
    let mut input = formation::FormationInput {
        title: "Primeiros socorros".into(),
        description: "Curso base".into(),
        location: "Lisboa".into(),
        starts_at: (Utc::now() + Duration::days(3)).into(),
        duration_minutes: 90,
        capacity: 20,
    };
    assert!(formation::validate(&input).is_ok());
    input.capacity = 0;
    assert!(is_validation(formation::validate(&input)));
    input.capacity = 5;
    input.duration_minutes = -10;
    assert!(is_validation(formation::validate(&input)));
}

#[test]
fn content_position_is_non_negative() {
    assert!(content_section::validate("Sobre", "Texto", 0).is_ok());
    assert!(is_validation(content_section::validate("Sobre", "Texto", -1)));
    assert!(is_validation(content_section::validate("", "Texto", 1)));
}
