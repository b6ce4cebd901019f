use std::sync::Arc;

use common::pagination::{PaginatedList, Pagination};
use configs::SmtpSettings;
use models::{notification, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::access::Actor;
use crate::errors::ServiceError;
use crate::mailer::{compose, EmailMessage, Mailer};
use crate::metrics::{EMAIL_FAILURES_TOTAL, NOTIFICATIONS_TOTAL};

/// Sends in-app notifications and the matching status email.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    smtp: SmtpSettings,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, smtp: SmtpSettings) -> Self { Self { mailer, smtp } }

    /// Store a notification for `user_id` and email them.
    ///
    /// A mail failure is logged and counted; the notification row stands.
    pub async fn notify<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        title: &str,
        message: &str,
        link: Option<String>,
    ) -> Result<notification::Model, ServiceError> {
        let (row, email) = self.record(db, user_id, title, message, link).await?;
        self.deliver(email).await;
        Ok(row)
    }

    /// Insert the notification row and compose its email without sending it.
    /// Callers pass the email to [`Notifier::deliver`] once their transaction commits.
    #[instrument(skip(self, db, message), fields(user_id = %user_id))]
    pub async fn record<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        title: &str,
        message: &str,
        link: Option<String>,
    ) -> Result<(notification::Model, EmailMessage), ServiceError> {
        let recipient = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        let row = notification::create(db, user_id, title, message, link).await?;
        NOTIFICATIONS_TOTAL.inc();
        Ok((row, compose(&self.smtp, &recipient.email, title, message)))
    }

    pub async fn deliver(&self, email: EmailMessage) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            EMAIL_FAILURES_TOTAL.inc();
            warn!(error = %e, %to, "notification_email_failed");
        }
    }
}

async fn find_owned(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<notification::Model, ServiceError> {
    notification::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|n| n.user_id == actor.user_id)
        .ok_or_else(|| ServiceError::not_found("notification"))
}

/// Caller's notifications, newest first.
pub async fn list_for_user(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<PaginatedList<notification::Model>, ServiceError> {
    let rows = notification::Entity::find()
        .filter(notification::Column::UserId.eq(actor.user_id))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(PaginatedList::create(rows, opts))
}

pub async fn unread_count(db: &DatabaseConnection, actor: &Actor) -> Result<u64, ServiceError> {
    let n = notification::Entity::find()
        .filter(notification::Column::UserId.eq(actor.user_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?;
    Ok(n)
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<notification::Model, ServiceError> {
    find_owned(db, actor, id).await
}

pub async fn mark_read(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<notification::Model, ServiceError> {
    let found = find_owned(db, actor, id).await?;
    if found.is_read {
        return Ok(found);
    }
    let mut am: notification::ActiveModel = found.into();
    am.is_read = Set(true);
    Ok(am.update(db).await?)
}

/// Mark every unread notification of the caller as read; returns how many changed.
pub async fn mark_all_read(db: &DatabaseConnection, actor: &Actor) -> Result<u64, ServiceError> {
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, sea_orm::sea_query::Expr::value(true))
        .filter(notification::Column::UserId.eq(actor.user_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = find_owned(db, actor, id).await?;
    notification::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::mock::RecordingMailer;
    use crate::test_support::{fixtures, mock_db, smtp_settings};
    use models::user::Role;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn notify_stores_row_and_sends_mail() {
        let recipient = fixtures::user(Role::Cliente);
        let row = fixtures::notification(recipient.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipient.clone()]])
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(mailer.clone(), smtp_settings());

        let stored = notifier.notify(&db, recipient.id, &row.title, &row.message, None).await.unwrap();
        assert_eq!(stored.id, row.id);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, recipient.email);
        assert!(sent[0].html_body.contains("cid:logo"));
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_notify() {
        let recipient = fixtures::user(Role::Cliente);
        let row = fixtures::notification(recipient.id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipient.clone()]])
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let notifier = Notifier::new(Arc::new(RecordingMailer::failing()), smtp_settings());
        assert!(notifier.notify(&db, recipient.id, "t", "m", None).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_recipient_is_not_found() {
        let db = mock_db().append_query_results([Vec::<user::Model>::new()]).into_connection();
        let notifier = Notifier::new(Arc::new(RecordingMailer::default()), smtp_settings());
        let err = notifier.notify(&db, Uuid::new_v4(), "t", "m", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn other_users_notifications_are_hidden() {
        let owner = fixtures::user(Role::Cliente);
        let row = fixtures::notification(owner.id);
        let db = mock_db().append_query_results([vec![row.clone()]]).into_connection();
        let stranger = Actor::new(Uuid::new_v4(), Role::Administrador);
        let err = mark_read(&db, &stranger, row.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_all_read_reports_rows() {
        let db = mock_db()
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 4 }])
            .into_connection();
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        assert_eq!(mark_all_read(&db, &me).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn list_is_paginated() {
        let me = fixtures::user(Role::Cliente);
        let rows: Vec<_> = (0..5).map(|_| fixtures::notification(me.id)).collect();
        let db = mock_db().append_query_results([rows]).into_connection();
        let page = list_for_user(&db, &Actor::new(me.id, me.role), Pagination { page: 2, per_page: 2 }).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page && page.has_next_page);
    }
}
