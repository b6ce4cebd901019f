//! Requisition lifecycle as a pure state machine.
//!
//! ```text
//! Pending --accept--> Accepted --conclude--> Concluded
//!    |                   |
//!    +--reject--> Rejected
//!    +--cancel--> Cancelled <--cancel--+
//! ```
//!
//! `Rejected`, `Concluded` and `Cancelled` are terminal.

use models::service_requisition::RequisitionStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisitionEvent {
    Accept,
    Reject,
    Conclude,
    Cancel,
}

/// Which side of a requisition may trigger an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Party {
    Provider,
    Requisitioner,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("requisition is in a terminal state")]
    Terminal,
    #[error("event not allowed from the current state")]
    NotAllowed,
    #[error("event not allowed for this party")]
    WrongParty,
}

pub fn is_terminal(status: RequisitionStatus) -> bool {
    matches!(status, RequisitionStatus::Rejected | RequisitionStatus::Concluded | RequisitionStatus::Cancelled)
}

pub fn required_party(event: RequisitionEvent) -> Party {
    match event {
        RequisitionEvent::Accept | RequisitionEvent::Reject | RequisitionEvent::Conclude => Party::Provider,
        RequisitionEvent::Cancel => Party::Requisitioner,
    }
}

/// Resolve the status reached by `event`, or why it is refused.
pub fn next_status(current: RequisitionStatus, event: RequisitionEvent, party: Party) -> Result<RequisitionStatus, TransitionError> {
    use RequisitionEvent::*;
    use RequisitionStatus::*;
    if is_terminal(current) {
        return Err(TransitionError::Terminal);
    }
    if required_party(event) != party {
        return Err(TransitionError::WrongParty);
    }
    match (current, event) {
        (Pending, Accept) => Ok(Accepted),
        (Pending, Reject) => Ok(Rejected),
        (Accepted, Conclude) => Ok(Concluded),
        (Pending | Accepted, Cancel) => Ok(Cancelled),
        _ => Err(TransitionError::NotAllowed),
    }
}

/// Title and body of the notification sent to the counter-party.
pub fn notification_text(status: RequisitionStatus, service_name: &str) -> (String, String) {
    match status {
        RequisitionStatus::Pending => (
            "Nova requisição".to_string(),
            format!("Recebeu uma nova requisição para o serviço \"{service_name}\"."),
        ),
        RequisitionStatus::Accepted => (
            "Requisição aceite".to_string(),
            format!("A sua requisição para o serviço \"{service_name}\" foi aceite."),
        ),
        RequisitionStatus::Rejected => (
            "Requisição rejeitada".to_string(),
            format!("A sua requisição para o serviço \"{service_name}\" foi rejeitada."),
        ),
        RequisitionStatus::Concluded => (
            "Requisição concluída".to_string(),
            format!("O serviço \"{service_name}\" foi concluído. Já pode deixar um comentário e avaliação."),
        ),
        RequisitionStatus::Cancelled => (
            "Requisição cancelada".to_string(),
            format!("A requisição para o serviço \"{service_name}\" foi cancelada pelo cliente."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequisitionEvent::*;
    use RequisitionStatus::*;

    const ALL_STATUSES: [RequisitionStatus; 5] = [Pending, Accepted, Rejected, Concluded, Cancelled];
    const ALL_EVENTS: [RequisitionEvent; 4] = [Accept, Reject, Conclude, Cancel];

    #[test]
    fn happy_path() {
        let s = next_status(Pending, Accept, Party::Provider).unwrap();
        assert_eq!(s, Accepted);
        assert_eq!(next_status(s, Conclude, Party::Provider).unwrap(), Concluded);
    }

    #[test]
    fn terminal_states_reject_everything() {
        for status in ALL_STATUSES.into_iter().filter(|s| is_terminal(*s)) {
            for event in ALL_EVENTS {
                for party in [Party::Provider, Party::Requisitioner] {
                    assert_eq!(next_status(status, event, party), Err(TransitionError::Terminal));
                }
            }
        }
    }

    #[test]
    fn conclude_only_from_accepted() {
        assert_eq!(next_status(Pending, Conclude, Party::Provider), Err(TransitionError::NotAllowed));
        assert_eq!(next_status(Accepted, Conclude, Party::Provider), Ok(Concluded));
    }

    #[test]
    fn accept_and_reject_only_from_pending() {
        assert_eq!(next_status(Accepted, Accept, Party::Provider), Err(TransitionError::NotAllowed));
        assert_eq!(next_status(Accepted, Reject, Party::Provider), Err(TransitionError::NotAllowed));
        assert_eq!(next_status(Pending, Reject, Party::Provider), Ok(Rejected));
    }

    #[test]
    fn cancel_belongs_to_requisitioner() {
        assert_eq!(next_status(Pending, Cancel, Party::Requisitioner), Ok(Cancelled));
        assert_eq!(next_status(Accepted, Cancel, Party::Requisitioner), Ok(Cancelled));
        assert_eq!(next_status(Pending, Cancel, Party::Provider), Err(TransitionError::WrongParty));
        assert_eq!(next_status(Pending, Accept, Party::Requisitioner), Err(TransitionError::WrongParty));
    }

    #[test]
    fn every_reachable_status_has_text() {
        for status in ALL_STATUSES {
            let (title, body) = notification_text(status, "Canalização");
            assert!(!title.is_empty());
            assert!(body.contains("Canalização"));
        }
    }
}
