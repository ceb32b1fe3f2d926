use super::Heuristics;
use crate::types::request::TicketContext;
use crate::types::scoring::{Dimension, Score};

/// Zero means no ticket is linked at all; any ticket starts at 5.0.
pub fn ticket_link_score(heuristics: &Heuristics, ticket: Option<&TicketContext>) -> Score {
    let Some(ticket) = ticket else {
        return 0.0;
    };

    let mut score: Score = 5.0;
    if is_present(ticket.ticket_id.as_deref()) {
        score += 2.0;
    }
    if ticket.ticket_status.as_deref() == Some(heuristics.in_progress_status()) {
        score += 1.0;
    }
    if is_present(ticket.ticket_type.as_deref()) {
        score += 1.0;
    }
    if is_present(ticket.priority.as_deref()) {
        score += 1.0;
    }
    Dimension::TicketLink.clamp(score)
}

fn is_present(field: Option<&str>) -> bool {
    field.is_some_and(|value| !value.trim().is_empty())
}
