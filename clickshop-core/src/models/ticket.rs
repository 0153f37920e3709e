use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketReason {
    Question,
    Complaint,
    Suggestion,
    TechnicalSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Pending,
    InProgress,
    Answered,
}

/// One support request in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Unique identifier for the ticket
    pub id: Uuid,

    /// Timestamp when the ticket was submitted
    pub created_at: DateTime<Utc>,

    /// Why the user reached out
    pub reason: TicketReason,

    /// The message body
    pub message: String,

    /// Handling status; new tickets start Pending
    pub status: TicketStatus,
}

/// Ticket submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub reason: TicketReason,
    pub message: String,
}
