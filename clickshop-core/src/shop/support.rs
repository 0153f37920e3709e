use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::ticket::{SupportTicket, TicketRequest, TicketStatus};
use crate::shop::Shop;

impl Shop {
    /// File a support ticket into the caller's history.
    pub fn submit_ticket(&self, user_id: Uuid, request: TicketRequest) -> ShopResult<SupportTicket> {
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(ShopError::Validation("message must not be empty".into()));
        }

        let ticket = SupportTicket {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            reason: request.reason,
            message,
            status: TicketStatus::Pending,
        };

        let mut state = self.state();
        state.tickets.entry(user_id).or_default().push(ticket.clone());
        self.persist_tickets(&state, user_id)?;

        info!("Support ticket {} filed ({:?})", ticket.id, ticket.reason);
        Ok(ticket)
    }

    /// The caller's ticket history, oldest first.
    pub fn tickets(&self, user_id: Uuid) -> Vec<SupportTicket> {
        self.state()
            .tickets
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}
