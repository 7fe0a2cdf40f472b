use std::sync::Arc;
use crate::domain::models::event::{Event, Sector, VenueTable};
use crate::domain::models::package::Package;
use crate::domain::models::request::ReservationRequest;
use crate::domain::models::ticket::{QrEntry, TicketBatch, TicketRender};
use crate::domain::ports::{GuestRepository, TicketRepository};
use crate::domain::services::guest_directory::GuestDirectory;
use crate::error::AppError;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;

const CODE_LENGTH: usize = 32;

/// Ticketing branch for a request, decided once from the sector policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketingMode {
    Named,
    Anonymous,
}

impl TicketingMode {
    pub fn for_sector(sector: &Sector) -> Self {
        if sector.requires_guest_list {
            TicketingMode::Named
        } else {
            TicketingMode::Anonymous
        }
    }
}

/// Display context carried onto every rendered ticket.
pub struct TicketContext {
    pub event_id: String,
    pub event_name: String,
    pub table_name: String,
    pub sector_name: String,
}

impl TicketContext {
    pub fn new(event: &Event, table: &VenueTable, sector: &Sector) -> Self {
        Self {
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            table_name: table.name.clone(),
            sector_name: sector.name.clone(),
        }
    }

    fn empty_batch(&self, request_id: &str) -> TicketBatch {
        TicketBatch {
            request_id: request_id.to_string(),
            event_name: self.event_name.clone(),
            table_name: self.table_name.clone(),
            sector_name: self.sector_name.clone(),
            tickets: Vec::new(),
        }
    }
}

/// The primary and optional complimentary batches issued at approval, plus
/// the guest ids whose attendance must be recorded.
pub struct IssuedTickets {
    pub primary: TicketBatch,
    pub complimentary: Option<TicketBatch>,
    pub attendee_ids: Vec<String>,
}

pub struct TicketingEngine {
    ticket_repo: Arc<dyn TicketRepository>,
    guest_repo: Arc<dyn GuestRepository>,
    directory: Arc<GuestDirectory>,
}

impl TicketingEngine {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        guest_repo: Arc<dyn GuestRepository>,
        directory: Arc<GuestDirectory>,
    ) -> Self {
        Self { ticket_repo, guest_repo, directory }
    }

    /// Fresh unguessable code, collision-checked against issued entries.
    async fn unique_code(&self) -> Result<String, AppError> {
        loop {
            let code: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(CODE_LENGTH)
                .map(char::from)
                .collect();

            if !self.ticket_repo.code_exists(&code).await? {
                return Ok(code);
            }
        }
    }

    /// One ticket per named guest, carrying their identity for the door list.
    pub async fn issue_named(
        &self,
        request_id: &str,
        guest_ids: &[String],
        ctx: &TicketContext,
    ) -> Result<TicketBatch, AppError> {
        let mut batch = ctx.empty_batch(request_id);
        let total = guest_ids.len() as i64;

        for (idx, guest_id) in guest_ids.iter().enumerate() {
            let guest = self
                .guest_repo
                .find_by_id(guest_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Guest {} not found", guest_id)))?;

            let code = self.unique_code().await?;
            let entry = QrEntry::new(guest.id.clone(), request_id.to_string(), code, false);
            let created = self.ticket_repo.create(&entry).await?;

            batch.tickets.push(TicketRender {
                code: created.code,
                holder: guest.name.clone(),
                document_number: Some(guest.document_number.clone()),
                number: idx as i64 + 1,
                total,
                is_complimentary: false,
            });
        }

        info!("Issued {} named tickets for request {}", total, request_id);
        Ok(batch)
    }

    /// `count` tickets bound to the per-event anonymous placeholder,
    /// displayed as "#i of N".
    pub async fn issue_anonymous(
        &self,
        request_id: &str,
        count: i64,
        ctx: &TicketContext,
    ) -> Result<TicketBatch, AppError> {
        self.issue_placeholder_batch(request_id, count, ctx, false).await
    }

    /// Anonymous mechanics, flagged so the renderer marks them
    /// "not for resale".
    pub async fn issue_complimentary(
        &self,
        request_id: &str,
        count: i64,
        ctx: &TicketContext,
    ) -> Result<TicketBatch, AppError> {
        self.issue_placeholder_batch(request_id, count, ctx, true).await
    }

    async fn issue_placeholder_batch(
        &self,
        request_id: &str,
        count: i64,
        ctx: &TicketContext,
        is_complimentary: bool,
    ) -> Result<TicketBatch, AppError> {
        let placeholder = self.directory.resolve_anonymous(&ctx.event_id).await?;
        let mut batch = ctx.empty_batch(request_id);

        for number in 1..=count {
            let code = self.unique_code().await?;
            let entry = QrEntry::new(
                placeholder.id.clone(),
                request_id.to_string(),
                code,
                is_complimentary,
            );
            let created = self.ticket_repo.create(&entry).await?;

            batch.tickets.push(TicketRender {
                code: created.code,
                holder: format!("Anonymous #{} of {}", number, count),
                document_number: None,
                number,
                total: count,
                is_complimentary,
            });
        }

        info!(
            "Issued {} {} tickets for request {}",
            count,
            if is_complimentary { "complimentary" } else { "anonymous" },
            request_id
        );
        Ok(batch)
    }

    /// Full issuance for a request transitioning to APPROVED: the primary
    /// batch per sector policy plus the complimentary batch when the event
    /// carries a free-ticket quota.
    pub async fn issue_for_approval(
        &self,
        request: &ReservationRequest,
        event: &Event,
        table: &VenueTable,
        sector: &Sector,
        package: &Package,
        invitation_guest_ids: &[String],
    ) -> Result<IssuedTickets, AppError> {
        let ctx = TicketContext::new(event, table, sector);

        let (primary, attendee_ids) = match TicketingMode::for_sector(sector) {
            TicketingMode::Named => {
                let mut guest_ids = vec![request.client_guest_id.clone()];
                guest_ids.extend(invitation_guest_ids.iter().cloned());
                let batch = self.issue_named(&request.id, &guest_ids, &ctx).await?;
                (batch, guest_ids)
            }
            TicketingMode::Anonymous => {
                let count = package.included_people + request.extra_guests;
                let batch = self.issue_anonymous(&request.id, count, &ctx).await?;
                (batch, vec![request.client_guest_id.clone()])
            }
        };

        let complimentary = if event.free_invitation_qr_count > 0 {
            Some(
                self.issue_complimentary(&request.id, event.free_invitation_qr_count, &ctx)
                    .await?,
            )
        } else {
            None
        };

        Ok(IssuedTickets { primary, complimentary, attendee_ids })
    }
}
