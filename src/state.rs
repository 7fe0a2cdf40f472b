use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    EventRepository, GuestRepository, PackageRepository, RequestRepository,
    TicketRepository, VoucherStorage,
};
use crate::domain::services::availability::AvailabilityChecker;
use crate::domain::services::guest_directory::GuestDirectory;
use crate::domain::services::ticketing::TicketingEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub guest_repo: Arc<dyn GuestRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub package_repo: Arc<dyn PackageRepository>,
    pub voucher_storage: Arc<dyn VoucherStorage>,
    pub guest_directory: Arc<GuestDirectory>,
    pub availability: Arc<AvailabilityChecker>,
    pub ticketing: Arc<TicketingEngine>,
}
