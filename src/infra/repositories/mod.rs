pub mod sqlite_event_repo;
pub mod sqlite_guest_repo;
pub mod sqlite_package_repo;
pub mod sqlite_request_repo;
pub mod sqlite_ticket_repo;
