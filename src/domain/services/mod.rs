pub mod availability;
pub mod guest_directory;
pub mod ticketing;
