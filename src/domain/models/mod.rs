pub mod event;
pub mod guest;
pub mod package;
pub mod request;
pub mod ticket;
