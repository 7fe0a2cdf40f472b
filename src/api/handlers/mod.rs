pub mod bulk;
pub mod event;
pub mod health;
pub mod request;
pub mod review;
