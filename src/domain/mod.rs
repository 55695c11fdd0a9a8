//! Domain values exchanged between the services and the content API.

pub mod event;
pub mod image;
pub mod types;
