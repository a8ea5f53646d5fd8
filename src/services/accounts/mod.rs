pub mod events;
pub mod service;

pub use events::{EventError, EventWriter};
pub use service::{AccountError, AccountService};
