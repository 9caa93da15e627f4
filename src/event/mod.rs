//! Event labels that transactions are grouped under.

mod create_endpoint;
mod db;
mod domain;

pub use create_endpoint::create_event_endpoint;
pub use db::{create_event, create_event_table, event_exists, get_all_events};
pub use domain::{EventLabel, EventName};
