pub mod access;
pub mod auth;
pub mod culture_cycle;
pub mod farm;
pub mod feed;
pub mod fish;
pub mod pond;
pub mod pond_geometry;
pub mod record_ref;
pub mod user;

pub use record_ref::{Record, RecordRef};
