#![forbid(unsafe_code)]

//! Organizational greenhouse-gas accounting for the carbon audit toolkit.
//!
//! An [`ActivityRecord`] holds one reporting period's raw quantities (fuel,
//! electricity, distance driven, landfill waste, headcount);
//! [`compute_emissions`] turns it into an [`EmissionsResult`] with kg per
//! category and tonnes per scope. Everything else here is plumbing around
//! that pure function: input coercion, edit sessions, saved documents and
//! tabular export.

pub mod calculator;
pub mod config;
pub mod error;
pub mod export;
pub mod factors;
pub mod quantity;
pub mod record;
pub mod session;
pub mod store;

pub use calculator::{compute_emissions, EmissionsResult};
pub use config::Config;
pub use error::AuditError;
pub use factors::{
    EmissionFactor, FuelType, GridRegion, LANDFILL_KG_PER_KG, TRANSPORT_KG_PER_KM,
};
pub use record::{ActivityField, ActivityRecord};
pub use session::AuditSession;
pub use store::{AuditDocument, AuditStore, InMemoryAuditStore, JsonFileAuditStore};
