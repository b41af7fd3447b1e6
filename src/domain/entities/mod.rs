//! Core domain entities representing the registry's data model.
//!
//! # Entity Types
//!
//! - [`Building`] - An apartment building
//! - [`Resident`] - A person registered to an apartment in a building
//! - [`User`] / [`Session`] - Administrator accounts and login sessions
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewBuilding`, `NewResident`, `NewSession` - For creating new records
//! - `ResidentPatch` - For partial updates

pub mod building;
pub mod resident;
pub mod user;

pub use building::{Building, NewBuilding};
pub use resident::{NewResident, Resident, ResidentPatch};
pub use user::{NewSession, Session, User};
