//! Core entity definitions for the circulation catalog.
//!
//! This crate defines the lending data types: materials (books, DVDs and
//! magazines) with their fine schedules and reservation capability, the
//! per-material audit log, users and loans.

mod audit;
mod error;
mod fine;
mod loan;
mod material;
mod reservation;
mod user;

pub use audit::*;
pub use error::*;
pub use fine::*;
pub use loan::*;
pub use material::*;
pub use reservation::*;
pub use user::*;
