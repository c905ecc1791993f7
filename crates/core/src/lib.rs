//! # ClinicBook Core
//!
//! Domain types shared by the storage and HTTP layers, the error taxonomy, and
//! the two pieces of real logic in the service:
//!
//! - [`availability`]: the layered resolver that turns templates, overrides,
//!   blocks and existing bookings into the bookable windows of one day
//! - [`admission`]: validation and normalisation of incoming booking requests

pub mod admission;
pub mod availability;
pub mod errors;
pub mod models;
