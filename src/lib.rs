//! Tip Pool Engine for restaurant staff
//!
//! This crate splits a week of pooled tips and gratuities between employees.
//! Orders and shifts are bucketed by calendar day and meal period (lunch or
//! dinner), each bucket's net pool is shared in proportion to hours worked
//! times a role weight, and the bucket cuts are summed into weekly payouts.
//!
//! The engine works on already-loaded tables; reading spreadsheets and
//! rendering results belong to whatever sits in front of it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
