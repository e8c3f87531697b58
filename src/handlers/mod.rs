//! HTTP handlers for items, seeding, health and readiness.

pub mod health;
pub mod items;
