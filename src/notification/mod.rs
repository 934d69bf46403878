//! Delivery of operator-facing messages to the chat platform.
//!
//! The core hands plain [`OutageEvent`](crate::core::OutageEvent) and
//! [`MetricsSnapshot`](crate::core::MetricsSnapshot) values to a
//! [`Notifier`](crate::core::Notifier) implementation; this module provides
//! the Discord-backed one.

pub mod discord;
