// Copyright 2026 Pricewatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! pricewatch library — product price tracking and change alerts.
//!
//! This library crate exposes the core modules for integration testing.

pub mod cli;
pub mod compare;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod scheduler;
pub mod store;
