//! # Pricer Models (L2: Business Logic)
//!
//! Credit instruments and the schedules they pay on.
//!
//! This crate provides:
//! - Coupon schedule generation with business-day adjustment
//! - Single-name credit default swap definitions
//! - CDS leg valuation (risky PV01, protection leg, par spread, value)
//!
//! ## Design Principles
//!
//! - **Builder pattern** for ergonomic construction with market-standard defaults
//! - **Curve traits** from `pricer_core` so any discount or survival curve can price
//! - **Per-unit-notional legs** so calibration never depends on trade size

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod instruments;
pub mod schedules;
