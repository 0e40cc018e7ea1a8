//! Financial instrument definitions.
//!
//! Instruments are organised by asset class:
//! - [`credit`]: credit default swaps and their pricer

pub mod credit;
