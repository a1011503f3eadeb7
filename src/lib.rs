//! Fungible Token Ledger with Transfer Tax
//!
//! This crate implements a fixed-supply fungible token ledger with an
//! address-conditional transfer tax, providing ERC20-like functionality
//! as a plain Rust library.
//!
//! # Features
//!
//! - Balance and allowance bookkeeping with checked arithmetic
//! - Transfer tax assessed only against a configured pool address
//! - Tax exemption and tax-sink exclusion rules
//! - ERC20-compatible approval system (approve, increase, decrease)
//! - Pluggable access gate for the two configuration setters
//!
//! # Execution model
//!
//! Every operation runs to completion on `&mut TaxedToken` and either
//! commits all of its mutations or none of them. Embedders serving
//! concurrent callers must wrap the token in a single lock (for example
//! `Mutex<TaxedToken>`) covering whole calls, otherwise the supply
//! conservation invariant is not guaranteed.

mod access;
mod address;
mod constants;
mod error;
mod ledger;
mod tax;
mod token;
mod types;

pub use access::*;
pub use address::*;
pub use constants::*;
pub use error::*;
pub use ledger::*;
pub use tax::*;
pub use token::*;
pub use types::*;

pub use primitive_types::U256;
