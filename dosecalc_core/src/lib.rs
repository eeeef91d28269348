#![forbid(unsafe_code)]

//! Core calculation library and history store for the Dosecalc nursing tools.
//!
//! This crate provides:
//! - Nine stateless clinical calculators (drip rate, dilution, fluid balance,
//!   BMI/BSA, insulin, heparin, oxygen cylinder, due date, Glasgow)
//! - Built-in reference tables (medication presets, syringes, protocols, cylinders)
//! - A capacity-bounded calculation history persisted to local storage
//! - Configuration and logging setup shared by the front ends

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod rounding;
pub mod fields;
pub mod clock;
pub mod storage;
pub mod history;
pub mod calculators;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{calculator_info, calculators, calculators_by_category};
pub use config::Config;
pub use clock::{Clock, FixedClock, SystemClock};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use history::{HistoryStore, MAX_ENTRIES, STORAGE_KEY};
