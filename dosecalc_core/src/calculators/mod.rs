//! The nine clinical calculators.
//!
//! Each module exposes a `calculate` function taking the calculator's typed
//! input and returning `Some(output)` or `None` while the input is not yet
//! computable. Outputs implement [`Recordable`](crate::Recordable) so a front
//! end can save them with [`HistoryStore::record`](crate::HistoryStore::record).

pub mod drip;
pub mod dilution;
pub mod fluid_balance;
pub mod bmi;
pub mod insulin;
pub mod heparin;
pub mod oxygen;
pub mod gestation;
pub mod glasgow;
