//! Admission control: check headroom and reserve credit as one step per
//! `(consumer, tenor)` key.

pub mod controller;
pub mod locks;

#[cfg(test)]
mod tests;

pub use controller::{AdmissionController, AdmissionRequest};
pub use locks::KeyedLocks;
