//! Provisioning handlers

pub mod account;
pub mod delegation;
pub mod email;

pub use account::{AccountLifecycleHandler, AccountProperties};
pub use delegation::{DelegationProperties, DelegationRecordHandler};
pub use email::{EmailProperties, EmailValidationHandler};
