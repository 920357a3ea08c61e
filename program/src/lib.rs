//! Delegate vault program
//!
//! Holds delegated user funds in a program-derived vault and lets the
//! configured operator move them, rate limited by a global cooldown:
//!
//! - `init_config` / `modify_cooldown_duration` / `modify_operator` / `pause`
//! - two-step admin transfer (`propose_new_admin`, `accept_admin_transfer`)
//! - receiver allow-list (`grant_access`, `revoke_access`)
//! - fund movement (`transfer_in`, `transfer_out`, `token_receive`, `route`)
//!
//! The crate also ships the minimal token program those instructions rely on
//! and the in-process [`runtime::Runtime`] that executes signed transactions.

#![allow(clippy::too_many_arguments)]

pub mod constants;
pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod runtime;
pub mod state;
pub mod token;

pub use constants::*;
pub use error::DelegateError;
pub use processor::DelegateProgram;
