// Allow some clippy lints shared with the program crates
#![allow(clippy::module_inception)]
#![allow(clippy::result_unit_err)]

pub mod crypto;
pub mod serializer;
pub mod time;
pub mod transaction;
