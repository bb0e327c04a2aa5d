#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(async_fn_in_trait)]

pub mod action;
pub mod config;
pub mod error;
pub mod fleet;
pub mod resolve;
pub mod util;

pub use error::Error;
pub use error::Result;
