#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod detector;
pub mod events;
pub mod filler;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod types;
pub mod utils;
