//! Script-driven derived columns over numeric tables.
//!
//! Load a table ([`data::loader`]), bind it to a [`ScriptEngine`], and run
//! short Rhai scripts that combine columns through the `math` function
//! library ([`signal`]). Each successful script becomes a named derived
//! column that later scripts can reference.

pub mod config;
pub mod data;
pub mod error;
pub mod preset;
pub mod script;
pub mod signal;
pub mod state;

pub use error::ScriptError;
pub use script::ScriptEngine;
