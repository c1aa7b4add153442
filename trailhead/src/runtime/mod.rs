//! Store-side execution: command payloads serialized to JSON, handed to Lua
//! scripts as `ARGV[1]`, and decoded back into typed errors. Every mutation
//! that touches more than one key runs as exactly one script, which is what
//! makes the like-toggle and the cascading delete atomic.

pub mod commands;
pub mod executor;
pub mod scripts;

pub use executor::run_script;
