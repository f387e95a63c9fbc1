pub mod app;
pub mod audio;
pub mod bindings;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod flavor;
pub mod harness;
pub mod hub;
pub mod input;
pub mod math;
pub mod session;
pub mod time;

pub use app::{run, App, Phase};
pub use error::{Invoke, ScriptError};
