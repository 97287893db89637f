//! Browser based installer for the GOV.UK Prototype Kit.

pub mod browser;
pub mod cli;

pub use kitinit_config as config;
pub use kitinit_release as release;
pub use kitinit_server as server;
pub use kitinit_utils as utils;
pub use kitinit_wizard as wizard;
