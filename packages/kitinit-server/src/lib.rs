//! Local HTTP server for the install wizard.

pub mod assets;
pub mod dispatch;
pub mod response;
pub mod server;
pub mod state;

// Re-export common types
pub use assets::{load_stylesheet, Stylesheet};
pub use dispatch::dispatch;
pub use server::WizardServer;
pub use state::{prepare, AppState, StartupError, StartupOptions};
