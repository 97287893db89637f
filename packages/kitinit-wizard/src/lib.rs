//! The install wizard: URL state, step routing, form handling, directory
//! browsing, page rendering and the final scaffolding step.

pub mod codec;
pub mod directory;
pub mod error;
pub mod extensions;
pub mod finalize;
pub mod flow;
pub mod form;
pub mod step;
pub mod views;

// Re-export common types
pub use codec::WizardAnswers;
pub use directory::{list_directories, DirectoryListing};
pub use error::{Result, WizardError};
pub use finalize::{Finalized, Finalizer, ScaffoldFinalizer};
pub use flow::{submit, Transition};
pub use form::FormData;
pub use step::Step;
