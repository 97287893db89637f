pub mod layout;
pub mod pages;

pub use layout::escape;
