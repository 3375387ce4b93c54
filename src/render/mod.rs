// HTML rendering.
// Turns view models into complete pages with maud; every dynamic value is escaped.

pub mod format;
pub mod layout;
pub mod pages;

pub use layout::page;
