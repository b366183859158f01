pub mod admin;
pub mod homepage;
pub mod layout;
pub mod survey;

// Re-export the page shell; the error path uses it directly.
pub use layout::page;
