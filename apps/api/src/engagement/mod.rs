pub mod handlers;
pub mod upvotes;
pub mod views;
