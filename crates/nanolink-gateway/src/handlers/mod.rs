mod home;
mod link;

pub use home::home_handler;
pub use link::{expand_handler, redirect_handler, shorten_handler};
