pub mod extract;
pub mod index;
pub mod insight;
pub mod webhook;
