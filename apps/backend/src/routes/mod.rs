pub mod card;
pub mod document;
pub mod index;
pub mod session;
pub mod settings;
pub mod study;
