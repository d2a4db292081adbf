pub mod contact;
pub mod content;
