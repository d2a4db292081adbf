pub mod contact;
pub mod content;
pub mod home;
pub mod system;
