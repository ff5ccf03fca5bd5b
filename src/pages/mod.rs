pub mod detail;
pub mod home;
pub mod login;
