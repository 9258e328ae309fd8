pub mod check;
pub mod config;
pub mod init;
pub mod modules;
pub mod role_form;
