pub mod backend;
pub mod config;
pub mod constants;
pub mod display;
pub mod dom;
pub mod extract;
pub mod inject;
pub mod mail;
pub mod nav;
pub mod relay;
pub mod sidebar;
