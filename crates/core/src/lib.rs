//! Page controllers for the comadrelab marketing site.
//!
//! Every controller is a pure function (or a small state machine) from the
//! DOM state a front end observed plus the event it received, to the list of
//! [`DomCommand`](comadrelab_protocol::DomCommand)s that front end should
//! apply. Nothing in this crate touches a real document.

pub mod config;
pub mod controllers;
pub mod document;
pub mod page;

pub use config::{ConfigError, SiteConfig};
pub use page::{Environment, PagePresence, PageSetup};
