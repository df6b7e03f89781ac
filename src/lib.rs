// src/lib.rs
//! Client for the profile analysis service.
//!
//! A page (input field, button, output area) is bound once, then every
//! click reads the profile id, sends one request and renders the reply.

pub mod config;
pub mod console;
pub mod identifier;
pub mod page;
pub mod render;
pub mod transport;
pub mod trigger;

pub use config::ClientConfig;
pub use identifier::ProfileId;
pub use page::{Alert, Button, Document, Page, TextInput, TextOutput};
pub use transport::{HttpTransport, Method, RawResponse, Transport};
pub use trigger::{AnalysisTrigger, Outcome, ProfileAction};

/// Log through `tracing` at the given level.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}
