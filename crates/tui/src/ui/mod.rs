//! Terminal rendering for the dashboard.

pub(crate) mod components;
pub(crate) mod layout;
pub(crate) mod main_component;
pub mod runtime;
pub mod theme;
pub(crate) mod utils;
