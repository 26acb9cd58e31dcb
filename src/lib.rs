//! mobdex library: creature and drop lookup core shared by the native and web runtimes.

pub mod app_core;
pub mod assets;
pub mod error;
pub mod filename;
pub mod matcher;
pub mod model;
pub mod runtime;
pub mod search_index;
pub mod theme;
pub mod ui;
