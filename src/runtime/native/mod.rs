//! Native runtime support: filesystem and HTTP data access, file logging.

pub mod data;
pub mod logging;
