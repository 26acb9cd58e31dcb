//! Shared application core: state, input types, reducer, suggestion flow,
//! detail resolution, and indexing helpers.

pub mod debounce;
pub mod indexing;
pub mod input;
pub mod reducer;
pub mod resolver;
pub mod state;
pub mod suggest;
pub mod web_mouse;
