//! State Management
//!
//! Global application state.

pub mod global;

pub use global::{provide_global_state, GlobalState, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
