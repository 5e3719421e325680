//! Stateful table instances
//!
//! [`TableController`] ties the pure stages of `tv-core` to the persisted view
//! state of `tv-data`. [`SearchDebouncer`] and [`ServerPager`] cover the two
//! asynchronous edges: raw search input and server-mode page fetches.

mod debounce;
mod server;
pub mod table;

pub use debounce::SearchDebouncer;
pub use server::{FetchOutcome, FetchStatus, ServerPager};
pub use table::{compose, ComposedView, FilterPatch, PipelineInput, RenderRow, TableController};
