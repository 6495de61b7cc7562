//! # ipbot-dispatch
//!
//! The dispatch pipeline (ordered middleware chain) and its terminal stage,
//! the command router.

mod pipeline;
mod router;

pub use pipeline::DispatchPipeline;
pub use router::CommandRouter;
