//! Client hydration for quire documentation pages.
//!
//! Hydration augments already-rendered markup after it loads, without changing
//! the static HTML of the first paint. Two independent widgets are handled:
//!
//! - a star-count badge appended to the repository link in the navigation
//! - a custom play control whose visible state mirrors an embedded video
//!
//! The controller talks to the page through the [`Dom`] trait. [`MemoryDom`]
//! is an in-memory implementation with synchronous event dispatch; the
//! browser runtime shipped with a built site follows the same contract.

pub mod controller;
pub mod dom;
pub mod source;
pub mod star;
pub mod state;

pub use controller::{
    BadgeOutcome, HydrationController, HydrationReport, HydrationTargets, VideoOutcome,
};
pub use dom::{Dom, DomEvent, Listener, MemoryDom, NodeId, Selector};
pub use source::{CachedStars, Clock, FixedStars, StarSource, StarsFile, SystemClock};
pub use star::{format_stars, StarMetric};
pub use state::{PlayState, Trigger};
