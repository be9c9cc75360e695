//! Procedural generation for the galaxy: star systems, markets, and the
//! jump-gate graph with its route planner.

pub mod commodity;
pub mod galaxy;
pub mod market;
pub mod route;
pub mod star_system;

pub use commodity::*;
pub use galaxy::*;
pub use market::*;
pub use route::*;
pub use star_system::*;
