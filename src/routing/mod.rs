//! Routing module
//!
//! Provides the route-table compiler and path matcher:
//! - Path normalization from filesystem paths to canonical route keys
//! - Route table construction from the project's directory trees
//! - Radix-trie path matching with parameter extraction

mod matcher;
mod normalize;
mod table;

pub use matcher::{RouteMatch, RouteMatcher};
pub use normalize::normalize;
pub use table::{RouteDescriptor, RouteTable};
