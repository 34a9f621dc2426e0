//! Resource-level authorization
//!
//! Decides whether a verified requester may act on one resource instance,
//! either by role or by owning it directly or through a parent entity.

mod resolver;


pub use resolver::{OwnershipResolver, ResolverFuture};
