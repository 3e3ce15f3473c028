//! Reactor work queue and emitter-owning I/O components.
//!
//! - [`reactor`] — [`Reactor`]: background tasks, home-thread completions.
//! - [`resolver`] — [`Resolver`]: host lookup reported through an `Emitter`.

pub mod error;
pub mod reactor;
pub mod resolver;

pub use error::{ReactorError, ResolveError};
pub use reactor::{Reactor, ReactorConfig};
pub use resolver::{Resolved, Resolver, ResolverEvent};
