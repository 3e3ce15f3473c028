//! Resolver — host name lookup that reports through an `Emitter`.
//!
//! Argument contract per key:
//!   - `Lookup`: [`Resolved`]
//!   - `Error`: [`ResolveError`]
//!   - `NewListener` / `RemoveListener`: `MetaEvent<ResolverEvent>`

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use evented::{Emitter, EmitterConfig, EmitterError, EventKey};

use crate::error::{ReactorError, ResolveError};
use crate::reactor::Reactor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverEvent {
    Lookup,
    Error,
    NewListener,
    RemoveListener,
}

impl EventKey for ResolverEvent {
    fn new_listener() -> Self {
        Self::NewListener
    }

    fn remove_listener() -> Self {
        Self::RemoveListener
    }
}

/// Payload of `ResolverEvent::Lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub host: String,
    pub addrs: Vec<SocketAddr>,
}

pub struct Resolver {
    events: Arc<Emitter<ResolverEvent>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            events: Arc::new(Emitter::with_config(config)),
        }
    }

    /// The resolver's emitter, for registering listeners.
    pub fn events(&self) -> &Emitter<ResolverEvent> {
        &self.events
    }

    /// Resolve `host` in the background. On completion `Lookup` or `Error`
    /// is emitted from the reactor's thread.
    pub fn lookup(
        &self,
        reactor: &Reactor,
        host: impl Into<String>,
        port: u16,
    ) -> Result<(), ReactorError> {
        let host = host.into();
        let events = Arc::clone(&self.events);
        tracing::debug!(reactor = reactor.name(), host = %host, port, "lookup submitted");
        reactor.submit(
            move || resolve(host, port),
            move |result| {
                let emitted = match result {
                    Ok(resolved) => events.emit(&ResolverEvent::Lookup, resolved),
                    Err(e) => events.emit(&ResolverEvent::Error, e),
                };
                emitted.map(|_| ())
            },
        )
    }

    pub fn reverse(&self, addr: IpAddr) -> evented::Result<String> {
        Err(EmitterError::NotImplemented(format!("reverse lookup of {addr}")))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(host: String, port: u16) -> Result<Resolved, ResolveError> {
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(ResolveError::InvalidHost(host));
    }
    let lookup = (host.as_str(), port).to_socket_addrs();
    let addrs: Vec<SocketAddr> = match lookup {
        Ok(iter) => iter.collect(),
        Err(e) => {
            return Err(ResolveError::Lookup {
                host,
                message: e.to_string(),
            })
        }
    };
    if addrs.is_empty() {
        return Err(ResolveError::NoAddresses(host));
    }
    Ok(Resolved { host, addrs })
}
