//! Callback — an identity-bearing, type-erased listener body.
//!
//! A body is bound for exactly one argument type `A`. The concrete closure is
//! stored behind `Any` and recovered with a checked downcast on every
//! invocation, so a caller that emits the wrong argument type gets
//! [`EmitterError::InvocationTypeMismatch`] instead of undefined behaviour.
//!
//! Cloning a `Callback` is a ref-count bump; clones share the body and the id.

use std::any::{type_name, Any};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{EmitError, EmitterError, ListenerResult};
use crate::id::{next_id, CallbackId};

/// Closure type for a listener taking `A`.
pub type BodyFn<A> = dyn Fn(A) -> ListenerResult + Send + Sync;

struct ErasedBody {
    arg_type: &'static str,
    /// Always a `Box<BodyFn<A>>` for the `A` named by `arg_type`.
    inner: Box<dyn Any + Send + Sync>,
}

/// A listener body plus its identity. Equality and hashing use the id only.
#[derive(Clone, Default)]
pub struct Callback {
    id: CallbackId,
    body: Option<Arc<ErasedBody>>,
}

impl Callback {
    /// Bind `body` to a freshly allocated id.
    pub fn bind<A, F>(body: F) -> Self
    where
        A: 'static,
        F: Fn(A) -> ListenerResult + Send + Sync + 'static,
    {
        let typed: Box<BodyFn<A>> = Box::new(body);
        Self {
            id: next_id(),
            body: Some(Arc::new(ErasedBody {
                arg_type: type_name::<A>(),
                inner: Box::new(typed),
            })),
        }
    }

    /// An unbound callback. Same as `Callback::default()`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    /// Name of the argument type the body was bound for.
    pub fn arg_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|b| b.arg_type)
    }

    /// Whether invoking with an `A` would reach the body.
    pub fn accepts<A: 'static>(&self) -> bool {
        self.body
            .as_ref()
            .is_some_and(|b| b.inner.is::<Box<BodyFn<A>>>())
    }

    /// Run the body with `args`.
    ///
    /// Fails with `EmptyCallbackInvoked` on an empty callback and with
    /// `InvocationTypeMismatch` when `A` is not the bound argument type; in
    /// both cases the body is not run. A body's own error comes back as
    /// [`EmitError::Listener`].
    pub fn invoke<A: 'static>(&self, args: A) -> Result<(), EmitError> {
        let body = self
            .body
            .as_ref()
            .ok_or(EmitterError::EmptyCallbackInvoked)?;
        let f = body.inner.downcast_ref::<Box<BodyFn<A>>>().ok_or(
            EmitterError::InvocationTypeMismatch {
                id: self.id,
                expected: body.arg_type,
                received: type_name::<A>(),
            },
        )?;
        f(args).map_err(EmitError::Listener)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Callback {}

impl Hash for Callback {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("arg_type", &self.arg_type())
            .finish()
    }
}
