//! Data provider interface.

use std::sync::Arc;

use sysmx_common::AttributeValue;

/// A source of live metric values.
///
/// Bridges hold a provider for their whole lifetime and only read from it.
/// Keys are provider-defined paths such as `memory/used` or `cpu/0/usage`.
pub trait Provider: Send + Sync {
    /// The provider's native error type. Bridges wrap it with
    /// [`unexpected_error`](crate::unexpected_error) and never re-expose it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current value for `key`.
    fn fetch(&self, key: &str) -> Result<AttributeValue, Self::Error>;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    type Error = P::Error;

    fn fetch(&self, key: &str) -> Result<AttributeValue, Self::Error> {
        (**self).fetch(key)
    }
}
