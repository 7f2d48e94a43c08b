//! Single-attribute contract.

use sysmx_common::{Attribute, AttributeValue, ObjectName};

use crate::error::{BridgeError, Result};

/// A bridge exposing a provider through named attributes.
///
/// Implementors supply their identity, their attribute namespace and the
/// read path. Writes and operation invocation are rejected unless overridden.
///
/// # Example
///
/// ```ignore
/// struct MemBridge<P> {
///     provider: Arc<P>,
///     domain: String,
/// }
///
/// impl<P: Provider> AttributeBridge for MemBridge<P> {
///     fn object_name(&self) -> String {
///         ObjectNameBuilder::new(&self.domain).property("type", "Mem").to_string()
///     }
///
///     fn attribute_names(&self) -> &[&'static str] {
///         &["Total", "Used"]
///     }
///
///     fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
///         let key = match name {
///             "Total" => "memory/total",
///             "Used" => "memory/used",
///             _ => return Err(BridgeError::not_found(name)),
///         };
///         self.provider.fetch(key).map_err(|e| unexpected_error("Mem", e))
///     }
/// }
/// ```
pub trait AttributeBridge: Send + Sync {
    /// The raw object name string this bridge registers under.
    ///
    /// Must depend only on state fixed at construction.
    fn object_name(&self) -> String;

    /// Attribute names in this bridge's namespace, in declaration order.
    fn attribute_names(&self) -> &[&'static str];

    /// Read a single attribute.
    ///
    /// Fails with [`BridgeError::AttributeNotFound`] for names outside the
    /// namespace and [`BridgeError::ProviderFailure`] when the provider fails.
    fn get_attribute(&self, name: &str) -> Result<AttributeValue>;

    /// Parse [`object_name`](Self::object_name) into the bridge's identity.
    fn identity(&self) -> Result<ObjectName> {
        let raw = self.object_name();
        ObjectName::parse(&raw).map_err(|e| BridgeError::InvalidIdentity {
            identity: raw,
            reason: e.to_string(),
        })
    }

    /// Whether `name` is part of this bridge's namespace.
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names().contains(&name)
    }

    /// Write a single attribute. Read-only by default.
    fn set_attribute(&self, attribute: &Attribute) -> Result<()> {
        Err(BridgeError::not_found(&attribute.name))
    }

    /// Invoke a named operation. Bridges expose no operations by default.
    fn invoke(&self, operation: &str, _params: &[AttributeValue]) -> Result<AttributeValue> {
        Err(BridgeError::OperationNotSupported(operation.to_string()))
    }
}
