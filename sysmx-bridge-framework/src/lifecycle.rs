//! Registration lifecycle.
//!
//! A bridge moves through
//! `Unregistered → Registering → Registered → Deregistering → Unregistered`
//! as a management server attaches and later detaches it. The server binding
//! is held by [`Registration`] and is set exactly while the bridge is
//! `Registered` or `Deregistering`.
//!
//! Lifecycle steps take `&mut self`: the hosting server serializes them for a
//! given bridge. Attribute access needs only `&self` and is legal in every
//! state.

use std::fmt;
use std::sync::Arc;

use sysmx_common::{Attribute, AttributeValue, ObjectName};

use crate::attribute::AttributeBridge;
use crate::error::{BridgeError, Result};

/// Registration state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
    Deregistering,
}

impl RegistrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationState::Unregistered => "unregistered",
            RegistrationState::Registering => "registering",
            RegistrationState::Registered => "registered",
            RegistrationState::Deregistering => "deregistering",
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional hooks a bridge can implement to react to registration.
///
/// Every hook does nothing by default, so `impl RegistrationHooks for MyBridge {}`
/// is enough for bridges that don't care.
pub trait RegistrationHooks {
    /// Called once the server has finished (or abandoned) the registration.
    fn post_register(&self, _success: bool) {}

    /// Called before the server binding is released. Use it to free
    /// provider-held resources. Returning an error keeps the bridge registered.
    fn pre_deregister(&self) -> Result<()> {
        Ok(())
    }
}

/// Binding state machine for one bridge.
#[derive(Debug)]
pub struct Registration<S> {
    state: RegistrationState,
    server: Option<S>,
}

impl<S> Default for Registration<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Registration<S> {
    /// A fresh, unbound registration.
    pub fn new() -> Self {
        Self {
            state: RegistrationState::Unregistered,
            server: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// The server the bridge is bound to, if any.
    pub fn server(&self) -> Option<&S> {
        self.server.as_ref()
    }

    /// Whether the bridge is currently registered.
    pub fn is_registered(&self) -> bool {
        self.server.is_some()
    }

    /// Bind to `server` and return the bridge's identity.
    ///
    /// Only valid from `Unregistered`. If the identity cannot be derived the
    /// binding is not recorded and the state stays `Unregistered`.
    pub fn attach<B>(&mut self, bridge: &B, server: S) -> Result<ObjectName>
    where
        B: AttributeBridge + ?Sized,
    {
        self.expect_state("attach", RegistrationState::Unregistered)?;

        self.state = RegistrationState::Registering;
        let identity = match bridge.identity() {
            Ok(identity) => identity,
            Err(e) => {
                self.state = RegistrationState::Unregistered;
                return Err(e);
            }
        };

        self.server = Some(server);
        self.state = RegistrationState::Registered;
        Ok(identity)
    }

    /// Notify the bridge that the server finished registration.
    pub fn post_attach<H>(&self, hooks: &H, success: bool)
    where
        H: RegistrationHooks + ?Sized,
    {
        hooks.post_register(success);
    }

    /// Begin deregistration by running the bridge's pre-deregister hook.
    ///
    /// Only valid from `Registered`. If the hook fails the bridge stays
    /// `Registered` and the error is returned.
    pub fn detach<H>(&mut self, hooks: &H) -> Result<()>
    where
        H: RegistrationHooks + ?Sized,
    {
        self.expect_state("detach", RegistrationState::Registered)?;

        self.state = RegistrationState::Deregistering;
        if let Err(e) = hooks.pre_deregister() {
            self.state = RegistrationState::Registered;
            return Err(e);
        }
        Ok(())
    }

    /// Release the server binding. Idempotent.
    pub fn post_detach(&mut self) {
        self.server = None;
        self.state = RegistrationState::Unregistered;
    }

    fn expect_state(&self, operation: &'static str, expected: RegistrationState) -> Result<()> {
        if self.state != expected {
            return Err(BridgeError::IllegalState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }
}

/// A bridge that can be attached to a management server.
pub trait ManageableBridge: AttributeBridge + RegistrationHooks {}

impl<T: AttributeBridge + RegistrationHooks + ?Sized> ManageableBridge for T {}

/// Handle identifying the management server a bridge is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerHandle {
    agent_id: Arc<str>,
}

impl ServerHandle {
    pub fn new(agent_id: impl Into<Arc<str>>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }

    /// Identifier of the server instance.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }
}

impl fmt::Display for ServerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.agent_id)
    }
}

/// A bridge together with its registration state.
///
/// Attribute access is delegated to the wrapped bridge; the lifecycle steps
/// drive the wrapped [`Registration`] and call the bridge's hooks.
pub struct ManagedBridge<S = ServerHandle> {
    bridge: Box<dyn ManageableBridge>,
    registration: Registration<S>,
}

impl<S> ManagedBridge<S> {
    /// Wrap a bridge in the `Unregistered` state.
    pub fn new(bridge: impl ManageableBridge + 'static) -> Self {
        Self::from_boxed(Box::new(bridge))
    }

    /// Wrap an already boxed bridge.
    pub fn from_boxed(bridge: Box<dyn ManageableBridge>) -> Self {
        Self {
            bridge,
            registration: Registration::new(),
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.registration.state()
    }

    pub fn server(&self) -> Option<&S> {
        self.registration.server()
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_registered()
    }

    /// See [`Registration::attach`].
    pub fn attach(&mut self, server: S) -> Result<ObjectName> {
        self.registration.attach(&*self.bridge, server)
    }

    /// See [`Registration::post_attach`].
    pub fn post_attach(&self, success: bool) {
        self.registration.post_attach(&*self.bridge, success);
    }

    /// See [`Registration::detach`].
    pub fn detach(&mut self) -> Result<()> {
        self.registration.detach(&*self.bridge)
    }

    /// See [`Registration::post_detach`].
    pub fn post_detach(&mut self) {
        self.registration.post_detach();
    }

    /// Release the wrapped bridge.
    pub fn into_inner(self) -> Box<dyn ManageableBridge> {
        self.bridge
    }
}

impl<S: Send + Sync> AttributeBridge for ManagedBridge<S> {
    fn object_name(&self) -> String {
        self.bridge.object_name()
    }

    fn attribute_names(&self) -> &[&'static str] {
        self.bridge.attribute_names()
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.bridge.get_attribute(name)
    }

    fn identity(&self) -> Result<ObjectName> {
        self.bridge.identity()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.bridge.has_attribute(name)
    }

    fn set_attribute(&self, attribute: &Attribute) -> Result<()> {
        self.bridge.set_attribute(attribute)
    }

    fn invoke(&self, operation: &str, params: &[AttributeValue]) -> Result<AttributeValue> {
        self.bridge.invoke(operation, params)
    }
}

impl<S: fmt::Debug> fmt::Debug for ManagedBridge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedBridge")
            .field("object_name", &self.bridge.object_name())
            .field("registration", &self.registration)
            .finish()
    }
}
