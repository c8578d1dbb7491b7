//! Session variables attached to a request by the surrounding web layer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use crate::error::HandlerError;

const USER_KEY: &str = "user";

/// Handle onto the session variables of one request.
///
/// Cloning the handle shares the variables, so a handler that logs a user
/// in through its `session` argument changes what the session layer sees
/// once the handler returns.
///
/// ```ignore
/// let session = Session::new();
/// session.start("alice")?;
/// assert_eq!(session.user().as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: Arc<RwLock<HashMap<String, Value>>>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, Value>) -> Self {
        Self {
            variables: Arc::new(RwLock::new(variables)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.variables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.variables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Set a session variable.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write().insert(key.into(), value.into());
    }

    /// Remove a session variable, returning its old value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Snapshot of all session variables.
    pub fn variables(&self) -> HashMap<String, Value> {
        self.read().clone()
    }

    /// The session as a JSON object.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Value::Object(map)
    }

    /// `true` when both handles point at the same variables.
    pub fn same_as(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.variables, &other.variables)
    }

    /// The logged-in user, if any.
    pub fn user(&self) -> Option<String> {
        match self.read().get(USER_KEY) {
            Some(Value::String(user)) => Some(user.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }

    /// The logged-in user. Returns `Unauthenticated` if nobody is logged in.
    pub fn require_user(&self) -> Result<String, HandlerError> {
        self.user()
            .ok_or_else(|| HandlerError::Unauthenticated("Not logged in!".into()))
    }

    pub fn require_logged_in(&self) -> Result<(), HandlerError> {
        self.require_user().map(|_| ())
    }

    pub fn require_logged_out(&self) -> Result<(), HandlerError> {
        match self.user() {
            Some(_) => Err(HandlerError::NotAllowed("Must be logged out!".into())),
            None => Ok(()),
        }
    }

    /// Log `user` in. Fails if someone is already logged in.
    pub fn start(&self, user: impl Into<String>) -> Result<(), HandlerError> {
        self.require_logged_out()?;
        self.set(USER_KEY, user.into());
        Ok(())
    }

    /// Log the current user out. Fails if nobody is logged in.
    pub fn end(&self) -> Result<(), HandlerError> {
        self.require_logged_in()?;
        self.remove(USER_KEY);
        Ok(())
    }
}
