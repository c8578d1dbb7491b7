//! Conversion of bound arguments into typed handler parameters.
//!
//! The binder never coerces values. Coercion happens here, on the handler
//! side, so path and query strings can still reach numeric parameters.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::binder::Arg;
use crate::error::HandlerError;
use crate::session::Session;

/// A type a bound argument can be converted into.
pub trait FromArg: Sized {
    /// Convert the argument bound for parameter `name`.
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError>;
}

fn missing(name: &str) -> HandlerError {
    HandlerError::BadValues(format!("missing parameter: {}", name))
}

fn invalid(name: &str, detail: impl std::fmt::Display) -> HandlerError {
    HandlerError::BadValues(format!("invalid value for {}: {}", name, detail))
}

fn required_value(name: &str, arg: Arg) -> Result<Value, HandlerError> {
    match arg {
        Arg::Value(Value::Null) | Arg::Absent => Err(missing(name)),
        Arg::Value(value) => Ok(value),
        Arg::Session(session) => Ok(session.to_value()),
    }
}

impl FromArg for Value {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        required_value(name, arg)
    }
}

impl FromArg for Session {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        match arg {
            Arg::Session(session) => Ok(session),
            _ => Err(HandlerError::internal(format!(
                "parameter {} is not bound to the session",
                name
            ))),
        }
    }
}

impl FromArg for String {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        match required_value(name, arg)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(invalid(name, format!("expected a string, got {}", other))),
        }
    }
}

impl FromArg for bool {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        match required_value(name, arg)? {
            Value::Bool(b) => Ok(b),
            Value::String(s) => s
                .parse()
                .map_err(|_| invalid(name, format!("expected a boolean, got {:?}", s))),
            other => Err(invalid(name, format!("expected a boolean, got {}", other))),
        }
    }
}

macro_rules! number_from_arg {
    ($ty:ty, $as:ident, $what:literal) => {
        impl FromArg for $ty {
            fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
                match required_value(name, arg)? {
                    Value::Number(n) => n
                        .$as()
                        .ok_or_else(|| invalid(name, format!("expected {}, got {}", $what, n))),
                    Value::String(s) => s
                        .trim()
                        .parse()
                        .map_err(|_| invalid(name, format!("expected {}, got {:?}", $what, s))),
                    other => Err(invalid(name, format!("expected {}, got {}", $what, other))),
                }
            }
        }
    };
}

number_from_arg!(i64, as_i64, "an integer");
number_from_arg!(u64, as_u64, "a non-negative integer");
number_from_arg!(f64, as_f64, "a number");

impl<T: FromArg> FromArg for Option<T> {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        match arg {
            Arg::Absent | Arg::Value(Value::Null) => Ok(None),
            arg => T::from_arg(name, arg).map(Some),
        }
    }
}

/// Deserialize the bound value into `T`.
///
/// ```ignore
/// #[handler]
/// async fn update(_id: String, update: Json<FreetUpdate>) -> Result<Value, HandlerError> {
///     let Json(update) = update;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned> FromArg for Json<T> {
    fn from_arg(name: &str, arg: Arg) -> Result<Self, HandlerError> {
        let value = required_value(name, arg)?;
        serde_json::from_value(value)
            .map(Json)
            .map_err(|e| invalid(name, e))
    }
}
