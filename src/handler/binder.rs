//! Parameter binder: declared parameter names in, ordered arguments out.

use serde_json::{Map, Value};

use super::context::RequestContext;
use super::extract::FromArg;
use super::signature::{ParamSource, Signature};
use crate::error::HandlerError;
use crate::session::Session;

/// One bound argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A value found in one of the request sources.
    Value(Value),
    /// The request's session handle.
    Session(Session),
    /// No source held a value for this name.
    Absent,
}

impl Arg {
    pub fn is_absent(&self) -> bool {
        matches!(self, Arg::Absent)
    }

    /// The bound JSON value, if this is a plain value.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Value(a), Arg::Value(b)) => a == b,
            (Arg::Session(a), Arg::Session(b)) => a.same_as(b),
            (Arg::Absent, Arg::Absent) => true,
            _ => false,
        }
    }
}

/// The ordered argument list for one invocation.
///
/// Always as long as the handler's signature. Handlers move values out
/// with [`BoundArgs::take`].
#[derive(Debug, Clone)]
pub struct BoundArgs {
    names: Vec<String>,
    args: Vec<Arg>,
}

impl BoundArgs {
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Convert the argument at `index` into `T`, leaving `Absent` behind.
    ///
    /// Indexing past the signature is a bug in the handler and reported
    /// as an internal failure.
    pub fn take<T: FromArg>(&mut self, index: usize) -> Result<T, HandlerError> {
        let name = self.names.get(index).ok_or_else(|| {
            HandlerError::internal(format!(
                "argument index {} out of range for {} parameters",
                index,
                self.names.len()
            ))
        })?;
        let arg = std::mem::replace(&mut self.args[index], Arg::Absent);
        T::from_arg(name, arg)
    }

    pub fn into_args(self) -> Vec<Arg> {
        self.args
    }
}

/// Resolve every declared parameter of `signature` against `ctx`.
///
/// Reserved names bind a whole source. Any other name is probed in path
/// parameters, then query parameters, then body fields, and the first
/// non-null value wins. Nothing found binds [`Arg::Absent`]. Values are
/// copied as they are; converting them is up to the handler.
pub fn bind(signature: &Signature, ctx: &RequestContext) -> BoundArgs {
    let mut names = Vec::with_capacity(signature.len());
    let mut args = Vec::with_capacity(signature.len());

    for param in signature.params() {
        let arg = match param.source() {
            ParamSource::Session => Arg::Session(ctx.session().clone()),
            ParamSource::Query => Arg::Value(Value::Object(ctx.query().clone())),
            ParamSource::Params => Arg::Value(Value::Object(ctx.params().clone())),
            ParamSource::Body => Arg::Value(ctx.body().clone()),
            ParamSource::Field => probe(param.name(), ctx),
        };
        names.push(param.name().to_string());
        args.push(arg);
    }

    BoundArgs { names, args }
}

fn probe(name: &str, ctx: &RequestContext) -> Arg {
    let body = ctx.body().as_object();
    [Some(ctx.params()), Some(ctx.query()), body]
        .into_iter()
        .flatten()
        .find_map(|source| lookup(source, name))
        .map_or(Arg::Absent, |value| Arg::Value(value.clone()))
}

fn lookup<'a>(source: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    source.get(name).filter(|value| !value.is_null())
}
