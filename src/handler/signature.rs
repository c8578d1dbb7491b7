//! Declared parameter lists of handlers.

use std::fmt;

/// Marker appended to a parameter name to flag it optional.
pub const OPTIONAL_MARKER: char = '?';

/// Where a declared parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// `session`: the whole session handle.
    Session,
    /// `query`: every query parameter as one object.
    Query,
    /// `body`: the whole request body.
    Body,
    /// `params`: every path parameter as one object.
    Params,
    /// Any other name: probe path, query, then body for that field.
    Field,
}

impl ParamSource {
    fn for_name(name: &str) -> Self {
        match name {
            "session" => ParamSource::Session,
            "query" => ParamSource::Query,
            "body" => ParamSource::Body,
            "params" => ParamSource::Params,
            _ => ParamSource::Field,
        }
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    optional: bool,
    source: ParamSource,
}

impl Param {
    /// Parse a declared name such as `"id"` or `"update?"`.
    pub fn parse(declared: &str) -> Self {
        let declared = declared.trim();
        let (name, optional) = match declared.strip_suffix(OPTIONAL_MARKER) {
            Some(name) => (name.trim_end(), true),
            None => (declared, false),
        };
        Self {
            name: name.to_string(),
            optional,
            source: ParamSource::for_name(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn source(&self) -> ParamSource {
        self.source
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{}{}", self.name, OPTIONAL_MARKER)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Ordered parameter list of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn parse<S: AsRef<str>>(declared: &[S]) -> Self {
        Self {
            params: declared.iter().map(|d| Param::parse(d.as_ref())).collect(),
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(Param::name)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}
