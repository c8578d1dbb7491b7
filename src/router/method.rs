use std::fmt;

/// HTTP method a route is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Every method.
    All,
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl Method {
    /// Parse a method name, ignoring case. `"ALL"` and `"*"` mean [`Method::All`].
    pub fn from_name(name: &str) -> Option<Self> {
        let method = match name.to_ascii_uppercase().as_str() {
            "ALL" | "*" => Method::All,
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            "HEAD" => Method::Head,
            _ => return None,
        };
        Some(method)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::All => "ALL",
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
        }
    }

    /// Would a route registered for `self` answer a request made with `request`?
    pub fn accepts(&self, request: Method) -> bool {
        *self == Method::All || *self == request
    }

    /// Do two registrations compete for the same requests?
    pub fn overlaps(&self, other: Method) -> bool {
        self.accepts(other) || other.accepts(*self)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "http")]
impl TryFrom<&axum::http::Method> for Method {
    type Error = ();

    fn try_from(method: &axum::http::Method) -> Result<Self, Self::Error> {
        match Method::from_name(method.as_str()) {
            Some(Method::All) | None => Err(()),
            Some(method) => Ok(method),
        }
    }
}
