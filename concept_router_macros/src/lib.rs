mod handler;

use proc_macro::TokenStream;

/// Attribute macro that turns a plain function into a route handler.
///
/// The function is kept as written. Next to it the macro generates
/// `<name>_handler(..) -> concept_router::Handler`, whose signature lists
/// the function's parameter names in declaration order. Those names are
/// what the binder resolves against each request:
///
/// ```ignore
/// #[handler]
/// async fn update(session: Session, _id: String, update: Json<FreetUpdate>) -> Result<Value, HandlerError> {
///     // ...
/// }
///
/// freets.patch("/:_id", update_handler())?;   // signature: (session, _id, update)
/// ```
///
/// - Parameters typed `Option<..>` are declared optional (`name?`) and
///   receive `None` when no source has the name.
/// - `session`, `query`, `body` and `params` bind the whole source.
/// - Parameters marked `#[state]` are not bound from the request. They
///   become parameters of the generated constructor, and every call gets
///   a clone:
///
/// ```ignore
/// #[handler]
/// async fn read(#[state] store: FreetStore, author: Option<String>) -> Result<Value, HandlerError> {
///     Ok(json!({ "freets": store.by_author(author.as_deref()) }))
/// }
///
/// freets.get("/", read_handler(store.clone()))?;
/// ```
///
/// - `#[handler("freet.read")]` overrides the handler name used in logs.
///
/// The function may be `async` or not. It must return
/// `Result<T, E>` where `T: Serialize` and `E: Into<HandlerError>`.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::expand(attr, item)
}
