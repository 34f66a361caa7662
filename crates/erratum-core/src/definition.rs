//! Error kind definitions.
//!
//! An error definition describes a *kind* of error rather than one failure:
//! where to read more about it ([`ErrorDefinition::URL`]) and what it means
//! ([`ErrorDefinition::DOC`]). Kinds are zero-sized types declared with
//! [`define_error!`](crate::define_error), and every kind descends from the
//! base kind [`Error`].
//!
//! A kind can annotate failures in three ways:
//!
//! - as a guard: `FooError.scope(|| ...)`,
//! - as a wrapper around a callable: `FooError::wrap(my_function)`,
//! - at the definition site of a function with [`annotated!`](crate::annotated).
//!
//! # Example
//!
//! ```
//! use erratum_core::{ErrorDefinition, Failure, define_error};
//!
//! define_error! {
//!     /// The configuration file could not be found.
//!     pub MissingConfig => "https://example.com/troubleshooting.html";
//! }
//!
//! assert_eq!(
//!     MissingConfig::reference(),
//!     "https://example.com/troubleshooting.html#missingconfig"
//! );
//!
//! let err = MissingConfig
//!     .scope(|| -> Result<(), Failure> { Err(Failure::new("IoError")) })
//!     .unwrap_err();
//! assert_eq!(err.args(), [MissingConfig::reference()]);
//! ```

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use crate::{
    annotate::{Annotate, Annotator},
    item::Item,
};

/// A kind of error, documented by its URL and description.
pub trait ErrorDefinition: Sized + 'static {
    /// The type identifier, e.g. `"FooError"`.
    const IDENT: &'static str;

    /// Base URL of the page documenting this kind.
    const URL: &'static str;

    /// Raw documentation text of the kind.
    const DOC: &'static str;

    /// Name of the kind: the identifier case-folded to lowercase.
    fn name() -> String {
        Self::IDENT.to_lowercase()
    }

    /// Fully-qualified reference, `<URL>#<name>`.
    fn reference() -> String {
        compose_reference(Self::URL, &Self::name())
    }

    /// Cleaned-up documentation text; may be empty.
    fn description() -> String {
        clean_doc(Self::DOC)
    }

    /// Runtime descriptor of this kind.
    fn kind() -> Kind {
        Kind::of::<Self>()
    }

    /// Wraps a callable so failures it returns are annotated with
    /// this kind's reference.
    ///
    /// The wrapper takes the name of `f` when `f` is a function item. Use
    /// [`wrap_named`](Self::wrap_named) for closures, function pointers and
    /// boxed callables.
    fn wrap<F>(f: F) -> Wrapped<Self, F> {
        Wrapped::new(fn_item_name::<F>(), f)
    }

    /// Wraps a callable under an explicit name.
    fn wrap_named<F>(name: &'static str, f: F) -> Wrapped<Self, F> {
        Wrapped::new(Some(name), f)
    }

    /// Guard annotating failures with this kind's reference.
    fn annotator(&self) -> Annotator {
        Annotator::new(Self::reference())
    }

    /// Runs `f` with this kind acting as the guard.
    fn scope<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Annotate,
    {
        self.annotator().scope(f)
    }
}

crate::define_error! {
    /// Base definition every error kind descends from.
    ///
    /// Carries an empty URL, so kinds that do not set their own point at an
    /// anchor on the current page.
    pub Error => "";
}

/// Joins a base URL and a kind name into a single reference.
pub fn compose_reference(url: &str, name: &str) -> String {
    format!("{url}#{name}")
}

/// Normalizes raw doc text.
///
/// Removes the indentation shared by all non-blank lines, trailing
/// whitespace on each line, and blank lines at either end.
pub fn clean_doc(raw: &str) -> String {
    let indent = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let lines: Vec<&str> = raw
        .lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .map(str::trim_end)
        .collect();

    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |idx| idx + 1);

    lines[start..end].join("\n")
}

/// Runtime descriptor of an [`ErrorDefinition`] type.
///
/// Two descriptors are equal when they describe the same type.
#[derive(Clone, Copy)]
pub struct Kind {
    type_id: TypeId,
    ident: &'static str,
    url: &'static str,
    doc: &'static str,
}

impl Kind {
    /// Descriptor for `D`.
    pub fn of<D: ErrorDefinition>() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            ident: D::IDENT,
            url: D::URL,
            doc: D::DOC,
        }
    }

    /// The type identifier.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The base URL.
    pub fn url(&self) -> &'static str {
        self.url
    }

    /// The lowercase name.
    pub fn name(&self) -> String {
        self.ident.to_lowercase()
    }

    /// The fully-qualified reference.
    pub fn reference(&self) -> String {
        compose_reference(self.url, &self.name())
    }

    /// The cleaned-up description.
    pub fn description(&self) -> String {
        clean_doc(self.doc)
    }

    /// Whether this is the base kind [`Error`].
    pub fn is_base(&self) -> bool {
        self.is::<Error>()
    }

    /// Whether this describes `D`.
    pub fn is<D: ErrorDefinition>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }

    /// Guard annotating failures with this kind's reference.
    pub fn annotator(&self) -> Annotator {
        Annotator::new(self.reference())
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("ident", &self.ident)
            .field("url", &self.url)
            .finish()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// Calls a function with its arguments packed in a tuple.
///
/// Implemented for every `Fn` taking up to six arguments.
pub trait Invoke<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Invoke<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);
impl_invoke!(A, B, C, D, E);
impl_invoke!(A, B, C, D, E, G);

/// A callable wrapped by an error kind.
///
/// Keeps the wrapped function's name, so the wrapper reports the same
/// identity as the original.
pub struct Wrapped<D, F> {
    f: F,
    name: Option<&'static str>,
    definition: PhantomData<fn() -> D>,
}

impl<D: ErrorDefinition, F> Wrapped<D, F> {
    fn new(name: Option<&'static str>, f: F) -> Self {
        Self {
            f,
            name,
            definition: PhantomData,
        }
    }

    /// Name of the wrapped function.
    ///
    /// `None` when the callable has no name of its own and none was given.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The kind annotating this callable.
    pub fn definition(&self) -> Kind {
        D::kind()
    }

    /// Exports the wrapper as a module item.
    ///
    /// A wrapped callable is a function, never a kind. Unnamed callables
    /// cannot be exported.
    pub fn item(&self) -> Option<Item> {
        self.name.map(Item::Function)
    }

    /// Calls the wrapped function inside the kind's guard.
    pub fn call<Args, T, E>(&self, args: Args) -> Result<T, E>
    where
        F: Invoke<Args, Output = Result<T, E>>,
        E: Annotate,
    {
        Annotator::new(D::reference()).scope(|| self.f.invoke(args))
    }

    /// Unwraps the original callable.
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<D: ErrorDefinition, F> fmt::Debug for Wrapped<D, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("name", &self.name)
            .field("definition", &D::IDENT)
            .finish()
    }
}

/// Name of `F` when it is a function item.
///
/// Function items are zero-sized and their type name is their path.
/// Pointers, boxes and references have a size; closures are unnamed.
fn fn_item_name<F>() -> Option<&'static str> {
    let full = type_name::<F>();
    if size_of::<F>() != 0 || full.contains("{{closure}}") {
        return None;
    }
    Some(short_name(full))
}

/// Last path segment of a type name, without generic arguments.
fn short_name(full: &'static str) -> &'static str {
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Declares an error kind.
///
/// The doc comment becomes the kind's description. The URL is either given
/// explicitly, inherited from a parent kind, or inherited from [`Error`].
///
/// ```
/// use erratum_core::{ErrorDefinition, define_error};
///
/// define_error! {
///     /// Something went wrong with the network.
///     pub NetworkError => "https://example.com/errors.html";
/// }
///
/// define_error! {
///     /// The remote host did not answer in time.
///     pub TimeoutError: NetworkError;
/// }
///
/// define_error! {
///     pub UndocumentedError;
/// }
///
/// assert_eq!(TimeoutError::reference(), "https://example.com/errors.html#timeouterror");
/// assert_eq!(TimeoutError::description(), "The remote host did not answer in time.");
/// assert_eq!(UndocumentedError::reference(), "#undocumentederror");
/// assert_eq!(UndocumentedError::description(), "");
/// ```
#[macro_export]
macro_rules! define_error {
    (@define [$($doc:literal)*] $vis:vis $name:ident, $url:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::ErrorDefinition for $name {
            const IDENT: &'static str = stringify!($name);
            const URL: &'static str = $url;
            const DOC: &'static str = concat!($($doc, "\n"),*);
        }
    };
    ($(#[doc = $doc:literal])* $vis:vis $name:ident => $url:expr $(;)?) => {
        $crate::define_error!(@define [$($doc)*] $vis $name, $url);
    };
    ($(#[doc = $doc:literal])* $vis:vis $name:ident : $parent:ty $(;)?) => {
        $crate::define_error!(
            @define [$($doc)*] $vis $name,
            <$parent as $crate::ErrorDefinition>::URL
        );
    };
    ($(#[doc = $doc:literal])* $vis:vis $name:ident $(;)?) => {
        $crate::define_error!(
            @define [$($doc)*] $vis $name,
            <$crate::Error as $crate::ErrorDefinition>::URL
        );
    };
}

/// Declares a function whose failures are annotated by an error kind.
///
/// The function keeps its own name, signature and doc comment; only the
/// body runs inside the kind's guard.
///
/// ```
/// use erratum_core::{ErrorDefinition, Failure, annotated, define_error};
///
/// define_error! {
///     /// Parsing failed.
///     pub ParseError => "https://example.com/help";
/// }
///
/// annotated! {
///     ParseError =>
///     /// Parses a port number.
///     pub fn parse_port(raw: &str) -> Result<u16, Failure> {
///         raw.parse::<u16>().map_err(|_| Failure::new("ValueError").with_arg("not a port"))
///     }
/// }
///
/// assert_eq!(parse_port("8080").unwrap(), 8080);
/// let err = parse_port("http").unwrap_err();
/// assert_eq!(err.args(), ["not a port\nhttps://example.com/help#parseerror"]);
/// ```
#[macro_export]
macro_rules! annotated {
    (
        $definition:ty =>
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty $body:block
    ) => {
        $(#[$meta])*
        $vis fn $name($($arg: $arg_ty),*) -> $ret {
            $crate::Annotator::new(<$definition as $crate::ErrorDefinition>::reference())
                .scope(|| $body)
        }
    };
}
