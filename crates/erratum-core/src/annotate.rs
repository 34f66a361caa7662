//! Help-reference annotation for failures leaving a guarded scope.
//!
//! An [`Annotator`] wraps a block of fallible code. When the block returns
//! `Ok`, nothing happens. When it returns `Err`, the guard merges its
//! reference string into the failure's argument list and hands the very same
//! failure back to the caller:
//!
//! - no arguments: the reference becomes the only argument,
//! - one argument: the reference is joined to it on a new line,
//! - two or more arguments: the reference is appended as the last argument.
//!
//! # Example
//!
//! ```
//! use erratum_core::{Annotator, Failure};
//!
//! let annotator = Annotator::new("https://example.com/help#timeout");
//! let result: Result<(), Failure> =
//!     annotator.scope(|| Err(Failure::new("TimeoutError").with_arg("took too long")));
//!
//! let failure = result.unwrap_err();
//! assert_eq!(failure.args(), ["took too long\nhttps://example.com/help#timeout"]);
//! ```

use std::{error::Error as StdError, fmt};

use log::trace;

/// A failure value carrying a textual argument list that guards may extend.
pub trait Annotate {
    /// Mutable access to the failure's argument list.
    fn args_mut(&mut self) -> &mut Vec<String>;

    /// Merges `reference` into the argument list.
    fn annotate(&mut self, reference: &str) {
        merge_reference(self.args_mut(), reference);
    }
}

impl<E: Annotate + ?Sized> Annotate for Box<E> {
    fn args_mut(&mut self) -> &mut Vec<String> {
        (**self).args_mut()
    }

    fn annotate(&mut self, reference: &str) {
        (**self).annotate(reference);
    }
}

/// Merges a reference string into an argument list in place.
///
/// The newest context always ends up last.
pub fn merge_reference(args: &mut Vec<String>, reference: &str) {
    match args.len() {
        0 => args.push(reference.to_owned()),
        1 => {
            let only = &mut args[0];
            only.push('\n');
            only.push_str(reference);
        }
        _ => args.push(reference.to_owned()),
    }
}

/// Scoped guard that annotates failures with a help reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotator {
    reference: String,
}

impl Annotator {
    /// Creates a guard for the given reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Returns the reference string merged into failures.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Runs `f` inside the guarded scope.
    ///
    /// A successful value passes through unchanged. A failure is annotated
    /// and returned; it is never swallowed or replaced.
    pub fn scope<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Annotate,
    {
        f().annotated(self)
    }

    /// Annotates a failure that is leaving the scope.
    pub fn exit<E: Annotate + ?Sized>(&self, err: &mut E) {
        trace!(reference = self.reference.as_str(); "Annotating failure");
        err.annotate(&self.reference);
    }
}

/// Extension for applying an [`Annotator`] to an existing `Result`.
pub trait ResultExt<T, E> {
    /// Annotates the error, if any, with the guard's reference.
    fn annotated(self, annotator: &Annotator) -> Result<T, E>;
}

impl<T, E: Annotate> ResultExt<T, E> for Result<T, E> {
    fn annotated(self, annotator: &Annotator) -> Result<T, E> {
        self.map_err(|mut err| {
            annotator.exit(&mut err);
            err
        })
    }
}

/// A general failure value with an identity label and an argument list.
///
/// The label plays the role of the failure's type: annotation only ever
/// touches the arguments.
#[derive(Debug)]
pub struct Failure {
    kind: &'static str,
    args: Vec<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Failure {
    /// Creates a failure with no arguments.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            args: Vec::new(),
            source: None,
        }
    }

    /// Appends one argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the identity label.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args.as_slice() {
            [] => write!(f, "{}", self.kind),
            [only] => write!(f, "{}: {only}", self.kind),
            args => write!(f, "{}: {}", self.kind, args.join(", ")),
        }
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

impl Annotate for Failure {
    fn args_mut(&mut self) -> &mut Vec<String> {
        &mut self.args
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn fail(args: &[&str]) -> Result<(), Failure> {
        Err(Failure::new("TypeError").with_args(args.iter().copied()))
    }

    #[test]
    fn test_reference_is_stored_verbatim() {
        let annotator = Annotator::new("https://docs.example.com#foo");
        assert_eq!(annotator.reference(), "https://docs.example.com#foo");
    }

    #[test]
    fn test_scope_passes_success_through() {
        let annotator = Annotator::new("ref");
        let result: Result<i32, Failure> = annotator.scope(|| Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_scope_no_args() {
        let annotator = Annotator::new("ref");
        let err = annotator.scope(|| fail(&[])).unwrap_err();
        assert_eq!(err.args(), ["ref"]);
    }

    #[test]
    fn test_scope_one_arg() {
        let annotator = Annotator::new("ref");
        let err = annotator.scope(|| fail(&["This is wrong."])).unwrap_err();
        assert_eq!(err.args(), ["This is wrong.\nref"]);
    }

    #[test]
    fn test_scope_multiple_args() {
        let annotator = Annotator::new("ref");
        let err = annotator
            .scope(|| fail(&["msg", "other", "arguments"]))
            .unwrap_err();
        assert_eq!(err.args(), ["msg", "other", "arguments", "ref"]);
    }

    #[test]
    fn test_scope_keeps_failure_identity() {
        let annotator = Annotator::new("ref");
        let err = annotator
            .scope(|| -> Result<(), Failure> {
                Err(Failure::new("KeyError")
                    .with_arg("missing")
                    .with_source(io::Error::other("disk")))
            })
            .unwrap_err();

        assert_eq!(err.kind(), "KeyError");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_nested_guards_apply_innermost_first() {
        let outer = Annotator::new("outer");
        let inner = Annotator::new("inner");

        let err = outer
            .scope(|| inner.scope(|| fail(&["boom"])))
            .unwrap_err();
        assert_eq!(err.args(), ["boom\ninner\nouter"]);

        let err = outer
            .scope(|| inner.scope(|| fail(&["a", "b"])))
            .unwrap_err();
        assert_eq!(err.args(), ["a", "b", "inner", "outer"]);
    }

    #[test]
    fn test_exit_on_failure_in_hand() {
        let annotator = Annotator::new("ref");
        let mut failure = Failure::new("ValueError");
        annotator.exit(&mut failure);
        assert_eq!(failure.args(), ["ref"]);
    }

    #[test]
    fn test_result_ext_on_boxed_failure() {
        let annotator = Annotator::new("ref");
        let result: Result<(), Box<Failure>> =
            Err(Box::new(Failure::new("TypeError").with_arg("boxed")));
        let err = result.annotated(&annotator).unwrap_err();
        assert_eq!(err.args(), ["boxed\nref"]);
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(Failure::new("TypeError").to_string(), "TypeError");
        assert_eq!(
            Failure::new("TypeError").with_arg("bad").to_string(),
            "TypeError: bad"
        );
        assert_eq!(
            Failure::new("TypeError").with_args(["a", "b"]).to_string(),
            "TypeError: a, b"
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn failing_with(args: Vec<String>) -> impl FnOnce() -> Result<(), Failure> {
        move || Err(Failure::new("TypeError").with_args(args))
    }

    proptest! {
        #[test]
        fn no_args_yields_reference(reference in ".*") {
            let annotator = Annotator::new(reference.clone());
            let err = annotator.scope(failing_with(Vec::new())).unwrap_err();
            prop_assert_eq!(err.args(), [reference]);
        }

        #[test]
        fn one_arg_joins_on_newline(msg in ".*", reference in ".*") {
            let annotator = Annotator::new(reference.clone());
            let err = annotator.scope(failing_with(vec![msg.clone()])).unwrap_err();
            prop_assert_eq!(err.args(), [format!("{msg}\n{reference}")]);
        }

        #[test]
        fn many_args_append_reference(
            args in prop::collection::vec(".*", 2..8),
            reference in ".*",
        ) {
            let annotator = Annotator::new(reference.clone());
            let err = annotator.scope(failing_with(args.clone())).unwrap_err();

            let mut expected = args;
            expected.push(reference);
            prop_assert_eq!(err.args(), expected.as_slice());
        }
    }
}
