//! A prelude which exports the macro to define an error type based on its kind.

pub use crate::def_error_base_on_kind;

/// Defines an error type that carries a kind and a dynamic cause.
///
/// The generated type stores the kind next to an [`AnyError`](crate::AnyError), so callers can
/// branch on [`kind()`] and still [`downcast_ref`] into the concrete error raised by a component.
///
/// [`kind()`]: #method.kind
/// [`downcast_ref`]: #method.downcast_ref
#[macro_export]
macro_rules! def_error_base_on_kind {
    ($error:ident, $error_kind:ty, $comment_error:expr) => {
        #[doc = $comment_error]
        #[derive(Debug, Clone)]
        pub struct $error {
            kind: $error_kind,
            inner: $crate::AnyError,
        }

        impl ::std::fmt::Display for $error {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if f.alternate() {
                    write!(f, "{}", self.inner)
                } else {
                    write!(f, "{}Error({})", self.kind, self.inner)
                }
            }
        }

        impl ::std::error::Error for $error {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                self.inner.source()
            }
        }

        impl From<$error_kind> for $error {
            fn from(kind: $error_kind) -> Self {
                kind.because($crate::OtherError::new(kind.to_string()))
            }
        }

        impl $error_kind {
            /// Creates an error with the kind and a concrete cause.
            pub fn because<E>(self, reason: E) -> $error
            where
                E: ::std::error::Error + Send + Sync + 'static,
            {
                $error {
                    kind: self,
                    inner: reason.into(),
                }
            }

            /// Creates an error with the kind and a plain message as its cause.
            pub fn other<T>(self, reason: T) -> $error
            where
                T: ::std::fmt::Display,
            {
                self.because($crate::OtherError::new(reason.to_string()))
            }
        }

        impl $error {
            /// Returns the kind of the error.
            pub fn kind(&self) -> $error_kind {
                self.kind
            }

            /// Attempts to downcast the cause to a concrete error type.
            pub fn downcast_ref<T>(&self) -> Option<&T>
            where
                T: ::std::fmt::Display + ::std::fmt::Debug + Send + Sync + 'static,
            {
                self.inner.downcast_ref::<T>()
            }

            /// Returns the lowest level cause in the chain.
            pub fn root_cause(&self) -> &(dyn ::std::error::Error + 'static) {
                self.inner.root_cause()
            }
        }
    };
}
