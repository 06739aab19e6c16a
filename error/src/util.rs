use crate::Error;

/// Asserts that two errors convert into the same top-level error message.
///
/// Only meant for tests: the kinds and the messages are compared, not the causes.
pub fn assert_error_eq<L, R>(left: L, right: R)
where
    L: Into<Error>,
    R: Into<Error>,
{
    let (left, right): (Error, Error) = (left.into(), right.into());
    assert_eq!(left.kind(), right.kind());
    assert_eq!(left.to_string(), right.to_string());
}
