//! Aliases for operations that keep going past individual failures.
//!
//! Plugin discovery, pending flushes and document resolution each handle many
//! independent items. One broken plugin module must not hide the rest, so these
//! operations hand back what they achieved along with what went wrong.

/// Completed, together with the errors (or warnings) of the items that were skipped.
pub type PartialSuccess<T, E> = ( T, Vec<E> );

/// Completed as a [`PartialSuccess`], or aborted at the first error when running
/// fail-fast, together with the errors collected before the abort.
pub type PartialResult<T, E> = Result<PartialSuccess<T, E>, ( E, Vec<E> )>;
