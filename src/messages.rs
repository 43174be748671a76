//! Message rendering for validation issues.
//!
//! This module owns all human-readable message text. Validators describe
//! failures as structured [`Violation`]s; a [`MessageProvider`] turns a
//! violation into prose at the moment the issue is reported. The active
//! provider is held in a swappable read-only handle: validation calls only
//! read it, and a swap never changes messages already produced.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::Violation;

/// Renders violations into human-readable messages.
///
/// Implementations are pure lookups: the same violation always produces the
/// same string. The default implementation is [`DefaultMessages`]; hosts can
/// install their own (for localization, or terser text) with
/// [`set_message_provider`] or [`with_message_provider`].
///
/// The violation taxonomy is non-exhaustive, so custom providers need a
/// wildcard arm; delegating unmatched violations to [`DefaultMessages`]
/// keeps them forward-compatible.
pub trait MessageProvider: Send + Sync {
    /// Returns the message for a violation.
    fn message_for(&self, violation: &Violation) -> String;
}

/// The built-in English message table.
///
/// # Example
///
/// ```rust
/// use sluice::{DefaultMessages, MessageProvider, Violation};
///
/// let message = DefaultMessages.message_for(&Violation::TooShort { min: 3, len: 1 });
/// assert_eq!(message, "length must be at least 3, got 1");
/// ```
pub struct DefaultMessages;

impl MessageProvider for DefaultMessages {
    fn message_for(&self, violation: &Violation) -> String {
        match violation {
            Violation::InvalidKind { expected, got } => {
                format!("expected {}, got {}", expected, got)
            }
            Violation::InvalidLiteral { expected, got } => {
                format!("expected literal {}, got {}", expected, got)
            }
            Violation::InvalidEnumValue { variants, got } => {
                format!("expected one of {}, got '{}'", quote_join(variants), got)
            }
            Violation::TooShort { min, len } => {
                format!("length must be at least {}, got {}", min, len)
            }
            Violation::TooLong { max, len } => {
                format!("length must be at most {}, got {}", max, len)
            }
            Violation::WrongLength { expected, len } => {
                format!("length must be exactly {}, got {}", expected, len)
            }
            Violation::TooFewItems { min, len } => {
                format!("must have at least {} items, got {}", min, len)
            }
            Violation::TooManyItems { max, len } => {
                format!("must have at most {} items, got {}", max, len)
            }
            Violation::TooSmall {
                min,
                actual,
                exclusive,
            } => {
                if *exclusive {
                    format!("must be greater than {}, got {}", min, actual)
                } else {
                    format!("must be at least {}, got {}", min, actual)
                }
            }
            Violation::TooLarge {
                max,
                actual,
                exclusive,
            } => {
                if *exclusive {
                    format!("must be less than {}, got {}", max, actual)
                } else {
                    format!("must be at most {}, got {}", max, actual)
                }
            }
            Violation::NotInteger { actual } => {
                format!("expected an integer, got {}", actual)
            }
            Violation::WrongSign { expected, actual } => {
                format!("must be {}, got {}", expected, actual)
            }
            Violation::NotMultipleOf { step, actual } => {
                format!("must be a multiple of {}, got {}", step, actual)
            }
            Violation::InvalidFormat { format, got } => {
                format!("must be a valid {}, got '{}'", format, got)
            }
            Violation::PatternMismatch { pattern, got } => {
                format!("must match pattern {}, got '{}'", pattern, got)
            }
            Violation::MissingPrefix { prefix, got } => {
                format!("must start with '{}', got '{}'", prefix, got)
            }
            Violation::MissingSuffix { suffix, got } => {
                format!("must end with '{}', got '{}'", suffix, got)
            }
            Violation::MissingSubstring { substring, got } => {
                format!("must contain '{}', got '{}'", substring, got)
            }
            Violation::DuplicateItems { index, first_index } => {
                format!(
                    "duplicate item at index {}, first seen at index {}",
                    index, first_index
                )
            }
            Violation::CoercionFailed { target, raw } => {
                format!("cannot coerce '{}' to {}", raw, target)
            }
            Violation::UnexpectedKeys { keys } => {
                format!("unexpected keys: {}", quote_join(keys))
            }
            Violation::TupleLength { expected, received } => {
                format!("expected {} elements, got {}", expected, received)
            }
            Violation::UnionNoMatch { reasons } => {
                format!("no union member matched: {}", reasons.join("; "))
            }
            Violation::UnknownTag { key, tag, known } => {
                format!(
                    "unknown value '{}' for discriminator '{}', expected one of {}",
                    tag,
                    key,
                    quote_join(known)
                )
            }
            Violation::XorNoMatch { members } => {
                format!("none of the {} exclusive branches matched", members)
            }
            Violation::XorAmbiguous { indices } => {
                let positions: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                format!(
                    "matched branches {}, expected exactly one",
                    positions.join(", ")
                )
            }
            Violation::IntersectionConflict { left, right } => {
                format!("cannot merge intersection results: {} vs {}", left, right)
            }
            Violation::Custom { message } => message.clone(),
            Violation::TransformFailed { message } => {
                format!("transform failed: {}", message)
            }
            Violation::AsyncNotSupported { operation } => {
                format!(
                    "cannot {} synchronously with an asynchronous codec",
                    operation
                )
            }
            Violation::MaxDepthExceeded { max } => {
                format!("maximum validation depth {} exceeded", max)
            }
            Violation::UnresolvedReference { name } => {
                format!("schema '{}' not found in registry", name)
            }
            Violation::MissingRegistry { name } => {
                format!("reference '{}' cannot be resolved without a registry", name)
            }
        }
    }
}

fn quote_join(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    quoted.join(", ")
}

static PROVIDER: Lazy<RwLock<Arc<dyn MessageProvider>>> =
    Lazy::new(|| RwLock::new(Arc::new(DefaultMessages)));

/// Returns the active message provider.
///
/// The returned handle is a snapshot: a later swap does not affect it.
pub fn message_provider() -> Arc<dyn MessageProvider> {
    PROVIDER.read().clone()
}

/// Installs a new message provider for all subsequent validations.
///
/// Issues already produced keep their text; only future renderings change.
pub fn set_message_provider(provider: Arc<dyn MessageProvider>) {
    *PROVIDER.write() = provider;
}

/// Runs `f` with a temporarily installed message provider.
///
/// The previous provider is restored when `f` returns, including on panic.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sluice::{with_message_provider, DefaultMessages, MessageProvider, Violation};
///
/// struct Terse;
///
/// impl MessageProvider for Terse {
///     fn message_for(&self, violation: &Violation) -> String {
///         match violation {
///             Violation::InvalidKind { expected, .. } => format!("need {}", expected),
///             other => DefaultMessages.message_for(other),
///         }
///     }
/// }
///
/// let message = with_message_provider(Arc::new(Terse), || {
///     sluice::message_provider().message_for(&Violation::InvalidKind {
///         expected: "string",
///         got: "number",
///     })
/// });
/// assert_eq!(message, "need string");
/// ```
pub fn with_message_provider<T>(
    provider: Arc<dyn MessageProvider>,
    f: impl FnOnce() -> T,
) -> T {
    let previous = {
        let mut guard = PROVIDER.write();
        std::mem::replace(&mut *guard, provider)
    };
    let _restore = RestoreGuard {
        previous: Some(previous),
    };
    f()
}

struct RestoreGuard {
    previous: Option<Arc<dyn MessageProvider>>,
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *PROVIDER.write() = previous;
        }
    }
}
