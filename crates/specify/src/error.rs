//! Error types for declaration misuse and fatal run failures.

use std::any::Any;
use std::panic::Location;

/// A mistake in the declaration code of a specification.
///
/// These are programmer errors and are raised as panics at declaration
/// time, the moment the offending `it` body returns.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error(
        "specify: `that` declared at {location} in `{describe} - {it}` has no matcher verb; \
         call `.should().be(..)` or another verb on it"
    )]
    MissingVerb {
        describe: String,
        it: String,
        location: &'static Location<'static>,
    },
}

/// Fatal errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// A matcher panicked instead of producing a verdict.
    #[error("specify: matcher in `{describe} - {it}` panicked: {message}")]
    MatcherPanicked {
        describe: String,
        it: String,
        message: String,
    },
}

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(boxed.as_ref()), "static str");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn test_missing_verb_names_its_scope() {
        let err = UsageError::MissingVerb {
            describe: "Calculator".into(),
            it: "adds".into(),
            location: Location::caller(),
        };
        let text = err.to_string();
        assert!(text.contains("`Calculator - adds`"));
        assert!(text.contains("no matcher verb"));
    }
}
