use std::collections::VecDeque;

use crate::location::{Locatable, Location};

/// Queues of errors and warnings recorded by one pipeline stage.
///
/// Stages record recoverable problems here and keep going.
/// Whoever drives the stage drains the queues afterwards.
#[derive(Clone, Debug)]
pub struct ErrorHandler<T, W> {
    errors: VecDeque<Locatable<T>>,
    warnings: VecDeque<Locatable<W>>,
}

impl<T, W> Default for ErrorHandler<T, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W> ErrorHandler<T, W> {
    pub fn new() -> Self {
        Self {
            errors: VecDeque::new(),
            warnings: VecDeque::new(),
        }
    }

    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error<E: Into<T>>(&mut self, error: Locatable<E>) {
        self.errors.push_back(error.map(Into::into));
    }

    pub fn push_warning<V: Into<W>>(&mut self, warning: Locatable<V>) {
        self.warnings.push_back(warning.map(Into::into));
    }

    pub fn error<E: Into<T>>(&mut self, error: E, location: Location) {
        self.push_error(location.with(error));
    }

    pub fn warn<V: Into<W>>(&mut self, warning: V, location: Location) {
        self.push_warning(location.with(warning));
    }

    pub fn pop_error(&mut self) -> Option<Locatable<T>> {
        self.errors.pop_front()
    }

    pub fn take_errors(&mut self) -> VecDeque<Locatable<T>> {
        std::mem::take(&mut self.errors)
    }

    pub fn take_warnings(&mut self) -> VecDeque<Locatable<W>> {
        std::mem::take(&mut self.warnings)
    }

    /// Move everything recorded by `other` into `self`.
    pub fn append<S: Into<T>>(&mut self, other: &mut ErrorHandler<S, W>) {
        while let Some(err) = other.errors.pop_front() {
            self.errors.push_back(err.map(Into::into));
        }
        self.warnings.append(&mut other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Oops;

    #[test]
    fn errors_come_out_in_order() {
        let mut handler: ErrorHandler<u8, Oops> = ErrorHandler::new();
        handler.error(1u8, Location::default());
        handler.error(2u8, Location::default());
        assert!(!handler.is_successful());
        assert_eq!(handler.pop_error().map(|e| e.data), Some(1));
        assert_eq!(handler.pop_error().map(|e| e.data), Some(2));
        assert!(handler.is_successful());
    }

    #[test]
    fn append_drains_the_other_handler() {
        let mut first: ErrorHandler<u32, Oops> = ErrorHandler::new();
        let mut second: ErrorHandler<u8, Oops> = ErrorHandler::new();
        second.error(3u8, Location::default());
        second.warn(Oops, Location::default());

        first.append(&mut second);
        assert!(second.is_successful());
        assert!(second.take_warnings().is_empty());
        assert_eq!(first.take_errors().len(), 1);
        assert_eq!(first.take_warnings().len(), 1);
    }
}
