use std::{
    cell::{Cell, RefCell},
    fmt::Display,
};

/// Represents a trait responsible for handling diagnostics produced while scanning and parsing.
pub trait Handler<T> {
    /// Receive an error and handles it.
    fn receive(&self, error: T);
}

/// Handler that prints every received diagnostic to stderr.
#[derive(Debug, Default)]
pub struct PrintHandler {
    printed: Cell<bool>,
}

impl PrintHandler {
    /// Creates a new [`PrintHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one diagnostic has been printed.
    #[must_use]
    pub fn has_printed(&self) -> bool {
        self.printed.get()
    }
}

impl<T: Display> Handler<T> for PrintHandler {
    fn receive(&self, error: T) {
        eprintln!("{error}");
        self.printed.set(true);
    }
}

/// Handler that keeps every received diagnostic, in the order they arrived.
#[derive(Debug)]
pub struct SilentHandler<T = super::Error> {
    received: RefCell<Vec<T>>,
}

impl<T> Default for SilentHandler<T> {
    fn default() -> Self {
        Self {
            received: RefCell::new(Vec::new()),
        }
    }
}

impl<T> SilentHandler<T> {
    /// Creates a new, empty [`SilentHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no diagnostic has been received yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.received.borrow().is_empty()
    }

    /// Takes all received diagnostics out of the handler.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        self.received.take()
    }
}

impl<T, E: Into<T>> Handler<E> for SilentHandler<T> {
    fn receive(&self, error: E) {
        self.received.borrow_mut().push(error.into());
    }
}
