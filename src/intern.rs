use std::fmt;

use lasso::{Spur, ThreadedRodeo};
use lazy_static::lazy_static;

/// Resolve an [`InternedStr`] to a `&str`.
///
/// The borrow is tied to the global pool, so the result is meant to be used
/// in expression position. Use [`InternedStr::resolve_and_clone`] to keep it.
#[macro_export]
macro_rules! get_str {
    ($self: expr) => {{
        $crate::intern::STRINGS.resolve(&$self.0)
    }};
}

/// A handle to a string in the global pool.
///
/// Identifiers, literal spellings and macro names are all interned so tokens
/// stay `Copy` and compare in constant time.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct InternedStr(pub Spur);

impl fmt::Debug for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(get_str!(self), f)
    }
}

impl fmt::Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(get_str!(self), f)
    }
}

lazy_static! {
    pub static ref STRINGS: ThreadedRodeo = ThreadedRodeo::default();
    static ref EMPTY_STRING: InternedStr = InternedStr::get_or_intern("");
    static ref VA_ARGS: InternedStr = InternedStr::get_or_intern("__VA_ARGS__");
}

impl InternedStr {
    pub fn is_empty(self) -> bool {
        self == *EMPTY_STRING
    }

    /// The name variadic macros use for their trailing arguments.
    pub fn va_args() -> InternedStr {
        *VA_ARGS
    }

    pub fn is_va_args(self) -> bool {
        self == *VA_ARGS
    }

    pub fn resolve_and_clone(self) -> String {
        get_str!(self).to_string()
    }

    /// Intern `val`, returning the existing handle if it is already pooled.
    ///
    /// # Panics
    /// Panics if another thread panicked while holding the pool.
    pub fn get_or_intern<T: AsRef<str> + Into<String>>(val: T) -> InternedStr {
        InternedStr(STRINGS.get_or_intern(val))
    }
}

impl Default for InternedStr {
    fn default() -> Self {
        *EMPTY_STRING
    }
}

impl From<&str> for InternedStr {
    fn from(s: &str) -> Self {
        Self::get_or_intern(s)
    }
}

impl From<String> for InternedStr {
    fn from(s: String) -> Self {
        Self::get_or_intern(s)
    }
}
