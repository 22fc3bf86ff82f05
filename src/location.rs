use std::ops::Range;

/// A half-open byte range into a source buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

static_assertions::assert_eq_size!(SourceKind, [u8; 4]);

/// Where a token's text lives.
///
/// `Generated` is used for tokens synthesized during expansion,
/// such as the string literal produced by `#`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Generated,
    File(codespan::FileId),
}

impl Span {
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for codespan::Span {
    fn from(span: Span) -> codespan::Span {
        codespan::Span::new(span.start, span.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Range<usize> {
        (span.start as usize)..(span.end as usize)
    }
}

impl<T: Into<u32>> From<Range<T>> for Span {
    fn from(r: Range<T>) -> Span {
        Span {
            start: r.start.into(),
            end: r.end.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub span: Span,
    pub source: SourceKind,
}

impl Default for Location {
    fn default() -> Self {
        Self::generated(Span::default())
    }
}

impl Location {
    pub fn generated(span: Span) -> Location {
        Self {
            span,
            source: SourceKind::Generated,
        }
    }

    pub fn with<T>(self, data: T) -> Locatable<T> {
        Locatable {
            data,
            location: self,
        }
    }

    pub fn file(self) -> Option<codespan::FileId> {
        match self.source {
            SourceKind::File(id) => Some(id),
            SourceKind::Generated => None,
        }
    }

    /// Two tokens are adjacent when they come from the same file and
    /// nothing (not even whitespace) separates them.
    pub fn is_directly_before(self, other: Location) -> bool {
        self.source != SourceKind::Generated
            && self.source == other.source
            && self.span.end == other.span.start
    }

    pub fn merge_span(&mut self, span: Span) {
        use std::cmp::{max, min};

        self.span = Span {
            start: min(self.span.start, span.start),
            end: max(self.span.end, span.end),
        };
    }

    // only merges when both locations point into the same file
    #[must_use]
    pub fn maybe_merge(mut self, other: Location) -> Self {
        if self.source != SourceKind::Generated && self.source == other.source {
            self.merge_span(other.span);
        }
        self
    }
}

/// A value paired with the source range it came from.
///
/// Equality ignores the location, so two tokens spelled the same way
/// compare equal wherever they appear.
#[derive(Copy, Clone, Debug)]
pub struct Locatable<T> {
    pub data: T,
    pub location: Location,
}

impl<T> Locatable<T> {
    pub fn new(data: T, location: Location) -> Locatable<T> {
        location.with(data)
    }

    pub fn map<S, F: FnOnce(T) -> S>(self, f: F) -> Locatable<S> {
        Locatable {
            data: f(self.data),
            location: self.location,
        }
    }
}

impl<T: PartialEq> PartialEq for Locatable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Locatable<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_never_adjacent() {
        let a = Location::generated((0u32..1).into());
        let b = Location::generated((1u32..2).into());
        assert!(!a.is_directly_before(b));
    }

    #[test]
    fn merge_ignores_generated() {
        let a = Location::generated((0u32..1).into());
        let merged = a.maybe_merge(Location::generated((5u32..9).into()));
        assert_eq!(merged.span, Span { start: 0, end: 1 });
    }

    #[test]
    fn equality_ignores_location() {
        let a = Location::generated((0u32..1).into()).with(7);
        let b = Location::generated((4u32..5).into()).with(7);
        assert_eq!(a, b);
    }
}
