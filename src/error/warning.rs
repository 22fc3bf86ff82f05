use thiserror::Error;

use crate::data::Qualifiers;
use crate::parse::ast::UnitSpecifier;
use crate::InternedStr;

#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
/// warnings are non-exhaustive and may have new variants added at any time
pub enum Warning {
    #[error("no space after macro identifier")]
    NoSpaceAfterMacroIdentifier,

    #[error("backslash newline at end of file")]
    BackslashNewlineAtEOF,

    /// The macro named here appeared in its own replacement list
    /// and was left unexpanded.
    #[error("macro '{0}' is defined in terms of itself")]
    MacroDefinedInTermsOfItself(InternedStr),

    #[error("#{0} is not supported and was ignored")]
    UnsupportedDirective(InternedStr),

    #[error("only #include \"file\" is implemented; this include was skipped")]
    UnimplementedInclude,

    #[error("duplicate '{0}' declaration specifier{}",
            if *.1 > 1 { format!(" occurs {} times", .1) } else { String::new() })]
    DuplicateSpecifier(UnitSpecifier, usize),

    #[error("qualifiers in type casts are ignored")]
    IgnoredQualifier(Qualifiers),
}
