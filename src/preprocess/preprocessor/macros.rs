use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::preprocess::token::{Token, TokenKind};
use crate::InternedStr;

/// The body of a macro. Whitespace is never stored, so two definitions
/// compare equal when they spell the same tokens.
pub type ReplacementList = Vec<Token>;

#[derive(Clone, Debug)]
pub enum Macro {
    Object {
        name: InternedStr,
        replacement: ReplacementList,
    },
    Function {
        name: InternedStr,
        replacement: ReplacementList,
        params: IndexSet<InternedStr>,
        variadic: bool,
    },
}

impl Macro {
    pub fn name(&self) -> InternedStr {
        match self {
            Macro::Object { name, .. } | Macro::Function { name, .. } => *name,
        }
    }

    pub fn replacement(&self) -> &[Token] {
        match self {
            Macro::Object { replacement, .. } | Macro::Function { replacement, .. } => replacement,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Macro::Function { variadic: true, .. })
    }

    /// The argument slot a body token refers to, if it names a parameter.
    ///
    /// `__VA_ARGS__` names the slot after the last named parameter.
    pub fn param_index(&self, token: &TokenKind) -> Option<usize> {
        match (self, token) {
            (
                Macro::Function {
                    params, variadic, ..
                },
                TokenKind::Identifier(id),
            ) => params
                .get_index_of(id)
                .or_else(|| (*variadic && id.is_va_args()).then(|| params.len())),
            _ => None,
        }
    }
}

// Parameter order matters, which `IndexSet`'s own equality ignores.
impl PartialEq for Macro {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Macro::Object {
                    name: a,
                    replacement: ra,
                },
                Macro::Object {
                    name: b,
                    replacement: rb,
                },
            ) => a == b && ra == rb,
            (
                Macro::Function {
                    name: a,
                    replacement: ra,
                    params: pa,
                    variadic: va,
                },
                Macro::Function {
                    name: b,
                    replacement: rb,
                    params: pb,
                    variadic: vb,
                },
            ) => a == b && ra == rb && va == vb && pa.iter().eq(pb.iter()),
            _ => false,
        }
    }
}

/// Every macro currently defined, keyed by name.
#[derive(Debug, Default)]
pub struct MacroTable {
    definitions: HashMap<InternedStr, Rc<Macro>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `mac`, replacing any previous definition of `name`.
    pub fn register_macro(&mut self, name: InternedStr, mac: Macro) {
        self.definitions.insert(name, Rc::new(mac));
    }

    pub fn get_macro(&self, name: InternedStr) -> Option<&Rc<Macro>> {
        self.definitions.get(&name)
    }

    pub fn erase_macro(&mut self, name: InternedStr) -> Option<Rc<Macro>> {
        self.definitions.remove(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn tokens(kinds: &[TokenKind]) -> ReplacementList {
        kinds.iter().map(|&k| Location::default().with(k)).collect()
    }

    #[test]
    fn register_overwrites() {
        let name = InternedStr::from("A");
        let mut table = MacroTable::new();
        table.register_macro(
            name,
            Macro::Object {
                name,
                replacement: tokens(&[TokenKind::Plus]),
            },
        );
        table.register_macro(
            name,
            Macro::Object {
                name,
                replacement: tokens(&[TokenKind::Minus]),
            },
        );
        assert_eq!(
            table.get_macro(name).map(|m| m.replacement().to_vec()),
            Some(tokens(&[TokenKind::Minus]))
        );
        assert!(table.erase_macro(name).is_some());
        assert!(table.get_macro(name).is_none());
    }

    #[test]
    fn va_args_is_the_last_slot() {
        let params: IndexSet<_> = ["a", "b"].into_iter().map(InternedStr::from).collect();
        let mac = Macro::Function {
            name: "F".into(),
            replacement: Vec::new(),
            params,
            variadic: true,
        };
        assert_eq!(mac.param_index(&TokenKind::Identifier("b".into())), Some(1));
        assert_eq!(
            mac.param_index(&TokenKind::Identifier(InternedStr::va_args())),
            Some(2)
        );
        assert_eq!(mac.param_index(&TokenKind::Identifier("c".into())), None);
    }
}
