//! Modifier flags and small enums shared by the member entities.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Parameter passing modifiers, packed into one byte.
    ///
    /// The model does not treat these as mutually exclusive; valid source
    /// never combines them, but that is the parser's concern.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ParameterFlags: u8 {
        const REF = 0b001;
        const OUT = 0b010;
        const PARAMS = 0b100;
    }
}

impl ParameterFlags {
    /// Keywords for the set flags, in declaration order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        [
            (ParameterFlags::REF, "ref"),
            (ParameterFlags::OUT, "out"),
            (ParameterFlags::PARAMS, "params"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, keyword)| keyword)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MethodModifiers: u8 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const VIRTUAL = 1 << 2;
        const OVERRIDE = 1 << 3;
        const SEALED = 1 << 4;
        /// Declared with `this` on its first parameter.
        const EXTENSION = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    /// No modifier written; the language default applies.
    #[default]
    None,
    Private,
    Public,
    Protected,
    Internal,
    ProtectedOrInternal,
    ProtectedAndInternal,
}

impl Accessibility {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Accessibility::None => None,
            Accessibility::Private => Some("private"),
            Accessibility::Public => Some("public"),
            Accessibility::Protected => Some("protected"),
            Accessibility::Internal => Some("internal"),
            Accessibility::ProtectedOrInternal => Some("protected internal"),
            Accessibility::ProtectedAndInternal => Some("private protected"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        })
    }
}
