//! Lookup keys for the dependency registry.

use crate::naming::SymbolLabel;
use crate::value::Value;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hashable identity of a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyRepr {
    /// A string name — alias keys from transformed code, display strings
    Name(String),
    /// Keyed by a concrete Rust type (class-style registration)
    Type(TypeId),
    /// An explicit unique registration token
    Token(u64),
}

impl KeyRepr {
    /// Identity a value carries on its own: its concrete type.
    pub(crate) fn of_value(value: &Value) -> Self {
        Self::Type(value.type_id())
    }
}

static TOKEN_SEQ: AtomicU64 = AtomicU64::new(1);

/// A registry lookup key: a hashable identity plus the label used when
/// resolution fails.
///
/// String keys are the common case — every alias in a transformed file
/// arrives as one. Type keys replace whole types (`Key::of::<Real>()`
/// registered with a fake). Token keys are explicit registration tokens
/// carrying a function label.
#[derive(Debug, Clone)]
pub struct Key {
    repr: KeyRepr,
    label: SymbolLabel,
}

impl Key {
    /// Key by display name.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: SymbolLabel::Literal(name.clone()),
            repr: KeyRepr::Name(name),
        }
    }

    /// Key by concrete type, for registrations that substitute one type
    /// for another.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            repr: KeyRepr::Type(TypeId::of::<T>()),
            label: SymbolLabel::instance::<T>(),
        }
    }

    /// Fresh token labeled as a named function.
    pub fn named_fn(name: impl Into<String>) -> Self {
        Self {
            repr: Self::fresh_token(),
            label: SymbolLabel::NamedFunction(name.into()),
        }
    }

    /// Fresh token labeled with an anonymous function's leading source.
    pub fn anonymous_fn(source: impl Into<String>) -> Self {
        Self {
            repr: Self::fresh_token(),
            label: SymbolLabel::anonymous(source),
        }
    }

    fn fresh_token() -> KeyRepr {
        KeyRepr::Token(TOKEN_SEQ.fetch_add(1, Ordering::Relaxed))
    }

    /// Display label used in resolution errors.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &SymbolLabel {
        &self.label
    }

    pub(crate) fn repr(&self) -> &KeyRepr {
        &self.repr
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::name(name)
    }
}
