use serde::{Deserialize, Deserializer};

/// Represents optional field semantics in PUT/PATCH requests.
///
/// - `Unchanged` → field not present in the body
/// - `SetToNull` → explicitly null
/// - `SetToValue` → set to provided value
///
/// Pair with `#[serde(default)]` so that an absent key lands on `Unchanged`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> OptionField<T> {
    /// True when `Unchanged`.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Convert to nested option:
    /// - `None` → unchanged
    /// - `Some(None)` → set null
    /// - `Some(Some(T))` → set to value
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Unchanged => None,
            Self::SetToNull => Some(None),
            Self::SetToValue(v) => Some(Some(v)),
        }
    }

    /// Writes into a nullable target; null clears it.
    pub fn assign_to(self, target: &mut Option<T>) {
        if let Some(value) = self.into_option() {
            *target = value;
        }
    }
}

impl<T: Default> OptionField<T> {
    /// Writes into a non-nullable target; null resets it to its default.
    pub fn assign_or_default(self, target: &mut T) {
        if let Some(value) = self.into_option() {
            *target = value.unwrap_or_default();
        }
    }
}
