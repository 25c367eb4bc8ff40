use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnumMappingError {
    #[error("unknown {name} wire value: {value}")]
    UnknownWire { name: &'static str, value: i32 },

    #[error("unknown {name} storage value: {value:?}")]
    UnknownStorage { name: &'static str, value: String },

    #[error("{name} mapping diverged: {detail}")]
    Diverged { name: &'static str, detail: String },
}

/// Bidirectional mapping between a domain enum, its protobuf wire enum and
/// the string persisted in the database.
///
/// `mapping` is the table: one exhaustive match arm per domain variant.
/// The reverse directions are derived from it, so they can never disagree
/// with the forward one. `verify_mapping` checks the table against the wire
/// enum generated from the proto files.
pub trait EnumMapping: Sized + Copy + PartialEq + fmt::Debug + 'static {
    type Wire: Copy + PartialEq + fmt::Debug + Into<i32> + TryFrom<i32>;

    const NAME: &'static str;
    const VARIANTS: &'static [Self];

    fn mapping(self) -> (Self::Wire, &'static str);

    fn to_wire(self) -> Self::Wire {
        self.mapping().0
    }

    fn wire_value(self) -> i32 {
        self.to_wire().into()
    }

    fn as_storage(self) -> &'static str {
        self.mapping().1
    }

    fn from_wire(value: i32) -> Result<Self, EnumMappingError> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.wire_value() == value)
            .ok_or(EnumMappingError::UnknownWire {
                name: Self::NAME,
                value,
            })
    }

    fn from_storage(value: &str) -> Result<Self, EnumMappingError> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_storage() == value)
            .ok_or_else(|| EnumMappingError::UnknownStorage {
                name: Self::NAME,
                value: value.to_string(),
            })
    }
}

const MAX_WIRE_SCAN: i32 = 1024;

pub fn verify_mapping<T: EnumMapping>() -> Result<(), EnumMappingError> {
    let diverged = |detail: String| EnumMappingError::Diverged {
        name: T::NAME,
        detail,
    };

    let mut wire_count = 0usize;
    for value in 0..MAX_WIRE_SCAN {
        if T::Wire::try_from(value).is_err() {
            break;
        }
        T::from_wire(value)
            .map_err(|_| diverged(format!("wire value {value} has no domain variant")))?;
        wire_count += 1;
    }

    if wire_count != T::VARIANTS.len() {
        return Err(diverged(format!(
            "{} wire values but {} domain variants",
            wire_count,
            T::VARIANTS.len()
        )));
    }

    for (index, variant) in T::VARIANTS.iter().copied().enumerate() {
        if T::VARIANTS[..index].contains(&variant) {
            return Err(diverged(format!("{variant:?} listed twice")));
        }

        let storage = variant.as_storage();
        if storage.is_empty() {
            return Err(diverged(format!("{variant:?} has an empty storage value")));
        }
        if T::from_storage(storage)? != variant {
            return Err(diverged(format!(
                "storage value {storage:?} is shared by several variants"
            )));
        }

        let wire = variant.wire_value();
        if T::from_wire(wire)? != variant {
            return Err(diverged(format!(
                "wire value {wire} is shared by several variants"
            )));
        }
    }

    Ok(())
}
