//! The witness codec.
//!
//! Witnesses are opaque bytes to the chain. Scripts following the `WitnessArgs` convention store
//! up to three optional fields in a molecule table: an offset header locating `lock`,
//! `input_type` and `output_type`, in this order. An absent field is encoded as `None`, which is
//! different from an empty byte string.
//!
//! Custom lock scripts often put small integers into the `lock` field. [`pack_int`] and
//! [`unpack_int`] encode them in fixed width, little endian, two's complement for signed types.

use ckb_assembler_error::{Error, ErrorKind};
use ckb_types::{bytes::Bytes, packed::WitnessArgs, prelude::*};
use std::fmt;
use thiserror::Error;

/// Errors raised by the witness codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    /// The bytes are not a valid `WitnessArgs` table.
    #[error("malformed WitnessArgs: {0}")]
    Malformed(String),

    /// The bytes do not have the width of the requested integer.
    #[error("expect {expected} bytes for a fixed-width integer, got {actual}")]
    IntegerLength {
        /// The width of the integer type.
        expected: usize,
        /// The length of the given bytes.
        actual: usize,
    },
}

impl From<WitnessError> for Error {
    fn from(error: WitnessError) -> Self {
        ErrorKind::Witness.because(error)
    }
}

/// A field of the `WitnessArgs` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WitnessField {
    /// Consumed by the lock script.
    Lock,
    /// Consumed by the type script of the input cell.
    InputType,
    /// Consumed by the type script of the output cell.
    OutputType,
}

impl fmt::Display for WitnessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WitnessField::Lock => write!(f, "lock"),
            WitnessField::InputType => write!(f, "input_type"),
            WitnessField::OutputType => write!(f, "output_type"),
        }
    }
}

/// The `WitnessArgs` fields as plain bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessEnvelope {
    /// The `lock` field.
    pub lock: Option<Bytes>,
    /// The `input_type` field.
    pub input_type: Option<Bytes>,
    /// The `output_type` field.
    pub output_type: Option<Bytes>,
}

impl WitnessEnvelope {
    /// Creates an envelope with only the lock field set.
    pub fn with_lock(lock: Bytes) -> Self {
        WitnessEnvelope {
            lock: Some(lock),
            ..Default::default()
        }
    }

    /// Serializes the envelope into the `WitnessArgs` layout.
    pub fn pack(&self) -> Bytes {
        WitnessArgs::from(self).as_bytes()
    }

    /// Parses a `WitnessArgs` table.
    ///
    /// The molecule verification is strict, trailing fields or broken offsets are rejected.
    pub fn unpack(raw: &[u8]) -> Result<Self, WitnessError> {
        WitnessArgs::from_slice(raw)
            .map(Into::into)
            .map_err(|err| WitnessError::Malformed(err.to_string()))
    }

    /// Parses a witness which may still be empty.
    ///
    /// A transaction builder appends empty witnesses for new inputs, they are treated as an
    /// envelope without any field.
    pub fn unpack_or_default(raw: &[u8]) -> Result<Self, WitnessError> {
        if raw.is_empty() {
            Ok(Self::default())
        } else {
            Self::unpack(raw)
        }
    }

    /// Returns a field.
    pub fn field(&self, field: WitnessField) -> Option<&Bytes> {
        match field {
            WitnessField::Lock => self.lock.as_ref(),
            WitnessField::InputType => self.input_type.as_ref(),
            WitnessField::OutputType => self.output_type.as_ref(),
        }
    }

    /// Replaces a field.
    pub fn set_field(&mut self, field: WitnessField, value: Option<Bytes>) {
        match field {
            WitnessField::Lock => self.lock = value,
            WitnessField::InputType => self.input_type = value,
            WitnessField::OutputType => self.output_type = value,
        }
    }
}

impl From<&WitnessEnvelope> for WitnessArgs {
    fn from(envelope: &WitnessEnvelope) -> Self {
        WitnessArgs::new_builder()
            .lock(envelope.lock.clone().pack())
            .input_type(envelope.input_type.clone().pack())
            .output_type(envelope.output_type.clone().pack())
            .build()
    }
}

impl From<WitnessArgs> for WitnessEnvelope {
    fn from(args: WitnessArgs) -> Self {
        WitnessEnvelope {
            lock: args.lock().to_opt().map(|bytes| bytes.raw_data()),
            input_type: args.input_type().to_opt().map(|bytes| bytes.raw_data()),
            output_type: args.output_type().to_opt().map(|bytes| bytes.raw_data()),
        }
    }
}

/// Sets one field of a serialized witness and returns the new serialization.
///
/// An empty witness is upgraded to a `WitnessArgs` table. Other fields are kept untouched.
pub fn update_field(raw: &[u8], field: WitnessField, value: Bytes) -> Result<Bytes, WitnessError> {
    let mut envelope = WitnessEnvelope::unpack_or_default(raw)?;
    envelope.set_field(field, Some(value));
    Ok(envelope.pack())
}

/// Integers stored in witnesses with a fixed width in little endian.
///
/// Signed integers use two's complement, which is what `to_le_bytes` produces.
pub trait LeInteger: Sized + Copy {
    /// The encoded width in bytes.
    const WIDTH: usize;

    /// Encodes the integer.
    fn to_le_vec(self) -> Vec<u8>;

    /// Decodes the integer, `None` if `bytes` is not exactly `WIDTH` long.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_le_integer {
    ($($type:ty),*) => {
        $(
            impl LeInteger for $type {
                const WIDTH: usize = ::std::mem::size_of::<$type>();

                fn to_le_vec(self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }

                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    let array: [u8; ::std::mem::size_of::<$type>()] = bytes.try_into().ok()?;
                    Some(<$type>::from_le_bytes(array))
                }
            }
        )*
    };
}

impl_le_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

/// Encodes an integer in fixed width little endian.
pub fn pack_int<T: LeInteger>(value: T) -> Bytes {
    Bytes::from(value.to_le_vec())
}

/// Decodes an integer encoded by [`pack_int`].
pub fn unpack_int<T: LeInteger>(bytes: &[u8]) -> Result<T, WitnessError> {
    T::from_le_slice(bytes).ok_or(WitnessError::IntegerLength {
        expected: T::WIDTH,
        actual: bytes.len(),
    })
}
