//! The bindable record abstraction
//!
//! A [`Specification`] hands the binder a table of its settable fields. The
//! derive macro generates that table for structs; every other type reports
//! itself as [`Shape::Other`] so the binder can reject it at runtime.

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::Error;

/// Static metadata for one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: &'static str,
    /// Declared field type
    pub type_name: &'static str,
    /// Alternate lookup name from `#[envconfig(name = "...")]`
    pub alt: Option<&'static str>,
    /// Default literal from `#[envconfig(default = "...")]`
    pub default: Option<&'static str>,
    /// Set by `#[envconfig(required)]`
    pub required: bool,
}

impl FieldDescriptor {
    /// Name used to build the lookup key: the alternate name if present.
    pub fn lookup_name(&self) -> &'static str {
        self.alt.unwrap_or(self.name)
    }

    /// Primary key: `UPPERCASE(prefix + "_" + lookup_name)`.
    pub fn key(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.lookup_name()).to_uppercase()
    }

    /// Unprefixed key tried when the primary key is unset.
    ///
    /// Only fields with an alternate name have one.
    pub fn fallback_key(&self) -> Option<String> {
        self.alt.map(str::to_uppercase)
    }

    /// Default literal, treating an empty string as no default.
    pub fn default_value(&self) -> Option<&'static str> {
        self.default.filter(|value| !value.is_empty())
    }
}

/// Mutable reference to a field, tagged with the field's kind.
#[derive(Debug)]
pub enum Slot<'a> {
    String(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    Bool(&'a mut bool),
    F32(&'a mut f32),
    F64(&'a mut f64),
    /// Parsed from a duration expression such as `1h30m`. `Duration` is
    /// unsigned, so negative expressions fail to convert.
    Duration(&'a mut Duration),
    /// Field of a kind the binder does not convert; always left untouched.
    Unsupported,
}

macro_rules! impl_slot_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(value: &'a mut $ty) -> Self {
                    Slot::$variant(value)
                }
            }
        )*
    };
}

impl_slot_from! {
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    bool => Bool,
    f32 => F32,
    f64 => F64,
    Duration => Duration,
}

/// One settable field: its metadata and a slot to write into.
#[derive(Debug)]
pub struct Field<'a> {
    pub descriptor: FieldDescriptor,
    pub slot: Slot<'a>,
}

impl<'a> Field<'a> {
    pub fn new(descriptor: FieldDescriptor, slot: Slot<'a>) -> Self {
        Self { descriptor, slot }
    }
}

/// What a value looks like to the binder.
#[derive(Debug)]
pub enum Shape<'a> {
    /// A struct, with its settable fields in declaration order.
    Record(Vec<Field<'a>>),
    /// Anything else, identified by type name.
    Other(&'static str),
}

/// A value the binder can populate.
///
/// Implemented by `#[derive(Envconfig)]` for structs with named fields.
/// Primitives, strings and collections implement it as [`Shape::Other`], so
/// passing one to [`process`](crate::process) is an
/// [`Error::InvalidSpecification`].
pub trait Specification {
    /// Expose the field table, or report that this is not a struct.
    fn shape(&mut self) -> Shape<'_>;

    /// Build a default value and bind it from the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`process`](crate::process).
    fn from_env(prefix: &str) -> Result<Self, Error>
    where
        Self: Default + Sized,
    {
        let mut spec = Self::default();
        crate::process(prefix, &mut spec)?;
        Ok(spec)
    }
}

impl<T: Specification + ?Sized> Specification for Box<T> {
    fn shape(&mut self) -> Shape<'_> {
        (**self).shape()
    }
}

macro_rules! impl_not_a_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Specification for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Other(type_name::<Self>())
                }
            }
        )*
    };
}

impl_not_a_record! {
    String, str, bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64, Duration,
}

impl<T> Specification for Option<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}

impl<T> Specification for Vec<T> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}

impl<T> Specification for [T] {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}

impl<T, const N: usize> Specification for [T; N] {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}

impl<K, V, S> Specification for HashMap<K, V, S> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}

impl<K, V> Specification for BTreeMap<K, V> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Other(type_name::<Self>())
    }
}
