//! # Type Validation
//!
//! Pure predicates used at the boundary with the remote data service.
//!
//! Handles built by this crate ([`DataClient`](crate::model::DataClient),
//! [`Collection`](crate::model::Collection), [`EntityPage`](crate::model::EntityPage))
//! are nominal types, so most call sites never need a runtime shape check. The
//! predicates here cover what is left: JSON payloads and descriptors that arrive
//! from the collaborator, and plain `&str` arguments.
//!
//! ## Classification
//!
//! [`classify`] maps any [`Classify`] value to a [`TypeTag`]. It distinguishes
//! [`TypeTag::Null`] (an explicit JSON `null`) from [`TypeTag::Undefined`] (an
//! absent value, i.e. `None`), and [`TypeTag::Array`] from [`TypeTag::Object`].
//!
//! ```rust
//! use persistence_api::validation::{classify, is_number, is_string, TypeTag};
//! use serde_json::json;
//!
//! assert_eq!(classify(&json!([])), TypeTag::Array);
//! assert_eq!(classify(&None::<serde_json::Value>), TypeTag::Undefined);
//! assert!(is_string("customers"));
//! assert!(!is_number(&json!("21")));
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::time::SystemTime;

use crate::sdk::RemoteError;

/// Fields every data client descriptor must expose.
pub const DATA_CLIENT_FIELDS: [&str; 5] =
    ["monitoringEnabled", "monitor", "orgName", "appName", "URI"];

/// The kind of a value, as seen by the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Date,
    Error,
    Function,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Undefined => "Undefined",
            TypeTag::Null => "Null",
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Array => "Array",
            TypeTag::Object => "Object",
            TypeTag::Date => "Date",
            TypeTag::Error => "Error",
            TypeTag::Function => "Function",
        };
        f.write_str(name)
    }
}

/// Values that can report their own [`TypeTag`].
pub trait Classify {
    fn type_tag(&self) -> TypeTag;
}

impl Classify for Value {
    fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }
}

impl Classify for Map<String, Value> {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Object
    }
}

impl<T: Classify> Classify for Option<T> {
    fn type_tag(&self) -> TypeTag {
        match self {
            Some(value) => value.type_tag(),
            None => TypeTag::Undefined,
        }
    }
}

impl<T: Classify + ?Sized> Classify for &T {
    fn type_tag(&self) -> TypeTag {
        (**self).type_tag()
    }
}

impl Classify for str {
    fn type_tag(&self) -> TypeTag {
        TypeTag::String
    }
}

impl Classify for String {
    fn type_tag(&self) -> TypeTag {
        TypeTag::String
    }
}

impl Classify for bool {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Boolean
    }
}

macro_rules! classify_as_number {
    ($($ty:ty),*) => {
        $(
            impl Classify for $ty {
                fn type_tag(&self) -> TypeTag {
                    TypeTag::Number
                }
            }
        )*
    };
}

classify_as_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> Classify for [T] {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Array
    }
}

impl<T> Classify for Vec<T> {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Array
    }
}

impl Classify for SystemTime {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Date
    }
}

impl Classify for RemoteError {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Error
    }
}

impl Classify for dyn std::error::Error + Send + Sync {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Error
    }
}

impl<R> Classify for fn() -> R {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Function
    }
}

impl<A, R> Classify for fn(A) -> R {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Function
    }
}

impl<A, B, R> Classify for fn(A, B) -> R {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Function
    }
}

/// Returns the [`TypeTag`] of `value`.
pub fn classify<T: Classify + ?Sized>(value: &T) -> TypeTag {
    value.type_tag()
}

pub fn is_string<T: Classify + ?Sized>(value: &T) -> bool {
    classify(value) == TypeTag::String
}

pub fn is_number<T: Classify + ?Sized>(value: &T) -> bool {
    classify(value) == TypeTag::Number
}

pub fn is_function<T: Classify + ?Sized>(value: &T) -> bool {
    classify(value) == TypeTag::Function
}

/// A name argument (organization, application, entity type, credential) is
/// usable when it contains something other than whitespace.
pub fn is_valid_name(value: &str) -> bool {
    !value.trim().is_empty()
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True when `value` exposes every field of [`DATA_CLIENT_FIELDS`].
///
/// Shape check only: field values are not inspected.
pub fn is_data_client(value: &Value) -> bool {
    match value.as_object() {
        Some(fields) => DATA_CLIENT_FIELDS.iter().all(|field| fields.contains_key(*field)),
        None => false,
    }
}

/// True when `value` has a `_client` that passes [`is_data_client`], plus `_type` and `qs`.
pub fn is_collection(value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };
    fields.get("_client").is_some_and(is_data_client)
        && fields.contains_key("_type")
        && fields.contains_key("qs")
}

/// True when `value` is truthy and carries an `entities` array.
pub fn is_entity_page(value: &Value) -> bool {
    is_truthy(value)
        && value
            .get("entities")
            .is_some_and(|entities| is_truthy(entities) && classify(entities) == TypeTag::Array)
}
