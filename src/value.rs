//! Value formatting for the reporting macros.
//!
//! The expansion calls `(&Value(&expr)).format_value()`. Method resolution
//! picks [`DebugValue`] when the type implements `Debug`, and otherwise falls
//! back through one more auto-reference to [`OpaqueValue`].

use std::{any::type_name, fmt::Debug};

pub struct Value<'a, T: ?Sized>(pub &'a T);

pub trait DebugValue {
    fn format_value(&self) -> String;
}

impl<T: Debug + ?Sized> DebugValue for Value<'_, T> {
    fn format_value(&self) -> String {
        format!("{:?}", self.0)
    }
}

pub trait OpaqueValue {
    fn format_value(&self) -> String;
}

impl<T: ?Sized> OpaqueValue for &Value<'_, T> {
    fn format_value(&self) -> String {
        format!("<{}>", type_name::<T>())
    }
}
