#![doc = include_str!("README.md")]

mod error;
mod member;
mod registry;
mod value;

pub use error::{Error, Key, Result};
pub use member::{Declaration, Member};
pub use registry::is_analyzed;
pub use value::Value;

/// Attribute macro to implement [`RichEnum`] from the `pub const` items of an inherent
/// impl block.
///
/// ```
/// # use rich_enum::{rich_enum, RichEnum};
/// pub struct TestEnum;
///
/// #[rich_enum]
/// impl TestEnum {
///     #[description("Integer")]
///     pub const INTEGER: i64 = 1;
///     #[description = "Text"]
///     pub const STRING: &'static str = "string";
/// }
///
/// assert_eq!(TestEnum::by_value(TestEnum::INTEGER).unwrap().name(), "INTEGER");
/// assert_eq!(TestEnum::by_name("STRING").unwrap().description(), "Text");
/// ```
///
/// Only `pub` constants become members, in declaration order. Their types must convert
/// into [`Value`].
///
/// # Supported annotations
///
/// - `#[rich_enum([path])]` ... specify path to the crate, defaults to `::rich_enum`
/// - `#[description("...")]` or `#[description = "..."]` on a constant ... description of
///    the member, defaults to its name.
pub use rich_enum_macro::rich_enum;

/// A type whose members are a fixed set of named scalar constants.
///
/// Usually implemented by [`#[rich_enum]`](rich_enum). Every provided method analyzes
/// the type on first use and answers from the cached indexes afterwards.
pub trait RichEnum: Sized + 'static {
    /// Declared members in declaration order.
    ///
    /// Called under the registry lock, so it must not query any rich enum itself.
    fn declarations() -> Vec<Declaration>;

    /// Run discovery unless the type is already analyzed.
    fn ensure_analyzed() -> Result<()> {
        registry::analyze::<Self>().map(drop)
    }

    /// Member declared with `value`.
    fn by_value(value: impl Into<Value>) -> Result<&'static Member<Self>> {
        registry::by_value(value.into())
    }

    /// Member declared as `name`.
    fn by_name(name: &str) -> Result<&'static Member<Self>> {
        registry::by_name(name)
    }

    /// Same as [`RichEnum::by_name()`], for identifiers known only at runtime.
    fn by_dynamic_name(ident: &str) -> Result<&'static Member<Self>> {
        Self::by_name(ident)
    }

    /// Distinct declared values, in the order they were first declared.
    fn values() -> Result<Vec<&'static Value>> {
        registry::values::<Self>()
    }

    /// Declared names, in declaration order.
    fn names() -> Result<Vec<&'static str>> {
        registry::names::<Self>()
    }

    /// All members, in declaration order.
    fn all() -> Result<Vec<&'static Member<Self>>> {
        registry::all::<Self>()
    }

    /// Whether a member is declared with `value`. Only a failed discovery is an `Err`.
    fn has_value(value: impl Into<Value>) -> Result<bool> {
        registry::has_value::<Self>(&value.into())
    }

    /// Whether a member is declared as `name`. Only a failed discovery is an `Err`.
    fn has_name(name: &str) -> Result<bool> {
        registry::has_name::<Self>(name)
    }
}
