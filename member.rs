use core::fmt;
use core::marker::PhantomData;

use crate::{Error, Result, RichEnum, Value};

/// One declared constant, as produced by [`RichEnum::declarations()`].
///
/// ```
/// # use rich_enum::{Declaration, Value};
/// let decl = Declaration::new("INTEGER", 1).with_description("Integer");
/// assert_eq!(decl.name(), "INTEGER");
/// assert_eq!(decl.value(), &Value::Int(1));
/// assert_eq!(decl.description(), Some("Integer"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    name: &'static str,
    value: Value,
    description: Option<&'static str>,
}

impl Declaration {
    pub fn new(name: &'static str, value: impl Into<Value>) -> Self {
        Self {
            name,
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn description(&self) -> Option<&'static str> {
        self.description
    }
}

/// A member of the rich enum `E`.
///
/// Members are created once by the registry and handed out as `&'static Member<E>`.
/// They cannot be cloned:
///
/// ```compile_fail
/// # use rich_enum::{rich_enum, Member, RichEnum};
/// pub struct Level;
///
/// #[rich_enum]
/// impl Level {
///     pub const LOW: i64 = 0;
/// }
///
/// let low = Level::by_name("LOW").unwrap();
/// let copy = Member::clone(low);
/// ```
pub struct Member<E> {
    value: Value,
    name: &'static str,
    description: &'static str,
    _enum: PhantomData<fn() -> E>,
}

impl<E> Member<E> {
    pub(crate) fn new(declaration: Declaration) -> Self {
        let Declaration {
            name,
            value,
            description,
        } = declaration;
        Self {
            value,
            name,
            description: description.unwrap_or(name),
            _enum: PhantomData,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human readable text of the member, or its name when none was declared.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl<E: RichEnum> Member<E> {
    /// Resolve the cached member for a serialized `value` field.
    pub fn restore(value: Option<Value>) -> Result<&'static Self> {
        let value = value.ok_or(Error::MalformedData {
            enum_name: core::any::type_name::<E>(),
            field: "value",
        })?;
        E::by_value(value)
    }
}

impl<E> fmt::Display for Member<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl<E> fmt::Debug for Member<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("value", &self.value)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

impl<E> PartialEq for Member<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.name == other.name
            && self.description == other.description
    }
}

impl<E> Eq for Member<E> {}

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;
    use core::marker::PhantomData;

    use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeStruct, Serializer};

    use super::Member;
    use crate::{RichEnum, Value};

    impl<E> Serialize for Member<E> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Member", 1)?;
            state.serialize_field("value", &self.value)?;
            state.end()
        }
    }

    impl<'de, E: RichEnum> Deserialize<'de> for &'static Member<E> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_struct("Member", &["value"], MemberVisitor(PhantomData))
        }
    }

    struct MemberVisitor<E>(PhantomData<fn() -> E>);

    impl<'de, E: RichEnum> Visitor<'de> for MemberVisitor<E> {
        type Value = &'static Member<E>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a serialized member of {}", core::any::type_name::<E>())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut value: Option<Value> = None;
            while let Some(key) = map.next_key::<String>()? {
                if key == "value" {
                    if value.is_some() {
                        return Err(de::Error::duplicate_field("value"));
                    }
                    value = Some(map.next_value()?);
                } else {
                    map.next_value::<IgnoredAny>()?;
                }
            }
            Member::restore(value).map_err(de::Error::custom)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let value: Option<Value> = seq.next_element()?;
            Member::restore(value).map_err(de::Error::custom)
        }
    }
}
