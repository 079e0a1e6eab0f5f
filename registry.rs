//! Process-wide cache of analyzed enum types.
//!
//! A type moves from unanalyzed to analyzed on its first query. Discovery runs under
//! the write lock, so a table is built at most once. A type that declares no members
//! is never cached and is discovered again on every query.

use core::any::{type_name, Any, TypeId};
use std::sync::OnceLock;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Error, Key, Member, Result, RichEnum, Value};

type Tables = FxHashMap<TypeId, &'static (dyn Any + Send + Sync)>;

fn tables() -> &'static RwLock<Tables> {
    static TABLES: OnceLock<RwLock<Tables>> = OnceLock::new();
    TABLES.get_or_init(Default::default)
}

/// Name and value indexes of one enum type.
pub(crate) struct Table<E> {
    by_name: IndexMap<&'static str, Member<E>>,
    by_value: IndexMap<Value, usize>,
}

impl<E: RichEnum> Table<E> {
    fn discover() -> Result<Self> {
        let mut by_name = IndexMap::new();
        let mut by_value = IndexMap::new();
        let mut seen = FxHashSet::default();
        for declaration in E::declarations() {
            let name = declaration.name();
            if name.is_empty() {
                return Err(discovery_error::<E>("member with an empty name".to_owned()));
            }
            if !seen.insert(name) {
                return Err(discovery_error::<E>(format!("member `{name}` declared twice")));
            }
            let (index, _) = by_name.insert_full(name, Member::new(declaration));
            // a repeated value keeps its first position but points at the later member
            by_value.insert(by_name[index].value().clone(), index);
        }
        Ok(Self { by_name, by_value })
    }

    fn member_by_value(&self, value: &Value) -> Option<&Member<E>> {
        let index = *self.by_value.get(value)?;
        self.by_name.get_index(index).map(|(_, member)| member)
    }
}

fn discovery_error<E>(reason: String) -> Error {
    Error::Discovery {
        enum_name: type_name::<E>(),
        reason,
    }
}

fn cached<E: RichEnum>(tables: &Tables) -> Option<&'static Table<E>> {
    let table: &'static (dyn Any + Send + Sync) = *tables.get(&TypeId::of::<E>())?;
    table.downcast_ref()
}

/// Analyze `E` if needed.
///
/// Returns `None` when `E` declares no members; such a type stays unanalyzed.
pub(crate) fn analyze<E: RichEnum>() -> Result<Option<&'static Table<E>>> {
    if let Some(table) = cached::<E>(&tables().read()) {
        return Ok(Some(table));
    }
    let mut tables = tables().write();
    if let Some(table) = cached::<E>(&tables) {
        return Ok(Some(table));
    }
    let table = Table::<E>::discover()?;
    if table.by_name.is_empty() {
        tracing::trace!(enum_name = type_name::<E>(), "no members declared, left unanalyzed");
        return Ok(None);
    }
    tracing::debug!(
        enum_name = type_name::<E>(),
        members = table.by_name.len(),
        values = table.by_value.len(),
        "analyzed rich enum"
    );
    let table: &'static Table<E> = Box::leak(Box::new(table));
    tables.insert(TypeId::of::<E>(), table);
    Ok(Some(table))
}

/// Whether `E` has been analyzed and its indexes are cached.
///
/// ```
/// # use rich_enum::{rich_enum, is_analyzed, RichEnum};
/// pub struct Color;
///
/// #[rich_enum]
/// impl Color {
///     pub const RED: &'static str = "red";
/// }
///
/// assert!(!is_analyzed::<Color>());
/// Color::ensure_analyzed().unwrap();
/// assert!(is_analyzed::<Color>());
/// ```
pub fn is_analyzed<E: RichEnum>() -> bool {
    cached::<E>(&tables().read()).is_some()
}

pub(crate) fn by_value<E: RichEnum>(value: Value) -> Result<&'static Member<E>> {
    analyze::<E>()?
        .and_then(|table| table.member_by_value(&value))
        .ok_or(Error::NotFound {
            enum_name: type_name::<E>(),
            key: Key::Value(value),
        })
}

pub(crate) fn by_name<E: RichEnum>(name: &str) -> Result<&'static Member<E>> {
    analyze::<E>()?
        .and_then(|table| table.by_name.get(name))
        .ok_or_else(|| Error::NotFound {
            enum_name: type_name::<E>(),
            key: Key::Name(name.to_owned()),
        })
}

pub(crate) fn values<E: RichEnum>() -> Result<Vec<&'static Value>> {
    Ok(analyze::<E>()?
        .map(|table| table.by_value.keys().collect())
        .unwrap_or_default())
}

pub(crate) fn names<E: RichEnum>() -> Result<Vec<&'static str>> {
    Ok(analyze::<E>()?
        .map(|table| table.by_name.keys().copied().collect())
        .unwrap_or_default())
}

pub(crate) fn all<E: RichEnum>() -> Result<Vec<&'static Member<E>>> {
    Ok(analyze::<E>()?
        .map(|table| table.by_name.values().collect())
        .unwrap_or_default())
}

pub(crate) fn has_value<E: RichEnum>(value: &Value) -> Result<bool> {
    Ok(analyze::<E>()?.is_some_and(|table| table.by_value.contains_key(value)))
}

pub(crate) fn has_name<E: RichEnum>(name: &str) -> Result<bool> {
    Ok(analyze::<E>()?.is_some_and(|table| table.by_name.contains_key(name)))
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{rich_enum, Declaration};

    static COUNTED_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl RichEnum for Counted {
        fn declarations() -> Vec<Declaration> {
            COUNTED_RUNS.fetch_add(1, Ordering::SeqCst);
            vec![Declaration::new("ONE", 1), Declaration::new("TWO", 2)]
        }
    }

    #[test]
    fn discovery_runs_once() {
        assert_eq!(Counted::names().unwrap(), ["ONE", "TWO"]);
        assert_eq!(Counted::by_value(2).unwrap().name(), "TWO");
        assert!(Counted::has_name("ONE").unwrap());
        assert_eq!(COUNTED_RUNS.load(Ordering::SeqCst), 1);
    }

    static RACED_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Raced;

    impl RichEnum for Raced {
        fn declarations() -> Vec<Declaration> {
            RACED_RUNS.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            vec![Declaration::new("ONLY", 1)]
        }
    }

    #[test]
    fn concurrent_first_access_discovers_once() {
        let num_threads = 16;
        let barrier = Arc::new(Barrier::new(num_threads));
        let handles = (0..num_threads)
            .map(|_| {
                let b = Arc::clone(&barrier);
                thread::spawn(move || {
                    b.wait();
                    Raced::by_name("ONLY").unwrap()
                })
            })
            .collect::<Vec<_>>();
        let members = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(RACED_RUNS.load(Ordering::SeqCst), 1);
        let canonical = Raced::by_value(1).unwrap();
        assert!(members.iter().all(|m| core::ptr::eq(*m, canonical)));
    }

    static EMPTY_RUNS: AtomicUsize = AtomicUsize::new(0);

    struct Empty;

    impl RichEnum for Empty {
        fn declarations() -> Vec<Declaration> {
            EMPTY_RUNS.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    #[test]
    fn empty_enum_is_rediscovered_on_every_query() {
        assert!(Empty::all().unwrap().is_empty());
        assert!(Empty::values().unwrap().is_empty());
        assert!(!Empty::has_name("ANY").unwrap());
        assert!(Empty::by_name("ANY").unwrap_err().is_not_found());
        assert!(!is_analyzed::<Empty>());
        assert_eq!(EMPTY_RUNS.load(Ordering::SeqCst), 4);
    }

    struct DuplicateName;

    impl RichEnum for DuplicateName {
        fn declarations() -> Vec<Declaration> {
            vec![Declaration::new("A", 1), Declaration::new("A", 2)]
        }
    }

    #[test]
    fn duplicate_name_fails_discovery() {
        let err = DuplicateName::ensure_analyzed().unwrap_err();
        assert!(matches!(err, Error::Discovery { .. }));
        assert!(err.to_string().ends_with("analyze failed: member `A` declared twice"));
        assert!(DuplicateName::has_value(1).is_err());
        assert!(!is_analyzed::<DuplicateName>());
    }

    struct Unnamed;

    impl RichEnum for Unnamed {
        fn declarations() -> Vec<Declaration> {
            vec![Declaration::new("", 1)]
        }
    }

    #[test]
    fn empty_name_fails_discovery() {
        assert!(matches!(Unnamed::by_value(1), Err(Error::Discovery { .. })));
    }

    pub struct Status;

    #[rich_enum(crate)]
    impl Status {
        pub const OPEN: i64 = 1;
        #[description("Reopened ticket")]
        pub const REOPENED: i64 = 1;
        pub const CLOSED: i64 = 2;
    }

    #[test]
    fn later_duplicate_value_wins_value_index() {
        assert_eq!(Status::by_value(1).unwrap().name(), "REOPENED");
        assert_eq!(Status::by_name("OPEN").unwrap().value(), &Value::Int(1));
        assert_eq!(Status::names().unwrap(), ["OPEN", "REOPENED", "CLOSED"]);
        assert_eq!(Status::values().unwrap(), [&Value::Int(1), &Value::Int(2)]);
        assert_eq!(Status::all().unwrap().len(), 3);
    }

    #[test]
    fn lookups_return_the_cached_instance() {
        let by_name = Status::by_name("CLOSED").unwrap();
        let by_value = Status::by_value(2).unwrap();
        assert!(core::ptr::eq(by_name, by_value));
        assert!(core::ptr::eq(by_name, Status::by_dynamic_name("CLOSED").unwrap()));
        assert!(is_analyzed::<Status>());
    }
}
