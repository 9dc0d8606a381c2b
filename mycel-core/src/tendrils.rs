//! An insertion-ordered mapping from port name to [`Tendril`].

use crate::error::{Error, Result};
use crate::tendril::Tendril;
use crate::types::TypeDesc;
use indexmap::IndexMap;

/// The parameter, input, or output collection of a cell.
///
/// Iteration order is declaration order. Declaring the same name twice with
/// the same element type is idempotent; with a different type it is an error.
#[derive(Debug, Clone, Default)]
pub struct Tendrils {
    map: IndexMap<String, Tendril>,
}

impl Tendrils {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a tendril of concrete type `T`, or verify an existing
    /// declaration.
    ///
    /// Returns the (new or pre-existing) tendril for further configuration.
    pub fn declare<T: Clone + Send + Sync + 'static>(
        &mut self,
        name: &str,
        doc: &str,
    ) -> Result<&mut Tendril> {
        self.declare_tendril(name, Tendril::typed::<T>(doc))
    }

    /// Declare a tendril accepting any element type.
    pub fn declare_dynamic(&mut self, name: &str, doc: &str) -> Result<&mut Tendril> {
        self.declare_tendril(name, Tendril::dynamic(doc))
    }

    /// Declare with an explicit [`Tendril`], e.g. one built with defaults.
    pub fn declare_tendril(&mut self, name: &str, mut tendril: Tendril) -> Result<&mut Tendril> {
        if name.is_empty() {
            return Err(Error::InvalidName {
                name: name.to_string(),
            });
        }
        if let Some(existing) = self.map.get(name) {
            if existing.desc() != tendril.desc() {
                return Err(Error::TypeMismatch {
                    name: name.to_string(),
                    expected: existing.desc().name().to_string(),
                    actual: tendril.desc().name().to_string(),
                });
            }
            // Idempotent redeclaration keeps the original slot and its value.
            return Ok(self.map.get_mut(name).unwrap_or_else(|| unreachable!()));
        }
        tendril.set_name(name);
        Ok(self.map.entry(name.to_string()).or_insert(tendril))
    }

    /// Look up a tendril by name.
    pub fn get(&self, name: &str) -> Result<&Tendril> {
        self.map.get(name).ok_or_else(|| Error::UnknownPort {
            cell: String::new(),
            port: name.to_string(),
        })
    }

    /// Look up a tendril mutably by name.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Tendril> {
        self.map.get_mut(name).ok_or_else(|| Error::UnknownPort {
            cell: String::new(),
            port: name.to_string(),
        })
    }

    /// Typed read of a named tendril's value.
    pub fn read<T: 'static>(&self, name: &str) -> Result<&T> {
        self.get(name)?.get::<T>()
    }

    /// Typed write to a named tendril.
    pub fn write<T: Clone + Send + Sync + 'static>(&mut self, name: &str, value: T) -> Result<()> {
        self.get_mut(name)?.set(value)
    }

    /// The declared element type of a named tendril.
    pub fn desc(&self, name: &str) -> Result<TypeDesc> {
        Ok(self.get(name)?.desc())
    }

    /// Whether a tendril with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of declared tendrils.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tendril)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate mutably in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Tendril)> {
        self.map.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_preserved() {
        let mut t = Tendrils::new();
        t.declare::<i64>("zebra", "").unwrap();
        t.declare::<i64>("apple", "").unwrap();
        t.declare::<i64>("mango", "").unwrap();
        let names: Vec<_> = t.names().collect();
        assert_eq!(names, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn redeclare_same_type_is_idempotent() {
        let mut t = Tendrils::new();
        t.declare::<i64>("n", "first").unwrap().set(5i64).unwrap();
        t.declare::<i64>("n", "second").unwrap();
        assert_eq!(t.len(), 1);
        // The original slot, and its value, survive.
        assert_eq!(*t.read::<i64>("n").unwrap(), 5);
        assert_eq!(t.get("n").unwrap().doc(), "first");
    }

    #[test]
    fn redeclare_different_type_fails() {
        let mut t = Tendrils::new();
        t.declare::<i64>("n", "").unwrap();
        let err = t.declare::<String>("n", "").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut t = Tendrils::new();
        assert!(matches!(
            t.declare::<i64>("", ""),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn unknown_lookup_fails() {
        let t = Tendrils::new();
        assert!(matches!(t.get("ghost"), Err(Error::UnknownPort { .. })));
    }

    #[test]
    fn typed_read_write_through_collection() {
        let mut t = Tendrils::new();
        t.declare::<String>("greeting", "").unwrap();
        t.write("greeting", String::from("hello")).unwrap();
        assert_eq!(t.read::<String>("greeting").unwrap(), "hello");
    }
}
