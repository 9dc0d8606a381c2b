//! Runtime type descriptors and type-erased transported values.
//!
//! Every tendril and edge is tagged with a [`TypeDesc`]; connections are
//! legal when the descriptors agree. A [`Datum`] is the unit of transport:
//! a boxed value together with its descriptor and a clone function, so that
//! one output can fan out to several edges without knowing the concrete type.

use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime descriptor of a tendril's element type.
///
/// Carries a hash of the native [`TypeId`] plus the human-readable type
/// name. The distinguished *dynamic* descriptor is compatible with every
/// concrete descriptor and is used by cells whose ports accept any type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    hash: u64,
    name: &'static str,
}

const DYNAMIC_NAME: &str = "<any>";

impl TypeDesc {
    /// Descriptor for a concrete Rust type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        let mut hasher = DefaultHasher::new();
        TypeId::of::<T>().hash(&mut hasher);
        Self {
            hash: hasher.finish(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The dynamic descriptor, compatible with any concrete type.
    #[must_use]
    pub const fn dynamic() -> Self {
        Self {
            hash: 0,
            name: DYNAMIC_NAME,
        }
    }

    /// Whether this is the dynamic descriptor.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.name == DYNAMIC_NAME
    }

    /// The type-id hash.
    #[must_use]
    pub const fn hash_value(&self) -> u64 {
        self.hash
    }

    /// The full Rust type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether two descriptors may be connected: identical, or either dynamic.
    #[must_use]
    pub fn compatible(&self, other: &Self) -> bool {
        self.is_dynamic() || other.is_dynamic() || self == other
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type CloneFn = fn(&(dyn Any + Send + Sync)) -> Box<dyn Any + Send + Sync>;

/// A type-erased, clonable value in flight between two ports.
pub struct Datum {
    value: Box<dyn Any + Send + Sync>,
    desc: TypeDesc,
    clone_fn: CloneFn,
}

fn clone_boxed<T: Clone + Send + Sync + 'static>(
    value: &(dyn Any + Send + Sync),
) -> Box<dyn Any + Send + Sync> {
    let value = value
        .downcast_ref::<T>()
        .expect("datum clone_fn invoked on foreign type");
    Box::new(value.clone())
}

impl Datum {
    /// Wrap a concrete value.
    pub fn new<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            desc: TypeDesc::of::<T>(),
            clone_fn: clone_boxed::<T>,
        }
    }

    /// The descriptor of the contained value.
    #[must_use]
    pub fn desc(&self) -> TypeDesc {
        self.desc
    }

    /// Whether the contained value is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the contained value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Consume the datum, recovering the concrete value.
    ///
    /// Returns `Err(self)` unchanged when the type does not match.
    pub fn downcast<T: 'static>(self) -> std::result::Result<T, Self> {
        if self.value.is::<T>() {
            Ok(*self
                .value
                .downcast::<T>()
                .unwrap_or_else(|_| unreachable!()))
        } else {
            Err(self)
        }
    }

    /// Borrow the raw erased value (for codec dispatch).
    #[must_use]
    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self.value.as_ref()
    }
}

impl Clone for Datum {
    fn clone(&self) -> Self {
        Self {
            value: (self.clone_fn)(self.value.as_ref()),
            desc: self.desc,
            clone_fn: self.clone_fn,
        }
    }
}

impl fmt::Debug for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datum").field("type", &self.desc.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desc_equality_by_type() {
        assert_eq!(TypeDesc::of::<i64>(), TypeDesc::of::<i64>());
        assert_ne!(TypeDesc::of::<i64>(), TypeDesc::of::<f64>());
        assert_ne!(TypeDesc::of::<String>(), TypeDesc::of::<&str>());
    }

    #[test]
    fn dynamic_compatibility() {
        let dynamic = TypeDesc::dynamic();
        let int = TypeDesc::of::<i64>();
        let float = TypeDesc::of::<f64>();

        assert!(dynamic.compatible(&int));
        assert!(int.compatible(&dynamic));
        assert!(dynamic.compatible(&dynamic));
        assert!(int.compatible(&int));
        assert!(!int.compatible(&float));
    }

    #[test]
    fn datum_roundtrip() {
        let d = Datum::new(42i64);
        assert!(d.is::<i64>());
        assert_eq!(d.downcast_ref::<i64>(), Some(&42));
        assert_eq!(d.desc(), TypeDesc::of::<i64>());
        assert_eq!(d.downcast::<i64>().unwrap(), 42);
    }

    #[test]
    fn datum_clone_is_deep() {
        let d = Datum::new(String::from("spore"));
        let c = d.clone();
        drop(d);
        assert_eq!(c.downcast_ref::<String>().map(String::as_str), Some("spore"));
    }

    #[test]
    fn datum_wrong_downcast_returns_self() {
        let d = Datum::new(1.5f64);
        let d = d.downcast::<i64>().unwrap_err();
        assert_eq!(d.downcast::<f64>().unwrap(), 1.5);
    }
}
