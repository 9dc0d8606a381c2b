//! A single typed value slot: an input port, an output port, or a parameter.

use crate::error::{Error, Result};
use crate::types::{Datum, TypeDesc};

/// The unit of type agreement between a producer and a consumer.
///
/// A tendril holds at most one current value and an optional default, and
/// remembers its declared element type forever. Two ports may be connected
/// iff their declared types are compatible.
#[derive(Debug, Clone)]
pub struct Tendril {
    name: String,
    desc: TypeDesc,
    value: Option<Datum>,
    default: Option<Datum>,
    doc: String,
    required: bool,
    user_supplied: bool,
    dirty: bool,
}

impl Tendril {
    /// A tendril of a concrete element type.
    #[must_use]
    pub fn typed<T: Clone + Send + Sync + 'static>(doc: impl Into<String>) -> Self {
        Self::with_desc(TypeDesc::of::<T>(), doc)
    }

    /// A tendril that accepts any element type.
    #[must_use]
    pub fn dynamic(doc: impl Into<String>) -> Self {
        Self::with_desc(TypeDesc::dynamic(), doc)
    }

    fn with_desc(desc: TypeDesc, doc: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            desc,
            value: None,
            default: None,
            doc: doc.into(),
            required: false,
            user_supplied: false,
            dirty: false,
        }
    }

    /// Attach a default value, returned by reads until a real value arrives.
    #[must_use]
    pub fn with_default<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        debug_assert!(self.desc.compatible(&TypeDesc::of::<T>()));
        self.default = Some(Datum::new(value));
        self
    }

    /// Mark the tendril as required (checked by `Plasm::check` for ports and
    /// by `configure` dispatch for parameters).
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The name this tendril was declared under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared element type.
    #[must_use]
    pub fn desc(&self) -> TypeDesc {
        self.desc
    }

    /// The documentation string.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Whether this tendril must be connected (port) or set (parameter).
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether a value was explicitly supplied by the embedder.
    #[must_use]
    pub fn is_user_supplied(&self) -> bool {
        self.user_supplied
    }

    /// Whether the tendril has been written since the last [`clear_dirty`].
    ///
    /// [`clear_dirty`]: Tendril::clear_dirty
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the write marker. Called by the consumer after a read.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether a read would succeed.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some() || self.default.is_some()
    }

    fn type_mismatch(&self, actual: TypeDesc) -> Error {
        Error::TypeMismatch {
            name: self.name.clone(),
            expected: self.desc.name().to_string(),
            actual: actual.name().to_string(),
        }
    }

    /// Typed read: the current value, or the default.
    pub fn get<T: 'static>(&self) -> Result<&T> {
        let datum = self.datum()?;
        datum
            .downcast_ref::<T>()
            .ok_or_else(|| self.type_mismatch(datum.desc()))
    }

    /// Typed write from the embedder. Marks the tendril dirty and
    /// user-supplied.
    pub fn set<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Result<()> {
        self.write(Datum::new(value))?;
        self.user_supplied = true;
        Ok(())
    }

    /// Runtime-typed read: the current (or default) datum.
    pub fn datum(&self) -> Result<&Datum> {
        self.value
            .as_ref()
            .or(self.default.as_ref())
            .ok_or_else(|| Error::NotSet {
                name: self.name.clone(),
            })
    }

    /// Runtime-typed write. Marks the tendril dirty; used by the scheduler
    /// when binding edge heads, so does not mark user-supplied.
    pub fn write(&mut self, datum: Datum) -> Result<()> {
        if !self.desc.compatible(&datum.desc()) {
            return Err(self.type_mismatch(datum.desc()));
        }
        self.value = Some(datum);
        self.dirty = true;
        Ok(())
    }

    /// Runtime-typed write on behalf of the embedder (topology load,
    /// scripting hosts): like [`set`] but starting from a datum.
    ///
    /// [`set`]: Tendril::set
    pub fn assign(&mut self, datum: Datum) -> Result<()> {
        self.write(datum)?;
        self.user_supplied = true;
        Ok(())
    }

    /// Clone the current (or default) value for transport over an edge.
    pub fn sample(&self) -> Result<Datum> {
        self.datum().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_falls_back_to_default() {
        let t = Tendril::typed::<i64>("count").with_default(7i64);
        assert_eq!(*t.get::<i64>().unwrap(), 7);
    }

    #[test]
    fn get_without_value_or_default_fails() {
        let t = Tendril::typed::<i64>("count");
        assert!(matches!(t.get::<i64>(), Err(Error::NotSet { .. })));
    }

    #[test]
    fn set_overrides_default_and_marks_flags() {
        let mut t = Tendril::typed::<i64>("count").with_default(7i64);
        assert!(!t.dirty());
        t.set(9i64).unwrap();
        assert_eq!(*t.get::<i64>().unwrap(), 9);
        assert!(t.dirty());
        assert!(t.is_user_supplied());
        t.clear_dirty();
        assert!(!t.dirty());
        assert!(t.is_user_supplied());
    }

    #[test]
    fn set_wrong_type_fails() {
        let mut t = Tendril::typed::<i64>("count");
        let err = t.set(1.5f64).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn scheduler_write_is_not_user_supplied() {
        let mut t = Tendril::typed::<i64>("in");
        t.write(Datum::new(3i64)).unwrap();
        assert!(t.dirty());
        assert!(!t.is_user_supplied());
    }

    #[test]
    fn dynamic_tendril_accepts_any_type() {
        let mut t = Tendril::dynamic("anything");
        t.set(1i64).unwrap();
        assert_eq!(*t.get::<i64>().unwrap(), 1);
        t.set(String::from("now a string")).unwrap();
        assert_eq!(t.get::<String>().unwrap(), "now a string");
        assert!(matches!(t.get::<i64>(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn sample_clones_the_value() {
        let mut t = Tendril::typed::<Vec<i64>>("batch");
        t.set(vec![1i64, 2, 3]).unwrap();
        let d = t.sample().unwrap();
        assert_eq!(d.downcast_ref::<Vec<i64>>(), Some(&vec![1, 2, 3]));
    }
}
