//! Best-effort bulk attribute access.
//!
//! Reads and writes are processed one entry at a time, in input order.
//! The two directions treat failures differently:
//!
//! - [`get_many`](BulkAccess::get_many) drops every failing attribute and
//!   keeps going. The result carries no trace of what failed or why.
//! - [`set_many`](BulkAccess::set_many) drops only attributes the bridge does
//!   not know. Any other failure is returned at once and the remaining
//!   entries are not attempted; writes before it stay applied.

use sysmx_common::Attribute;

use crate::attribute::AttributeBridge;
use crate::error::Result;

/// Bulk get/set on top of [`AttributeBridge`].
pub trait BulkAccess {
    /// Read each named attribute, returning the ones that could be read.
    fn get_many(&self, names: &[&str]) -> Vec<Attribute>;

    /// Write each attribute, returning the ones that were applied.
    fn set_many(&self, attributes: Vec<Attribute>) -> Result<Vec<Attribute>>;

    /// Read the bridge's whole namespace.
    fn get_all(&self) -> Vec<Attribute>;
}

impl<B: AttributeBridge + ?Sized> BulkAccess for B {
    fn get_many(&self, names: &[&str]) -> Vec<Attribute> {
        names
            .iter()
            .filter_map(|name| {
                self.get_attribute(name)
                    .ok()
                    .map(|value| Attribute::new(*name, value))
            })
            .collect()
    }

    fn set_many(&self, attributes: Vec<Attribute>) -> Result<Vec<Attribute>> {
        let mut applied = Vec::with_capacity(attributes.len());

        for attribute in attributes {
            match self.set_attribute(&attribute) {
                Ok(()) => applied.push(attribute),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(applied)
    }

    fn get_all(&self) -> Vec<Attribute> {
        self.get_many(self.attribute_names())
    }
}
