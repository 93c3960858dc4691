//! Custom tag schemas
//!
//! Baseline and GeoTIFF tags are known to the parser through constants.
//! Vendor tags such as GDAL's have to be registered explicitly before the
//! descriptor reader will trust them: the registry names each tag, fixes its
//! field type, and records whether the count is variable and must be written
//! alongside the values.

use std::collections::HashMap;
use log::{debug, warn};

use crate::tiff::constants::{field_types, tags};
use crate::tiff::ifd::IFDEntry;
use crate::utils::tag_utils;

/// Schema for one custom tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSchema {
    pub tag: u16,
    pub name: &'static str,
    pub field_type: u16,
    /// Whether any number of values is allowed
    pub variable_count: bool,
    /// Whether the count is stored with the values (always true for variable counts in TIFF)
    pub pass_count: bool,
}

impl TagSchema {
    pub const fn new(tag: u16, name: &'static str, field_type: u16, variable_count: bool, pass_count: bool) -> Self {
        TagSchema { tag, name, field_type, variable_count, pass_count }
    }
}

/// The GDAL extension tags propagated from source to destination
pub const GDAL_TAG_SCHEMAS: [TagSchema; 3] = [
    TagSchema::new(tags::GDAL_METADATA, "GDALMetadata", field_types::ASCII, true, false),
    TagSchema::new(tags::GDAL_NODATA, "GDALNoData", field_types::ASCII, true, false),
    TagSchema::new(tags::RPC_COEFFICIENT, "RPCCoefficient", field_types::DOUBLE, true, true),
];

/// Registry of custom tag schemas
///
/// A value, not a global: the host creates one at startup, calls
/// [`TagRegistry::register_gdal_tags`] and hands it to the reader.
#[derive(Debug, Default, Clone)]
pub struct TagRegistry {
    schemas: HashMap<u16, TagSchema>,
}

impl TagRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        TagRegistry { schemas: HashMap::new() }
    }

    /// Creates a registry with the GDAL tags already registered
    pub fn with_gdal_tags() -> Self {
        let mut registry = Self::new();
        registry.register_gdal_tags();
        registry
    }

    /// Registers a schema
    ///
    /// Registering the same schema twice is a no-op. Returns false when a
    /// different schema already owns the tag; the existing one is kept.
    pub fn register(&mut self, schema: TagSchema) -> bool {
        match self.schemas.get(&schema.tag) {
            Some(existing) if *existing == schema => true,
            Some(existing) => {
                warn!("Tag {} already registered as {}, ignoring {}", schema.tag, existing.name, schema.name);
                false
            }
            None => {
                debug!("Registering custom tag {} ({})", schema.tag, schema.name);
                self.schemas.insert(schema.tag, schema);
                true
            }
        }
    }

    /// Registers the GDAL metadata, nodata and RPC coefficient tags
    ///
    /// Idempotent; calling it again leaves the registry unchanged.
    pub fn register_gdal_tags(&mut self) {
        for schema in GDAL_TAG_SCHEMAS {
            self.register(schema);
        }
    }

    /// Returns the schema of a registered tag
    pub fn schema(&self, tag: u16) -> Option<&TagSchema> {
        self.schemas.get(&tag)
    }

    pub fn is_registered(&self, tag: u16) -> bool {
        self.schemas.contains_key(&tag)
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Human-readable tag name, falling back to the built-in table
    pub fn name(&self, tag: u16) -> &'static str {
        self.schemas.get(&tag)
            .map(|s| s.name)
            .unwrap_or_else(|| tag_utils::get_tag_name(tag))
    }

    /// Checks an entry read from a file against its registered schema
    ///
    /// Unregistered tags are accepted as-is. A registered tag whose field
    /// type differs from the schema is rejected with a warning.
    pub fn validate_entry(&self, entry: &IFDEntry) -> bool {
        let Some(schema) = self.schemas.get(&entry.tag) else {
            return true;
        };

        if entry.field_type != schema.field_type {
            warn!("Ignoring tag {} ({}): field type {} does not match registered type {}",
                  entry.tag, schema.name,
                  tag_utils::get_field_type_name(entry.field_type),
                  tag_utils::get_field_type_name(schema.field_type));
            return false;
        }

        if !schema.variable_count && entry.count != 1 {
            warn!("Ignoring tag {} ({}): expected a single value, found {}", entry.tag, schema.name, entry.count);
            return false;
        }

        true
    }
}
