mod fields;
mod metadata;

pub use self::fields::NormalizedFields;
pub use self::metadata::RawMetadata;
