//! Configuration validation

/// Validation contract implemented by every config section
pub trait Validate {
    /// Check the section for invalid values
    fn validate(&self) -> Result<(), String>;
}
