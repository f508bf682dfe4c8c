use uuid::Uuid;

pub mod product;

// Re-exports for convenience
pub use product::*;

/// Placeholder display name used until a page yields a real one.
pub const UNKNOWN_NAME: &str = "Unknown Product";

// Helper function to generate record ids in the format used by the store
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
