pub mod listing;

// Re-exports for convenience
pub use listing::{Listing, parse_price};
