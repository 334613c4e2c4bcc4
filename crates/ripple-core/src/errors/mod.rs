pub mod error_code;
pub mod impact_error;

pub use error_code::ErrorCode;
pub use impact_error::ImpactError;
