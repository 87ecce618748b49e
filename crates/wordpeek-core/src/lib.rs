pub mod enabled;
pub mod error;
pub mod lookup;
pub mod normalize;

pub use enabled::EnabledState;
pub use error::{FailureKind, LookupError};
pub use lookup::{DefinitionEntry, LookupResult, LookupToken};
pub use normalize::normalize;
