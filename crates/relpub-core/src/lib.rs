pub mod descriptor;
pub mod io;
pub mod paths;
pub mod publish;
pub mod registry;
pub mod reporter;
pub mod signing;

pub use descriptor::{DescriptorError, ReleaseInputs, SigningOptions};
pub use paths::expand_home;
pub use publish::{PublishError, PublishRequest, prepare, publish};
pub use registry::{HttpRegistry, Registry, RegistryError};
pub use reporter::{NullReporter, Reporter};
pub use signing::{Signer, SigningAlgorithm, SigningError, SigningKeySource};

/// Re-export of the shared release types.
pub use relpub_schema as schema;

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("relpub-core/", env!("CARGO_PKG_VERSION"));
