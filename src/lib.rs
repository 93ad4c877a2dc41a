// CharacterWorks client
// Library exports

pub mod builders; // Command construction from operator input
pub mod client; // HTTP transport, timeout and response parsing
pub mod config; // CLI configuration (file + environment)
pub mod errors; // Operator-facing error messages
pub mod protocol; // Command and response payloads
pub mod schema; // Structural response validation

pub use client::{CharacterWorksClient, ClientError, Validation};
pub use protocol::{Channel, Command, DeviceConfig, TriggerAction};
