//! Transport layer for DUT shell consoles.
//!
//! Provides the adapter trait, the real serial console and a scripted mock.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::{available_consoles, ConsoleInfo, SyncSerialPort};
pub use traits::*;
