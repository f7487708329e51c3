//! # USB Transport
//!
//! Bulk `transferOut` to the printer's output endpoint.
//!
//! ## Endpoint Resolution
//!
//! ```text
//! configuration
//!   └─ interfaces[0]
//!        └─ alternate
//!             └─ endpoints: first with direction Out ──► endpoint number
//!                           none found                ──► 1
//! ```
//!
//! The endpoint is resolved once, when the target is bound.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::TransportError;

/// Endpoint used when the descriptors name no output endpoint.
pub const DEFAULT_OUT_ENDPOINT: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbEndpoint {
    pub endpoint_number: u8,
    pub direction: Direction,
}

/// Active alternate setting of an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbAlternate {
    pub endpoints: Vec<UsbEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbInterface {
    pub interface_number: u8,
    pub alternate: UsbAlternate,
}

/// Active configuration descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbConfiguration {
    pub interfaces: Vec<UsbInterface>,
}

impl UsbConfiguration {
    /// Printer-class configuration with a single bulk-out endpoint.
    pub fn single_out(endpoint_number: u8) -> Self {
        Self {
            interfaces: vec![UsbInterface {
                interface_number: 0,
                alternate: UsbAlternate {
                    endpoints: vec![UsbEndpoint {
                        endpoint_number,
                        direction: Direction::Out,
                    }],
                },
            }],
        }
    }
}

/// An opened USB printer with a claimed interface.
#[async_trait]
pub trait UsbBulkDevice: Send {
    /// Active configuration, if the device reports one.
    fn configuration(&self) -> Option<&UsbConfiguration>;

    /// Bulk transfer to `endpoint`, resolving when the transfer completes.
    async fn transfer_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), TransportError>;
}

/// Pick the output endpoint from the first interface's alternate setting.
pub fn resolve_out_endpoint(configuration: Option<&UsbConfiguration>) -> u8 {
    configuration
        .and_then(|c| c.interfaces.first())
        .and_then(|iface| {
            iface
                .alternate
                .endpoints
                .iter()
                .find(|ep| ep.direction == Direction::Out)
        })
        .map(|ep| ep.endpoint_number)
        .unwrap_or(DEFAULT_OUT_ENDPOINT)
}

/// USB half of [`super::TransportTarget`].
pub struct UsbTarget {
    name: String,
    device: Box<dyn UsbBulkDevice>,
    endpoint: u8,
}

impl UsbTarget {
    pub fn new(name: String, device: Box<dyn UsbBulkDevice>) -> Self {
        let endpoint = resolve_out_endpoint(device.configuration());
        debug!(device = %name, endpoint, "resolved bulk-out endpoint");
        Self {
            name,
            device,
            endpoint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> u8 {
        self.endpoint
    }

    pub async fn transfer_out(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        trace!(endpoint = self.endpoint, len = chunk.len(), "bulk transfer");
        self.device.transfer_out(self.endpoint, chunk).await
    }
}

impl fmt::Debug for UsbTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbTarget")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoints: Vec<UsbEndpoint>) -> UsbConfiguration {
        UsbConfiguration {
            interfaces: vec![UsbInterface {
                interface_number: 0,
                alternate: UsbAlternate { endpoints },
            }],
        }
    }

    #[test]
    fn test_first_out_endpoint_wins() {
        let cfg = config(vec![
            UsbEndpoint {
                endpoint_number: 2,
                direction: Direction::In,
            },
            UsbEndpoint {
                endpoint_number: 3,
                direction: Direction::Out,
            },
            UsbEndpoint {
                endpoint_number: 5,
                direction: Direction::Out,
            },
        ]);
        assert_eq!(resolve_out_endpoint(Some(&cfg)), 3);
    }

    #[test]
    fn test_defaults_to_endpoint_1() {
        assert_eq!(resolve_out_endpoint(None), 1);
        assert_eq!(resolve_out_endpoint(Some(&UsbConfiguration::default())), 1);

        let in_only = config(vec![UsbEndpoint {
            endpoint_number: 4,
            direction: Direction::In,
        }]);
        assert_eq!(resolve_out_endpoint(Some(&in_only)), 1);
    }

    #[test]
    fn test_only_first_interface_is_checked() {
        let mut cfg = config(vec![]);
        cfg.interfaces.push(UsbInterface {
            interface_number: 1,
            alternate: UsbAlternate {
                endpoints: vec![UsbEndpoint {
                    endpoint_number: 6,
                    direction: Direction::Out,
                }],
            },
        });
        assert_eq!(resolve_out_endpoint(Some(&cfg)), 1);
    }

    #[test]
    fn test_single_out() {
        assert_eq!(resolve_out_endpoint(Some(&UsbConfiguration::single_out(2))), 2);
    }
}
