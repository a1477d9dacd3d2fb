//! Prometheus text exposition of VideoCore telemetry.
//!
//! [`write_metrics`] reads every property through a
//! [`PropertyClient`](vcmbox_mailbox::PropertyClient) and writes one gauge
//! family per property, in a fixed order.

pub mod error;
pub mod writer;

pub use error::{ExportError, Result};
pub use writer::{render_metrics, write_metrics, CONTENT_TYPE};
