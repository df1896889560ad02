//! Cross-Unit Transfer Types.
//!
//! Bulk transfers (`GLOAD`, `GSTORE`) are the only block copies across the boundary
//! of the two units. This module names their direction for `Transfer` events and
//! micro-operation descriptions. Point accesses (`GREAD`, `GWRITE`) carry no
//! direction and emit no transfer event.

use serde::Serialize;

/// Direction of a copy between primary memory and compute memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// Primary memory into compute memory (`GLOAD`).
    ToCompute,

    /// Compute memory into primary memory (`GSTORE`).
    ToPrimary,
}

impl TransferDirection {
    /// Short label used in transfer descriptions.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToCompute => "CPU -> GPU",
            Self::ToPrimary => "GPU -> CPU",
        }
    }
}
