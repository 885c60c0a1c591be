//! Network APR split.
//!
//! ```text
//! cl_apr = network_apr * 0.825
//! el_apr = network_apr * 0.175
//! ```

use maxeb_types::{AprSplit, CL_RATIO, EL_RATIO};

/// Split a network-wide APR (percent) into consensus and execution layer parts.
pub fn split_network_apr(network_apr: f64) -> AprSplit {
    AprSplit {
        cl_apr: network_apr * CL_RATIO,
        el_apr: network_apr * EL_RATIO,
    }
}
