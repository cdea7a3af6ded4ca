//! Memory region sizing for bus-attached slot buffers.

use serde::{Deserialize, Serialize};

/// A memory-mapped address range requested by a bus slave.
///
/// `origin == None` leaves placement to the bus (see
/// [`BusAddressMap::add_slave`](crate::bus::BusAddressMap::add_slave)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Fixed base address, if one was requested.
    pub origin: Option<u64>,
    /// Size in bytes.
    pub size: u64,
    /// Whether the CPU may cache accesses to this region.
    pub cached: bool,
}

/// Sizes the region holding `nrxslots + ntxslots` hardware buffers.
///
/// The region is never cached: the buffers are written by hardware outside
/// the requester's control flow. A requested origin is passed through as-is;
/// collision checks happen when the region is added to the bus. A size past
/// `u64::MAX` saturates, which no bus can place.
pub fn allocate(
    nrxslots: u32,
    ntxslots: u32,
    slot_buffer_size: u64,
    requested_origin: Option<u64>,
) -> Region {
    let slots = u64::from(nrxslots) + u64::from(ntxslots);
    Region {
        origin: requested_origin,
        size: slots.saturating_mul(slot_buffer_size),
        cached: false,
    }
}
