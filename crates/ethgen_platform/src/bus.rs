//! SoC bus address map: slave region placement and CSR page allocation.

use crate::region::Region;
use ethgen_common::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A region placed at a concrete address on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRegion {
    /// Name of the slave (or reserved window) owning the region.
    pub name: String,
    /// Base address.
    pub origin: u64,
    /// Size in bytes as requested.
    pub size: u64,
    /// Whether accesses may be cached.
    pub cached: bool,
}

impl PlacedRegion {
    /// The address window the bus decodes for this region: the size
    /// rounded up to a power of two.
    pub fn decode_size(&self) -> u64 {
        decode_size(self.size)
    }

    /// One past the last decoded address.
    pub fn end(&self) -> u64 {
        self.origin.saturating_add(self.decode_size())
    }

    fn overlaps(&self, origin: u64, decode: u64) -> bool {
        origin < self.end() && self.origin < origin.saturating_add(decode)
    }
}

fn decode_size(size: u64) -> u64 {
    size.max(1).checked_next_power_of_two().unwrap_or(u64::MAX)
}

fn mem_map_key(name: &str) -> String {
    format!("soc.mem_map.{name}")
}

/// Placement of bus slave regions within the bus address space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusAddressMap {
    address_width: u32,
    regions: Vec<PlacedRegion>,
}

impl BusAddressMap {
    /// Default bus address width in bits.
    pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;

    /// Creates an empty address map for a bus of the given width.
    pub fn new(address_width: u32) -> Self {
        Self {
            address_width,
            regions: Vec::new(),
        }
    }

    /// Returns the bus address width in bits.
    pub fn address_width(&self) -> u32 {
        self.address_width
    }

    /// Returns all placed regions in insertion order.
    pub fn regions(&self) -> &[PlacedRegion] {
        &self.regions
    }

    /// Returns the region placed for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&PlacedRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    fn space(&self) -> u64 {
        1u64.checked_shl(self.address_width).unwrap_or(u64::MAX)
    }

    /// Adds a bus slave region.
    ///
    /// A region with an origin must be aligned to its decode size and may
    /// not overlap anything placed before it. Without an origin the lowest
    /// aligned free address is chosen.
    ///
    /// # Errors
    ///
    /// - [`GenError::ResourceConflict`] if `name` is already placed.
    /// - [`GenError::Configuration`] (key `soc.mem_map.<name>`) for a
    ///   misaligned, overlapping or out-of-range origin, or when no free
    ///   range is left.
    pub fn add_slave(&mut self, name: &str, region: Region) -> GenResult<&PlacedRegion> {
        if self.get(name).is_some() {
            return Err(GenError::ResourceConflict {
                name: name.to_string(),
                index: 0,
            });
        }
        if region.size == 0 {
            return Err(GenError::config(name, "region size is zero"));
        }
        let decode = decode_size(region.size);

        let origin = match region.origin {
            Some(origin) => {
                self.check_fixed(name, origin, decode)?;
                origin
            }
            None => self.find_free(name, decode)?,
        };

        debug!(
            slave = name,
            origin = format_args!("{origin:#010x}"),
            size = region.size,
            "bus region placed"
        );
        self.regions.push(PlacedRegion {
            name: name.to_string(),
            origin,
            size: region.size,
            cached: region.cached,
        });
        Ok(&self.regions[self.regions.len() - 1])
    }

    fn check_fixed(&self, name: &str, origin: u64, decode: u64) -> GenResult<()> {
        if origin % decode != 0 {
            return Err(GenError::config(
                mem_map_key(name),
                format!("origin {origin:#x} is not aligned to the region size {decode:#x}"),
            ));
        }
        if origin.saturating_add(decode) > self.space() {
            return Err(GenError::config(
                mem_map_key(name),
                format!(
                    "origin {origin:#x} is outside the {}-bit bus address space",
                    self.address_width
                ),
            ));
        }
        if let Some(other) = self.regions.iter().find(|r| r.overlaps(origin, decode)) {
            return Err(GenError::config(
                mem_map_key(name),
                format!("origin {origin:#x} overlaps region '{}'", other.name),
            ));
        }
        Ok(())
    }

    fn find_free(&self, name: &str, decode: u64) -> GenResult<u64> {
        let space = self.space();
        let mut candidate = 0u64;
        while candidate.saturating_add(decode) <= space {
            match self.regions.iter().find(|r| r.overlaps(candidate, decode)) {
                None => return Ok(candidate),
                Some(other) => {
                    // Skip past the blocking region, staying aligned.
                    let next = other.end().div_ceil(decode).saturating_mul(decode);
                    if next <= candidate {
                        break;
                    }
                    candidate = next;
                }
            }
        }
        Err(GenError::config(
            mem_map_key(name),
            format!("no free {decode:#x}-byte range left on the bus"),
        ))
    }
}

/// A CSR page assigned to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrRegion {
    /// Component name.
    pub name: String,
    /// Page index within the CSR window.
    pub location: u32,
    /// Absolute base address of the page.
    pub origin: u64,
}

/// The CSR window: fixed-size pages handed out to register-bearing components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrSpace {
    base: u64,
    paging: u64,
    n_locations: u32,
    fixed: BTreeMap<String, u32>,
    allocated: Vec<CsrRegion>,
}

impl CsrSpace {
    /// Default CSR window base address.
    pub const DEFAULT_BASE: u64 = 0xf000_0000;
    /// Default page size in bytes.
    pub const DEFAULT_PAGING: u64 = 0x800;
    /// Default number of pages.
    pub const DEFAULT_LOCATIONS: u32 = 32;

    /// Creates a CSR window with `fixed` name→location assignments.
    ///
    /// # Errors
    ///
    /// Returns a `soc.csr_map` configuration error if a fixed location is out
    /// of range or assigned twice, and a `soc.csr_paging` error if the window
    /// does not fit in the 64-bit address range.
    pub fn new(
        base: u64,
        paging: u64,
        n_locations: u32,
        fixed: BTreeMap<String, u32>,
    ) -> GenResult<Self> {
        let mut used = BTreeMap::new();
        for (name, &loc) in &fixed {
            if loc >= n_locations {
                return Err(GenError::config(
                    format!("soc.csr_map.{name}"),
                    format!("location {loc} exceeds the {n_locations} available CSR pages"),
                ));
            }
            if let Some(other) = used.insert(loc, name) {
                return Err(GenError::config(
                    format!("soc.csr_map.{name}"),
                    format!("location {loc} is already assigned to '{other}'"),
                ));
            }
        }
        let fits = paging
            .checked_mul(u64::from(n_locations))
            .and_then(|size| base.checked_add(size))
            .is_some();
        if !fits {
            return Err(GenError::config(
                "soc.csr_paging",
                format!(
                    "{n_locations} pages of {paging:#x} bytes above {base:#x} \
                     overflow the address range"
                ),
            ));
        }
        Ok(Self {
            base,
            paging,
            n_locations,
            fixed,
            allocated: Vec::new(),
        })
    }

    /// Base address of the window.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Total window size in bytes.
    pub fn size(&self) -> u64 {
        self.paging.saturating_mul(u64::from(self.n_locations))
    }

    /// Pages handed out so far.
    pub fn regions(&self) -> &[CsrRegion] {
        &self.allocated
    }

    /// Assigns a page to `name`: its fixed location if mapped, otherwise
    /// the lowest location neither fixed nor taken.
    pub fn alloc(&mut self, name: &str) -> GenResult<CsrRegion> {
        if self.allocated.iter().any(|r| r.name == name) {
            return Err(GenError::ResourceConflict {
                name: name.to_string(),
                index: 0,
            });
        }
        let location = match self.fixed.get(name) {
            Some(&loc) => loc,
            None => (0..self.n_locations)
                .find(|loc| {
                    !self.fixed.values().any(|f| f == loc)
                        && !self.allocated.iter().any(|r| r.location == *loc)
                })
                .ok_or_else(|| {
                    GenError::config("soc.csr_map", format!("no free CSR page left for '{name}'"))
                })?,
        };
        let origin = u64::from(location)
            .checked_mul(self.paging)
            .and_then(|offset| self.base.checked_add(offset))
            .ok_or_else(|| {
                GenError::config("soc.csr_paging", format!("CSR page {location} is out of range"))
            })?;
        let region = CsrRegion {
            name: name.to_string(),
            location,
            origin,
        };
        debug!(csr = name, location, "CSR page assigned");
        self.allocated.push(region.clone());
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::allocate;

    #[test]
    fn default_placement_starts_at_zero() {
        let mut bus = BusAddressMap::new(32);
        let placed = bus.add_slave("ethmac", allocate(2, 2, 2048, None)).unwrap();
        assert_eq!(placed.origin, 0);
        assert_eq!(placed.size, 8192);
        assert!(!placed.cached);
    }

    #[test]
    fn default_placement_skips_used_ranges() {
        let mut bus = BusAddressMap::new(32);
        let sram = Region {
            origin: Some(0),
            size: 0x1000,
            cached: true,
        };
        bus.add_slave("sram", sram).unwrap();
        let placed = bus.add_slave("ethmac", allocate(2, 2, 2048, None)).unwrap();
        assert_eq!(placed.origin, 0x2000);
    }

    #[test]
    fn non_power_of_two_size_decodes_rounded_up() {
        let mut bus = BusAddressMap::new(32);
        let placed = bus.add_slave("ethmac", allocate(2, 1, 2048, None)).unwrap();
        assert_eq!(placed.size, 6144);
        assert_eq!(placed.decode_size(), 8192);
    }

    #[test]
    fn fixed_origin_used_as_is() {
        let mut bus = BusAddressMap::new(32);
        let placed = bus
            .add_slave("ethmac", allocate(2, 2, 2048, Some(0x3000_0000)))
            .unwrap();
        assert_eq!(placed.origin, 0x3000_0000);
    }

    #[test]
    fn misaligned_origin_rejected() {
        let mut bus = BusAddressMap::new(32);
        let err = bus
            .add_slave("ethmac", allocate(2, 2, 2048, Some(0x1000)))
            .unwrap_err();
        assert_eq!(err.key(), Some("soc.mem_map.ethmac"));
    }

    #[test]
    fn overlapping_origin_rejected() {
        let mut bus = BusAddressMap::new(32);
        let csr = Region {
            origin: Some(0xf000_0000),
            size: 0x10000,
            cached: false,
        };
        bus.add_slave("csr", csr).unwrap();
        let err = bus
            .add_slave("ethmac", allocate(2, 2, 2048, Some(0xf000_2000)))
            .unwrap_err();
        assert!(format!("{err}").contains("overlaps region 'csr'"));
    }

    #[test]
    fn origin_outside_address_space_rejected() {
        let mut bus = BusAddressMap::new(16);
        let err = bus
            .add_slave("ethmac", allocate(2, 2, 2048, Some(0x10000)))
            .unwrap_err();
        assert!(format!("{err}").contains("16-bit"));
    }

    #[test]
    fn full_bus_reports_no_space() {
        let mut bus = BusAddressMap::new(13);
        bus.add_slave("a", allocate(2, 2, 2048, None)).unwrap();
        let err = bus.add_slave("b", allocate(1, 0, 2048, None)).unwrap_err();
        assert!(format!("{err}").contains("no free"));
    }

    #[test]
    fn saturated_region_not_placed() {
        let mut bus = BusAddressMap::new(32);
        let err = bus
            .add_slave("ethmac", allocate(u32::MAX, u32::MAX, u64::MAX, None))
            .unwrap_err();
        assert_eq!(err.key(), Some("soc.mem_map.ethmac"));
    }

    #[test]
    fn duplicate_slave_conflicts() {
        let mut bus = BusAddressMap::new(32);
        bus.add_slave("ethmac", allocate(2, 2, 2048, None)).unwrap();
        let err = bus.add_slave("ethmac", allocate(2, 2, 2048, None)).unwrap_err();
        assert!(matches!(err, GenError::ResourceConflict { .. }));
    }

    #[test]
    fn csr_sequential_allocation() {
        let mut csr = CsrSpace::new(0xf000_0000, 0x800, 32, BTreeMap::new()).unwrap();
        let phy = csr.alloc("ethphy").unwrap();
        let mac = csr.alloc("ethmac").unwrap();
        assert_eq!((phy.location, phy.origin), (0, 0xf000_0000));
        assert_eq!((mac.location, mac.origin), (1, 0xf000_0800));
    }

    #[test]
    fn csr_fixed_locations_are_honored_and_skipped() {
        let fixed = BTreeMap::from([("ethmac".to_string(), 0)]);
        let mut csr = CsrSpace::new(0xf000_0000, 0x800, 32, fixed).unwrap();
        let phy = csr.alloc("ethphy").unwrap();
        let mac = csr.alloc("ethmac").unwrap();
        assert_eq!(phy.location, 1);
        assert_eq!(mac.location, 0);
    }

    #[test]
    fn csr_fixed_location_out_of_range() {
        let fixed = BTreeMap::from([("ethmac".to_string(), 40)]);
        let err = CsrSpace::new(0xf000_0000, 0x800, 32, fixed).unwrap_err();
        assert_eq!(err.key(), Some("soc.csr_map.ethmac"));
    }

    #[test]
    fn csr_space_exhausted() {
        let mut csr = CsrSpace::new(0, 0x800, 1, BTreeMap::new()).unwrap();
        csr.alloc("ethphy").unwrap();
        assert!(csr.alloc("ethmac").is_err());
        assert_eq!(csr.size(), 0x800);
    }

    #[test]
    fn csr_window_overflow_rejected() {
        let err = CsrSpace::new(0xf000_0000, 1 << 59, 32, BTreeMap::new()).unwrap_err();
        assert_eq!(err.key(), Some("soc.csr_paging"));

        let err = CsrSpace::new(u64::MAX - 0x7ff, 0x800, 2, BTreeMap::new()).unwrap_err();
        assert_eq!(err.key(), Some("soc.csr_paging"));
    }

    #[test]
    fn csr_last_page_fits() {
        let base = 0xffff_ffff_ffff_e000;
        let mut csr = CsrSpace::new(base, 0x800, 2, BTreeMap::new()).unwrap();
        csr.alloc("ethphy").unwrap();
        let mac = csr.alloc("ethmac").unwrap();
        assert_eq!(mac.origin, 0xffff_ffff_ffff_e800);
        assert_eq!(csr.size(), 0x1000);
    }
}
