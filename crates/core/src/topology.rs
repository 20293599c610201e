//! Derived topology.
//!
//! Raw configuration numbers are turned into coordinates and field widths once,
//! by the pure function [`derive_coordinates`], and the result is passed
//! explicitly to the translator, the tile helpers and the sequencer.

use crate::common::constants::WORD_BYTES;
use crate::common::{Coord, clog2};
use crate::config::Config;

/// Address bits available to the hash: 32-bit EVA, minus the DRAM select bit,
/// minus the two byte-offset bits of a word.
const HASH_ADDRESS_BITS: u32 = 32 - 1 - 2;

/// Widths of the four contiguous fields of a hashed DRAM address, least
/// significant first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashFields {
    /// Offset inside a cache block.
    pub block: u32,
    /// Vcache column.
    pub column: u32,
    /// Vcache row selector (parity picks top or bottom).
    pub row: u32,
    /// Index inside the vcache.
    pub index: u32,
}

impl HashFields {
    /// Bit position of the column field.
    #[inline]
    pub const fn column_low(&self) -> u32 {
        self.block
    }

    /// Bit position of the row field.
    #[inline]
    pub const fn row_low(&self) -> u32 {
        self.block + self.column
    }

    /// Bit position of the index field.
    #[inline]
    pub const fn index_low(&self) -> u32 {
        self.block + self.column + self.row
    }

    /// Total number of address bits covered by the four fields.
    #[inline]
    pub const fn total(&self) -> u32 {
        self.index_low() + self.index
    }
}

/// One pod to boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pod {
    /// Pod column index.
    pub px: u32,
    /// Pod row index.
    pub py: u32,
    /// Coordinate of the pod's first tile.
    pub origin: Coord,
}

/// Topology values derived from a [`Config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedTopology {
    /// Tile columns per pod.
    pub num_tiles_x: u32,
    /// Tile rows per pod.
    pub num_tiles_y: u32,
    /// Vcache rows on each side of a pod.
    pub num_vcache_rows: u32,
    /// Pods present in the machine along x.
    pub machine_pods_x: u32,
    /// Whether DRAM hashing is enabled.
    pub dram_enabled: bool,
    /// Coordinate of pod (0, 0).
    pub origin: Coord,
    /// Pods to boot, x outer, y inner.
    pub pods: Vec<Pod>,
    /// Coordinate of the BlackParrot core.
    pub bp_coord: Coord,
    /// Coordinate of the host node as written to the bridge.
    pub host_cord: u64,
    /// Capacity of one vcache when used as block memory.
    pub bank_capacity: u64,
    /// Widths of the hash fields.
    pub fields: HashFields,
    /// Word address added to every BlackParrot image entry.
    pub bp_image_base_word: u64,
    /// BlackParrot image offset written to the bridge.
    pub bp_dram_base: u64,
    /// BlackParrot pod offset written to the bridge.
    pub bp_dram_pod_offset: u64,
}

/// Computes every derived coordinate and width of a configuration.
///
/// Sums saturate instead of wrapping, so an unvalidated configuration yields
/// out-of-range coordinates rather than a panic; `Config::validate` rejects
/// those before any script is built.
pub fn derive_coordinates(config: &Config) -> DerivedTopology {
    let t = &config.topology;
    let cache = &config.cache;
    let nbf = &config.nbf;

    let pod_count = u64::from(t.num_pods_x) * u64::from(t.num_pods_y);
    let mut pods = Vec::with_capacity(usize::try_from(pod_count).unwrap_or(0));
    for px in 0..t.num_pods_x {
        for py in 0..t.num_pods_y {
            pods.push(Pod {
                px,
                py,
                origin: Coord::new(
                    t.origin_x_cord
                        .saturating_add(px.saturating_mul(t.num_tiles_x)),
                    t.origin_y_cord
                        .saturating_add(py.saturating_mul(t.num_tiles_y).saturating_mul(2)),
                ),
            });
        }
    }

    let block = clog2(u64::from(cache.block_size));
    let column = clog2(u64::from(t.num_tiles_x));
    let row = clog2(2 * u64::from(t.num_vcache_rows));
    let index = HASH_ADDRESS_BITS.saturating_sub(block + column + row);

    DerivedTopology {
        num_tiles_x: t.num_tiles_x,
        num_tiles_y: t.num_tiles_y,
        num_vcache_rows: t.num_vcache_rows,
        machine_pods_x: t.machine_pods_x,
        dram_enabled: config.dram.enabled,
        origin: Coord::new(t.origin_x_cord, t.origin_y_cord),
        pods,
        bp_coord: Coord::new(
            1u32.checked_shl(nbf.x_cord_width).unwrap_or(0) | 1,
            3u32.checked_shl(nbf.y_cord_width).unwrap_or(0),
        ),
        host_cord: u64::from(t.num_tiles_x),
        bank_capacity: u64::from(cache.ways)
            .saturating_mul(u64::from(cache.sets))
            .saturating_mul(u64::from(cache.block_size)),
        fields: HashFields {
            block,
            column,
            row,
            index,
        },
        bp_image_base_word: config.dram.bp_dram_base / WORD_BYTES,
        bp_dram_base: config.dram.bp_dram_base,
        bp_dram_pod_offset: config.dram.bp_dram_pod_offset,
    }
}
