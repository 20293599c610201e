//! Configuration for a boot script generation run.
//!
//! This module defines the configuration structures used to describe the target
//! machine. It provides:
//! 1. **Defaults:** Baseline manycore geometry (16x8 pods, 8-way vcaches).
//! 2. **Structures:** Hierarchical config for topology, cache, DRAM, tile group, NBF and image.
//! 3. **Validation:** Geometry checks that do not depend on the address hash.
//!
//! Configuration is supplied as JSON (every field optional) or via `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Tile columns per pod.
    pub const NUM_TILES_X: u32 = 16;
    /// Tile rows per pod.
    pub const NUM_TILES_Y: u32 = 8;
    /// Pods along each axis.
    pub const NUM_PODS: u32 = 1;
    /// Vcache rows above (and below) each pod.
    pub const NUM_VCACHE_ROWS: u32 = 1;
    /// Column of the first tile of pod (0, 0).
    pub const ORIGIN_X_CORD: u32 = 16;
    /// Row of the first tile of pod (0, 0).
    pub const ORIGIN_Y_CORD: u32 = 8;

    /// Vcache associativity.
    pub const CACHE_WAYS: u32 = 8;
    /// Vcache sets.
    pub const CACHE_SETS: u32 = 64;
    /// Vcache block size in bytes.
    pub const CACHE_BLOCK_SIZE: u32 = 32;

    /// Byte address of the BlackParrot image inside manycore DRAM.
    pub const BP_DRAM_BASE: u64 = 0x8000_0000;
    /// Pod offset written to the bridge.
    pub const BP_DRAM_POD_OFFSET: u64 = 0;

    /// Bits in a mesh x coordinate.
    pub const X_CORD_WIDTH: u32 = 7;
    /// Bits in a mesh y coordinate.
    pub const Y_CORD_WIDTH: u32 = 7;
    /// Tile EPA width in bits.
    pub const ADDR_WIDTH: u32 = 28;
    /// Instruction cache entries per tile.
    pub const ICACHE_ENTRIES: u64 = 1024;
}

/// Widest coordinate field: the BlackParrot row `3 << width` must fit in 32 bits.
const MAX_CORD_WIDTH: u32 = 30;

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use nbfgen_core::config::{AtAddressing, Config};
///
/// let json = r#"{
///     "topology": { "num_tiles_x": 4, "num_tiles_y": 2, "num_vcache_rows": 2 },
///     "cache": { "block_size": 4 },
///     "image": { "at_addressing": "word" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.topology.num_tiles_x, 4);
/// assert_eq!(config.cache.ways, 8);
/// assert!(config.dram.enabled);
/// assert_eq!(config.image.at_addressing, AtAddressing::Word);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mesh geometry and coordinate origin.
    pub topology: TopologyConfig,
    /// Vcache geometry.
    pub cache: CacheConfig,
    /// DRAM hashing and BlackParrot image placement.
    pub dram: DramConfig,
    /// Tile group that runs the tile program.
    pub tile_group: TileGroupConfig,
    /// NBF field widths.
    pub nbf: NbfConfig,
    /// Memory image parsing options.
    pub image: ImageConfig,
}

impl Config {
    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if the file cannot be read or is not valid
    /// JSON for this structure.
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(std::io::Error::from)
    }

    /// Checks the geometry for zero-sized dimensions, field widths, mesh
    /// coordinates that do not fit those widths, bridge values wider than the
    /// 32-bit bridge registers, and misplaced tile groups.
    ///
    /// The power-of-two requirement of the DRAM hash is checked by the
    /// translator, since it only applies in hashed mode.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.topology;
        let nonzero = [
            ("topology.num_tiles_x", t.num_tiles_x),
            ("topology.num_tiles_y", t.num_tiles_y),
            ("topology.num_pods_x", t.num_pods_x),
            ("topology.num_pods_y", t.num_pods_y),
            ("topology.machine_pods_x", t.machine_pods_x),
            ("topology.machine_pods_y", t.machine_pods_y),
            ("topology.num_vcache_rows", t.num_vcache_rows),
            ("cache.ways", self.cache.ways),
            ("cache.sets", self.cache.sets),
            ("cache.block_size", self.cache.block_size),
            ("tile_group.tg_dim_x", self.tile_group.tg_dim_x),
            ("tile_group.tg_dim_y", self.tile_group.tg_dim_y),
        ];
        if let Some((field, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroGeometry { field: *field });
        }

        if !(2..=32).contains(&self.nbf.addr_width) {
            return Err(ConfigError::AddrWidth {
                addr_width: self.nbf.addr_width,
            });
        }

        for (axis, width) in [("x", self.nbf.x_cord_width), ("y", self.nbf.y_cord_width)] {
            if !(1..=MAX_CORD_WIDTH).contains(&width) {
                return Err(ConfigError::CordWidth { axis, width });
            }
        }

        // Last tile column, and last bottom vcache row of the last pod row.
        let last_x =
            u64::from(t.origin_x_cord) + u64::from(t.num_pods_x) * u64::from(t.num_tiles_x) - 1;
        let last_y = u64::from(t.origin_y_cord)
            + u64::from(t.num_pods_y - 1) * 2 * u64::from(t.num_tiles_y)
            + u64::from(t.num_tiles_y)
            + u64::from(t.num_vcache_rows)
            - 1;
        for (axis, last, width) in [
            ("x", last_x, self.nbf.x_cord_width),
            ("y", last_y, self.nbf.y_cord_width),
        ] {
            if last >> width != 0 {
                return Err(ConfigError::CoordinateRange { axis, last, width });
            }
        }

        for (field, value) in [
            ("dram.bp_dram_base", self.dram.bp_dram_base),
            ("dram.bp_dram_pod_offset", self.dram.bp_dram_pod_offset),
        ] {
            if value > u64::from(u32::MAX) {
                return Err(ConfigError::BridgeValue { field, value });
            }
        }

        let tg = &self.tile_group;
        if u64::from(tg.tgo_x) + u64::from(tg.tg_dim_x) > u64::from(t.num_tiles_x)
            || u64::from(tg.tgo_y) + u64::from(tg.tg_dim_y) > u64::from(t.num_tiles_y)
        {
            return Err(ConfigError::TileGroupOutOfPod {
                tgo_x: tg.tgo_x,
                tgo_y: tg.tgo_y,
                tg_dim_x: tg.tg_dim_x,
                tg_dim_y: tg.tg_dim_y,
                num_tiles_x: t.num_tiles_x,
                num_tiles_y: t.num_tiles_y,
            });
        }
        Ok(())
    }
}

/// Mesh geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Tile columns per pod.
    pub num_tiles_x: u32,
    /// Tile rows per pod.
    pub num_tiles_y: u32,
    /// Pods to boot along x.
    pub num_pods_x: u32,
    /// Pods to boot along y.
    pub num_pods_y: u32,
    /// Pods present in the whole machine along x.
    pub machine_pods_x: u32,
    /// Pods present in the whole machine along y.
    pub machine_pods_y: u32,
    /// Vcache rows on each side (top and bottom) of a pod.
    pub num_vcache_rows: u32,
    /// Column of the first tile of pod (0, 0).
    pub origin_x_cord: u32,
    /// Row of the first tile of pod (0, 0).
    pub origin_y_cord: u32,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            num_tiles_x: defaults::NUM_TILES_X,
            num_tiles_y: defaults::NUM_TILES_Y,
            num_pods_x: defaults::NUM_PODS,
            num_pods_y: defaults::NUM_PODS,
            machine_pods_x: defaults::NUM_PODS,
            machine_pods_y: defaults::NUM_PODS,
            num_vcache_rows: defaults::NUM_VCACHE_ROWS,
            origin_x_cord: defaults::ORIGIN_X_CORD,
            origin_y_cord: defaults::ORIGIN_Y_CORD,
        }
    }
}

/// Vcache geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Associativity.
    pub ways: u32,
    /// Number of sets.
    pub sets: u32,
    /// Block size in bytes.
    pub block_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ways: defaults::CACHE_WAYS,
            sets: defaults::CACHE_SETS,
            block_size: defaults::CACHE_BLOCK_SIZE,
        }
    }
}

/// DRAM hashing and BlackParrot image placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DramConfig {
    /// When true, DRAM is striped across vcaches by the address hash; otherwise
    /// vcaches act as flat block memories.
    pub enabled: bool,
    /// Byte address in manycore DRAM where the BlackParrot image is relocated.
    pub bp_dram_base: u64,
    /// Pod offset written to the bridge.
    pub bp_dram_pod_offset: u64,
}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bp_dram_base: defaults::BP_DRAM_BASE,
            bp_dram_pod_offset: defaults::BP_DRAM_POD_OFFSET,
        }
    }
}

/// Tile group that receives the tile program, relative to the pod origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGroupConfig {
    /// Group origin column inside the pod.
    pub tgo_x: u32,
    /// Group origin row inside the pod.
    pub tgo_y: u32,
    /// Group width.
    pub tg_dim_x: u32,
    /// Group height.
    pub tg_dim_y: u32,
    /// Instruction cache entries per tile.
    pub icache_entries: u64,
    /// Skip striping the tile program's DRAM sections.
    pub skip_dram_instruction_load: bool,
}

impl Default for TileGroupConfig {
    fn default() -> Self {
        Self {
            tgo_x: 0,
            tgo_y: 0,
            tg_dim_x: defaults::NUM_TILES_X,
            tg_dim_y: defaults::NUM_TILES_Y,
            icache_entries: defaults::ICACHE_ENTRIES,
            skip_dram_instruction_load: false,
        }
    }
}

/// NBF field widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NbfConfig {
    /// Bits in a mesh x coordinate.
    pub x_cord_width: u32,
    /// Bits in a mesh y coordinate.
    pub y_cord_width: u32,
    /// Bits in a tile EPA.
    pub addr_width: u32,
}

impl Default for NbfConfig {
    fn default() -> Self {
        Self {
            x_cord_width: defaults::X_CORD_WIDTH,
            y_cord_width: defaults::Y_CORD_WIDTH,
            addr_width: defaults::ADDR_WIDTH,
        }
    }
}

/// Unit of the address following `@` in a memory image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtAddressing {
    /// `@` carries a byte address (objcopy Verilog dumps); the word index is the address / 4.
    #[default]
    Byte,
    /// `@` carries a word index.
    Word,
}

/// Memory image parsing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Unit of `@` addresses.
    pub at_addressing: AtAddressing,
}
