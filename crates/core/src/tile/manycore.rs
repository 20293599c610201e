//! Stock tile helpers for a manycore pod.
//!
//! Writes the tile CSRs of the tile group, loads the tile program into the
//! icaches, data memories and DRAM, and sets up the vcaches around the pod.

use tracing::debug;

use super::{TileConfigurator, TileProgram, csr};
use crate::boot::BootScript;
use crate::common::constants::{DRAM_EVA_BASE_BYTE, DRAM_EVA_BASE_WORD};
use crate::common::{Coord, clog2};
use crate::config::Config;
use crate::topology::DerivedTopology;
use crate::translate::AddressTranslator;

/// Vcache tag word: valid bit.
const TAG_VALID: u32 = 1 << 31;
/// Vcache tag word: lock bit (block-memory lines are never evicted).
const TAG_LOCK: u32 = 1 << 30;

/// Vcache wormhole destination: DRAM controller on the west edge.
const WH_DEST_WEST: u32 = 0;
/// Vcache wormhole destination: DRAM controller on the east edge.
const WH_DEST_EAST: u32 = 1;

/// Tile helpers for the stock manycore pod.
#[derive(Clone, Debug)]
pub struct ManycoreTiles {
    num_tiles_x: u32,
    num_tiles_y: u32,
    num_vcache_rows: u32,
    machine_pods_x: u32,
    tgo: Coord,
    tg_dim: Coord,
    addr_width: u32,
    icache_entries: u64,
    cache_ways: u32,
    cache_sets: u32,
    block_bits: u32,
    skip_dram_instruction_load: bool,
    program: Option<TileProgram>,
}

impl ManycoreTiles {
    /// Creates the helpers for a validated configuration.
    ///
    /// Without a `program` the icache, DMEM and DRAM loads emit nothing and
    /// the tiles start at the beginning of DRAM.
    pub fn new(config: &Config, topology: &DerivedTopology, program: Option<TileProgram>) -> Self {
        let tg = &config.tile_group;
        Self {
            num_tiles_x: topology.num_tiles_x,
            num_tiles_y: topology.num_tiles_y,
            num_vcache_rows: topology.num_vcache_rows,
            machine_pods_x: topology.machine_pods_x,
            tgo: Coord::new(tg.tgo_x, tg.tgo_y),
            tg_dim: Coord::new(tg.tg_dim_x, tg.tg_dim_y),
            addr_width: config.nbf.addr_width,
            icache_entries: tg.icache_entries,
            cache_ways: config.cache.ways,
            cache_sets: config.cache.sets,
            block_bits: topology.fields.block,
            skip_dram_instruction_load: tg.skip_dram_instruction_load,
            program,
        }
    }

    /// The loaded tile program, if any.
    pub const fn program(&self) -> Option<&TileProgram> {
        self.program.as_ref()
    }

    /// EPA of icache entry `index`.
    pub const fn icache_epa(&self, index: u64) -> u64 {
        (1 << (self.addr_width - 1)) | index
    }

    /// EPA of the tag of `(way, set)` in a vcache.
    pub const fn vcache_tag_epa(&self, way: u32, set: u32) -> u64 {
        let line = (way as u64) * (self.cache_sets as u64) + set as u64;
        (1 << (self.addr_width - 1)) | (line << self.block_bits)
    }

    /// EPA of the vcache wormhole destination register.
    pub const fn vcache_wh_dest_epa(&self) -> u64 {
        1 << (self.addr_width - 2)
    }

    /// Coordinates of every vcache of a pod, top rows first.
    pub fn vcaches(&self, pod: Coord) -> Vec<Coord> {
        let mut out = Vec::new();
        for r in 0..self.num_vcache_rows {
            if let Some(y) = pod.y.checked_sub(1 + r) {
                out.extend((0..self.num_tiles_x).map(|i| Coord::new(pod.x + i, y)));
            }
        }
        for r in 0..self.num_vcache_rows {
            let y = pod.y + self.num_tiles_y + r;
            out.extend((0..self.num_tiles_x).map(|i| Coord::new(pod.x + i, y)));
        }
        out
    }

    fn write_all(&self, script: &mut BootScript, pod: Coord, epa: u64, value: u32) {
        for tile in self.tile_group(pod) {
            script.write(tile.x, tile.y, epa, value);
        }
    }
}

impl TileConfigurator for ManycoreTiles {
    fn tile_group(&self, pod: Coord) -> Vec<Coord> {
        let origin = pod.offset(self.tgo.x, self.tgo.y);
        (0..self.tg_dim.x)
            .flat_map(|dx| (0..self.tg_dim.y).map(move |dy| origin.offset(dx, dy)))
            .collect()
    }

    fn configure_tile_group(&self, script: &mut BootScript, pod: Coord) {
        let origin = pod.offset(self.tgo.x, self.tgo.y);
        for tile in self.tile_group(pod) {
            script.write(tile.x, tile.y, csr::TGO_X, origin.x);
            script.write(tile.x, tile.y, csr::TGO_Y, origin.y);
        }
    }

    fn init_icache(&self, script: &mut BootScript, pod: Coord) {
        let Some(program) = &self.program else {
            return;
        };
        let text: Vec<(u64, u32)> = program
            .dram
            .iter()
            .filter_map(|(word, value)| {
                let index = word.checked_sub(DRAM_EVA_BASE_WORD)?;
                (index < self.icache_entries).then_some((index, value))
            })
            .collect();
        for tile in self.tile_group(pod) {
            for &(index, value) in &text {
                script.write(tile.x, tile.y, self.icache_epa(index), value);
            }
        }
    }

    fn init_dmem(&self, script: &mut BootScript, pod: Coord) {
        let Some(program) = &self.program else {
            return;
        };
        for tile in self.tile_group(pod) {
            for (word, value) in &program.dmem {
                script.write(tile.x, tile.y, word, value);
            }
        }
    }

    fn set_pc_init(&self, script: &mut BootScript, pod: Coord) {
        let entry = self.program.as_ref().map_or(DRAM_EVA_BASE_BYTE, |p| p.entry);
        self.write_all(script, pod, csr::PC_INIT, entry as u32);
    }

    fn init_vcache_wh_dest(&self, script: &mut BootScript, pod: Coord, pod_column: u32) {
        let cols = u64::from(self.num_tiles_x);
        let midpoint = u64::from(self.machine_pods_x) * cols / 2;
        let epa = self.vcache_wh_dest_epa();
        for vcache in self.vcaches(pod) {
            let global_column = u64::from(pod_column) * cols + u64::from(vcache.x - pod.x);
            let dest = if global_column < midpoint {
                WH_DEST_WEST
            } else {
                WH_DEST_EAST
            };
            script.write(vcache.x, vcache.y, epa, dest);
        }
    }

    fn disable_dram(&self, script: &mut BootScript, pod: Coord) {
        self.write_all(script, pod, csr::DRAM_ENABLE, 0);
    }

    fn init_vcache(&self, script: &mut BootScript, pod: Coord) {
        for vcache in self.vcaches(pod) {
            for way in 0..self.cache_ways {
                for set in 0..self.cache_sets {
                    let tag = TAG_VALID | TAG_LOCK | way;
                    script.write(vcache.x, vcache.y, self.vcache_tag_epa(way, set), tag);
                }
            }
        }
    }

    fn init_dram(&self, script: &mut BootScript, pod: Coord, translator: &AddressTranslator) {
        if self.skip_dram_instruction_load {
            debug!(%pod, "skipping tile program DRAM load");
            return;
        }
        let Some(program) = &self.program else {
            return;
        };
        let stripe = translator.stripe(&program.dram, pod);
        for (loc, value) in stripe.writes {
            script.write_to(loc, value);
        }
        script.note_out_of_range(stripe.out_of_range);
    }
}
