//! Boot sequence state machine.
//!
//! The sequence is fixed: every stage runs exactly once, in the order of
//! [`BootStage::ALL`], and there is no way back to an earlier stage. Fences are
//! only ever placed by the stages whose [`BootStage::ends_with_fence`] is true.
//!
//! The configuration is validated and the translator built before the first
//! command exists, so a rejected topology produces no script at all. A parse
//! error in the memory image aborts the run from the stripe stage; the partial
//! script is dropped and no finish sentinel is produced.

use std::path::PathBuf;

use tracing::{debug, info};

use super::command::BootStage;
use super::script::BootScript;
use crate::common::constants::{BP_RESET_PC, bp_bridge, bp_cfg};
use crate::common::{ConfigError, NbfError};
use crate::config::{AtAddressing, Config};
use crate::image::{MemoryImage, parse_mem_str, read_mem_file};
use crate::tile::TileConfigurator;
use crate::topology::DerivedTopology;
use crate::translate::AddressTranslator;

/// Where the BlackParrot memory image comes from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// A memory dump file, parsed during the stripe stage.
    File(PathBuf),
    /// A memory dump held in memory.
    Text(String),
    /// An already parsed image; addresses are used as they are.
    Image(MemoryImage),
}

/// Boot sequence generator for one run.
pub struct BootSequencer<'a> {
    topology: DerivedTopology,
    translator: AddressTranslator,
    addressing: AtAddressing,
    tiles: &'a dyn TileConfigurator,
}

impl std::fmt::Debug for BootSequencer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootSequencer")
            .field("topology", &self.topology)
            .field("translator", &self.translator)
            .field("addressing", &self.addressing)
            .finish_non_exhaustive()
    }
}

impl<'a> BootSequencer<'a> {
    /// Creates a sequencer.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration; validated here.
    /// * `topology` - Coordinates derived from `config`.
    /// * `tiles` - Per-pod tile helpers.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid geometry or a DRAM hash the
    /// topology cannot express.
    pub fn new(
        config: &Config,
        topology: DerivedTopology,
        tiles: &'a dyn TileConfigurator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let translator = AddressTranslator::new(&topology)?;
        Ok(Self {
            topology,
            translator,
            addressing: config.image.at_addressing,
            tiles,
        })
    }

    /// Derived topology in use.
    pub const fn topology(&self) -> &DerivedTopology {
        &self.topology
    }

    /// Address translator in use.
    pub const fn translator(&self) -> &AddressTranslator {
        &self.translator
    }

    /// Runs every stage and returns the finished script.
    ///
    /// # Errors
    ///
    /// Returns [`NbfError::Parse`] if the memory image cannot be read.
    pub fn run(&self, image: &ImageSource) -> Result<BootScript, NbfError> {
        let mut script = BootScript::new();
        let mut stage = Some(BootStage::Freeze);
        while let Some(current) = stage {
            script.begin_stage(current);
            self.emit(current, &mut script, image)?;
            script.end_stage();
            debug!(
                stage = %current,
                commands = script.stage_commands(current).len(),
                "boot stage complete"
            );
            stage = current.next();
        }
        info!(
            commands = script.len(),
            out_of_range = script.out_of_range().len(),
            layout = self.translator.layout(),
            "boot script generated"
        );
        Ok(script)
    }

    fn emit(
        &self,
        stage: BootStage,
        script: &mut BootScript,
        image: &ImageSource,
    ) -> Result<(), NbfError> {
        let bp = self.topology.bp_coord;
        match stage {
            BootStage::Freeze => {
                script.write(bp.x, bp.y, bp_cfg::FREEZE, 1);
                script.write(bp.x, bp.y, bp_cfg::NPC, BP_RESET_PC);
            }
            BootStage::CoreConfig => {
                script.write(bp.x, bp.y, bp_cfg::HIO_MASK, 1);
                script.write(bp.x, bp.y, bp_cfg::ICACHE_MODE, 1);
                script.write(bp.x, bp.y, bp_cfg::DCACHE_MODE, 1);
                // Bridge writes acknowledge immediately; drain the credits of
                // the writes above first so the acks never overlap.
                script.fence();
            }
            BootStage::BridgeConfig => {
                let t = &self.topology;
                script.write(bp.x, bp.y, bp_bridge::DRAM_OFFSET, t.bp_dram_base as u32);
                script.write(bp.x, bp.y, bp_bridge::DRAM_POD, t.bp_dram_pod_offset as u32);
                script.write(bp.x, bp.y, bp_bridge::HOST_CORD, t.host_cord as u32);
                script.fence();
            }
            BootStage::ConfigBarrier | BootStage::BarrierAfterStripe => script.fence(),
            BootStage::PerPodConfig => self.configure_pods(script),
            BootStage::DramStripe => self.stripe_image(script, image)?,
            BootStage::Unfreeze => {
                for pod in &self.topology.pods {
                    for tile in self.tiles.tile_group(pod.origin) {
                        script.unfreeze(tile);
                    }
                }
                script.write(bp.x, bp.y, bp_cfg::FREEZE, 0);
            }
            BootStage::Finish => script.finish(),
        }
        Ok(())
    }

    fn configure_pods(&self, script: &mut BootScript) {
        for pod in &self.topology.pods {
            let origin = pod.origin;
            self.tiles.configure_tile_group(script, origin);
            self.tiles.init_icache(script, origin);
            self.tiles.init_dmem(script, origin);
            self.tiles.set_pc_init(script, origin);
            self.tiles.init_vcache_wh_dest(script, origin, pod.px);

            if !self.topology.dram_enabled {
                self.tiles.disable_dram(script, origin);
                self.tiles.init_vcache(script, origin);
            }

            self.tiles.init_dram(script, origin, &self.translator);
        }
    }

    /// Stripes the BlackParrot image over the origin pod only.
    fn stripe_image(&self, script: &mut BootScript, source: &ImageSource) -> Result<(), NbfError> {
        let base = self.topology.bp_image_base_word;
        let parsed;
        let image = match source {
            ImageSource::File(path) => {
                parsed = read_mem_file(path, base, self.addressing)?;
                &parsed
            }
            ImageSource::Text(text) => {
                parsed = parse_mem_str(text, base, self.addressing)?;
                &parsed
            }
            ImageSource::Image(image) => image,
        };

        // TODO: stripe over every pod once the bridge can address more than one DRAM pod.
        let stripe = self.translator.stripe(image, self.topology.origin);
        for (loc, value) in stripe.writes {
            script.write_to(loc, value);
        }
        script.note_out_of_range(stripe.out_of_range);
        Ok(())
    }
}
