//! Boot commands and boot stages.

use std::fmt;

use crate::common::{Coord, PhysicalLocation};

/// One command of a boot script.
///
/// Commands are consumed strictly in order by the host-side loader; they are
/// never merged or reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BootCommand {
    /// Store `value` at a register or memory cell.
    Write {
        /// Destination.
        loc: PhysicalLocation,
        /// Stored value.
        value: u32,
    },
    /// Wait until every previously issued write has been acknowledged.
    Fence,
    /// Release the tile at the coordinate from reset.
    Unfreeze(Coord),
    /// End of script.
    Finish,
}

impl BootCommand {
    /// Shorthand for a write to `(x, y, epa)`.
    #[inline]
    pub const fn write(x: u32, y: u32, epa: u64, value: u32) -> Self {
        Self::Write {
            loc: PhysicalLocation::new(x, y, epa),
            value,
        }
    }

    /// Returns `true` for [`BootCommand::Fence`].
    #[inline]
    pub const fn is_fence(&self) -> bool {
        matches!(self, Self::Fence)
    }
}

impl fmt::Display for BootCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { loc, value } => write!(f, "write {loc} <- {value:#010x}"),
            Self::Fence => write!(f, "fence"),
            Self::Unfreeze(coord) => write!(f, "unfreeze {coord}"),
            Self::Finish => write!(f, "finish"),
        }
    }
}

/// Stages of the boot sequence, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootStage {
    /// Freeze the BlackParrot core and seed its PC.
    Freeze,
    /// Host I/O mask and cache modes, then a fence.
    CoreConfig,
    /// Bridge DRAM offset, pod and host coordinate, then a fence.
    BridgeConfig,
    /// Fence closing the configuration phase.
    ConfigBarrier,
    /// Tile configuration of every pod.
    PerPodConfig,
    /// BlackParrot image striped over the origin pod.
    DramStripe,
    /// Fence draining every store of the stripe.
    BarrierAfterStripe,
    /// Unfreeze every tile group, then the BlackParrot core.
    Unfreeze,
    /// Terminal sentinel.
    Finish,
}

impl BootStage {
    /// Every stage, in order.
    pub const ALL: [Self; 9] = [
        Self::Freeze,
        Self::CoreConfig,
        Self::BridgeConfig,
        Self::ConfigBarrier,
        Self::PerPodConfig,
        Self::DramStripe,
        Self::BarrierAfterStripe,
        Self::Unfreeze,
        Self::Finish,
    ];

    /// The stage that follows this one, or `None` after [`BootStage::Finish`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Freeze => Some(Self::CoreConfig),
            Self::CoreConfig => Some(Self::BridgeConfig),
            Self::BridgeConfig => Some(Self::ConfigBarrier),
            Self::ConfigBarrier => Some(Self::PerPodConfig),
            Self::PerPodConfig => Some(Self::DramStripe),
            Self::DramStripe => Some(Self::BarrierAfterStripe),
            Self::BarrierAfterStripe => Some(Self::Unfreeze),
            Self::Unfreeze => Some(Self::Finish),
            Self::Finish => None,
        }
    }

    /// Returns `true` for the stages that end with a fence.
    pub const fn ends_with_fence(self) -> bool {
        matches!(
            self,
            Self::CoreConfig | Self::BridgeConfig | Self::ConfigBarrier | Self::BarrierAfterStripe
        )
    }

    /// Short name used in logs and statistics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Freeze => "freeze",
            Self::CoreConfig => "core_config",
            Self::BridgeConfig => "bridge_config",
            Self::ConfigBarrier => "config_barrier",
            Self::PerPodConfig => "per_pod_config",
            Self::DramStripe => "dram_stripe",
            Self::BarrierAfterStripe => "barrier_after_stripe",
            Self::Unfreeze => "unfreeze",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for BootStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
