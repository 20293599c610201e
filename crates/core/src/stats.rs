//! Boot script statistics.
//!
//! Summarizes a generated script for the operator:
//! 1. **Totals:** Writes, fences, unfreezes and whether the script is finished.
//! 2. **Stages:** Command count of every boot stage.
//! 3. **Range warnings:** Image words that fell outside the DRAM window.

use std::fmt;

use crate::boot::{BootCommand, BootScript, BootStage};

/// Counters derived from a [`BootScript`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootStats {
    /// Write commands.
    pub writes: usize,
    /// Fence commands.
    pub fences: usize,
    /// Unfreeze commands.
    pub unfreezes: usize,
    /// Whether the script ends with the finish sentinel.
    pub finished: bool,
    /// Image words not placed anywhere.
    pub out_of_range: usize,
    /// Command count per stage, in stage order.
    pub per_stage: Vec<(BootStage, usize)>,
}

impl BootStats {
    /// Collects the counters of a script.
    pub fn from_script(script: &BootScript) -> Self {
        let mut stats = Self {
            finished: script.is_finished(),
            out_of_range: script.out_of_range().len(),
            per_stage: script
                .stages()
                .iter()
                .map(|(stage, range)| (*stage, range.len()))
                .collect(),
            ..Self::default()
        };
        for command in script.commands() {
            match command {
                BootCommand::Write { .. } => stats.writes += 1,
                BootCommand::Fence => stats.fences += 1,
                BootCommand::Unfreeze(_) => stats.unfreezes += 1,
                BootCommand::Finish => {}
            }
        }
        stats
    }

    /// Total number of commands.
    pub fn total(&self) -> usize {
        self.writes + self.fences + self.unfreezes + usize::from(self.finished)
    }
}

impl fmt::Display for BootStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "BOOT SCRIPT STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "nbf_commands             {}", self.total())?;
        writeln!(f, "nbf_writes               {}", self.writes)?;
        writeln!(f, "nbf_fences               {}", self.fences)?;
        writeln!(f, "nbf_unfreezes            {}", self.unfreezes)?;
        writeln!(f, "nbf_finished             {}", self.finished)?;
        writeln!(f, "dram_out_of_range        {}", self.out_of_range)?;
        writeln!(f, "----------------------------------------------------------")?;
        for (stage, count) in &self.per_stage {
            writeln!(f, "stage.{:<20}{}", stage.name(), count)?;
        }
        write!(f, "----------------------------------------------------------")
    }
}
