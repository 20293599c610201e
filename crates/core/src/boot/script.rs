//! In-memory boot script.
//!
//! The sequencer and the tile helpers append commands here; nothing is
//! rendered until the whole script has been built, so a failed run never
//! leaves a script with a finish sentinel behind.

use std::ops::Range;

use super::command::{BootCommand, BootStage};
use crate::common::{Coord, PhysicalLocation};

/// Ordered command list with the command range of every boot stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootScript {
    commands: Vec<BootCommand>,
    stages: Vec<(BootStage, Range<usize>)>,
    open: Option<(BootStage, usize)>,
    out_of_range: Vec<u64>,
}

impl BootScript {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a write to `(x, y, epa)`.
    pub fn write(&mut self, x: u32, y: u32, epa: u64, value: u32) {
        self.commands.push(BootCommand::write(x, y, epa, value));
    }

    /// Appends a write to a located cell.
    pub fn write_to(&mut self, loc: PhysicalLocation, value: u32) {
        self.commands.push(BootCommand::Write { loc, value });
    }

    /// Appends a fence.
    pub fn fence(&mut self) {
        self.commands.push(BootCommand::Fence);
    }

    /// Appends an unfreeze of the tile at `coord`.
    pub fn unfreeze(&mut self, coord: Coord) {
        self.commands.push(BootCommand::Unfreeze(coord));
    }

    /// Appends the finish sentinel. Only the sequencer ends a script.
    pub(crate) fn finish(&mut self) {
        self.commands.push(BootCommand::Finish);
    }

    /// Records image words that could not be placed.
    pub fn note_out_of_range(&mut self, addrs: impl IntoIterator<Item = u64>) {
        self.out_of_range.extend(addrs);
    }

    pub(crate) fn begin_stage(&mut self, stage: BootStage) {
        self.end_stage();
        self.open = Some((stage, self.commands.len()));
    }

    pub(crate) fn end_stage(&mut self) {
        if let Some((stage, start)) = self.open.take() {
            self.stages.push((stage, start..self.commands.len()));
        }
    }

    /// All commands in emission order.
    pub fn commands(&self) -> &[BootCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command was emitted.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command index range of a completed stage.
    pub fn stage_range(&self, stage: BootStage) -> Option<Range<usize>> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, r)| r.clone())
    }

    /// Commands emitted by a completed stage.
    pub fn stage_commands(&self, stage: BootStage) -> &[BootCommand] {
        match self.stage_range(stage) {
            Some(r) => &self.commands[r],
            None => &[],
        }
    }

    /// Completed stages with their command ranges, in order.
    pub fn stages(&self) -> &[(BootStage, Range<usize>)] {
        &self.stages
    }

    /// Indices of every fence.
    pub fn fence_positions(&self) -> Vec<usize> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_fence())
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns `true` if the script ends with the finish sentinel.
    pub fn is_finished(&self) -> bool {
        matches!(self.commands.last(), Some(BootCommand::Finish))
    }

    /// Image words that were not placed anywhere.
    pub fn out_of_range(&self) -> &[u64] {
        &self.out_of_range
    }
}
