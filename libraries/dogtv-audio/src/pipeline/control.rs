//! Control hand-off from the UI/session thread to the audio thread
//!
//! Commands are plain `Copy` values sent through a bounded channel. The
//! sender never blocks; the audio thread drains the queue between buffers,
//! so every command is applied whole.

use super::preset::StageParameters;
use super::stage::{StageKind, StageOrder};
use crate::error::{AudioError, Result};
use crossbeam_channel::{Sender, TrySendError};
use dogtv_core::{AudioSettings, Scene};
use tracing::{debug, warn};

/// Commands queued before the audio thread falls behind
pub const CONTROL_QUEUE_CAPACITY: usize = 64;

/// Parameter change destined for the audio thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineCommand {
    UpdateSettings(AudioSettings),
    ApplyScene(Scene),
    SetStageParameters(StageParameters),
    OptimizeOrder,
    SetOrder(StageOrder),
    BypassAll(bool),
    BypassStage(StageKind, bool),
    Reset,
}

/// Cloneable handle for changing a running pipeline
#[derive(Debug, Clone)]
pub struct PipelineController {
    sender: Sender<PipelineCommand>,
}

impl PipelineController {
    pub(crate) fn new(sender: Sender<PipelineCommand>) -> Self {
        Self { sender }
    }

    /// Queue a command without blocking
    pub fn send(&self, command: PipelineCommand) -> Result<()> {
        match self.sender.try_send(command) {
            Ok(()) => {
                debug!(?command, "Queued pipeline command");
                Ok(())
            }
            Err(TrySendError::Full(command)) => {
                warn!(?command, "Pipeline control queue full, dropping command");
                Err(AudioError::ControlQueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(AudioError::PipelineClosed),
        }
    }

    pub fn update_settings(&self, settings: AudioSettings) -> Result<()> {
        self.send(PipelineCommand::UpdateSettings(settings))
    }

    pub fn apply_scene(&self, scene: Scene) -> Result<()> {
        self.send(PipelineCommand::ApplyScene(scene))
    }

    pub fn set_stage_parameters(&self, parameters: StageParameters) -> Result<()> {
        self.send(PipelineCommand::SetStageParameters(parameters))
    }

    pub fn optimize_pipeline_order(&self) -> Result<()> {
        self.send(PipelineCommand::OptimizeOrder)
    }

    pub fn set_stage_order(&self, order: StageOrder) -> Result<()> {
        self.send(PipelineCommand::SetOrder(order))
    }

    pub fn bypass_pipeline(&self, bypass: bool) -> Result<()> {
        self.send(PipelineCommand::BypassAll(bypass))
    }

    pub fn set_stage_bypass(&self, stage: StageKind, bypass: bool) -> Result<()> {
        self.send(PipelineCommand::BypassStage(stage, bypass))
    }

    pub fn reset(&self) -> Result<()> {
        self.send(PipelineCommand::Reset)
    }

    /// Commands waiting to be applied
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}
