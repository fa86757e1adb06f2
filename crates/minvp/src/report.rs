//! Run summary printed by the CLI.

use minvp_core::{AdjustOutcome, ElementId, MemoryDocument, Phase, ViewportAdjuster, ViewportHost};
use serde::Serialize;

/// What a single initialize + adjust pass did
#[derive(Debug, Serialize)]
pub struct Report {
    pub screen_width: u32,
    pub min_width: Option<u32>,
    pub phase: &'static str,
    pub outcome: &'static str,
    /// Initialization failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Viewport content after the pass
    pub content: Option<String>,
    pub replaced: bool,
}

impl Report {
    pub fn new(
        doc: &MemoryDocument,
        adjuster: &ViewportAdjuster<ElementId>,
        outcome: &AdjustOutcome,
        screen_width: u32,
    ) -> Self {
        let content = adjuster
            .element()
            .and_then(|id| doc.content(id))
            .or_else(|| {
                doc.find_viewport(&adjuster.config().meta_name)
                    .and_then(|id| doc.content(&id))
            });

        Self {
            screen_width,
            min_width: adjuster.min_width(),
            phase: phase_name(adjuster.phase()),
            outcome: outcome_name(outcome),
            error: adjuster.failure().map(|e| e.to_string()),
            content,
            replaced: outcome.mutated(),
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Initialized => "initialized",
        Phase::Adjusted => "adjusted",
        Phase::Failed => "failed",
    }
}

fn outcome_name(outcome: &AdjustOutcome) -> &'static str {
    match outcome {
        AdjustOutcome::Rewritten { .. } => "rewritten",
        AdjustOutcome::WideEnough { .. } => "wide-enough",
        AdjustOutcome::AlreadyAdjusted => "already-adjusted",
        AdjustOutcome::NoWidthDirective => "no-width-directive",
        AdjustOutcome::NotInitialized => "not-initialized",
        AdjustOutcome::HostUnavailable(_) => "host-unavailable",
    }
}
