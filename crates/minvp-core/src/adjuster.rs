//! Viewport Adjuster
//!
//! Enforces a minimum layout width on narrow screens. The page declares
//! the minimum inside its viewport tag:
//!
//! ```html
//! <meta name="viewport" content="width=device-width, min-width=400, initial-scale=1">
//! ```
//!
//! On a 320px screen, [`ViewportAdjuster::adjust`] swaps that tag for
//!
//! ```html
//! <meta name="viewport" content="width=400, min-width=400, initial-scale=1">
//! ```
//!
//! Failures never reach the page. They are logged as warnings and the
//! adjuster becomes a no-op.

use crate::config::AdjusterConfig;
use crate::directive::{ConfigurationError, parse_min_width, rewrite_width};
use crate::host::{HostError, ViewportHost};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why an adjuster is inert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjusterError {
    #[error("No meta[name={0}] tag found. Minimum viewport width cannot be set. Please ensure that the tag is loaded before the adjuster is initialized.")]
    MissingElement(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Viewport adjuster was not initialized. Minimum viewport width cannot be set.")]
    Precondition,
}

/// Lifecycle phase of an adjuster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Minimum width known, tag untouched
    Initialized,
    /// Tag has been replaced at least once
    Adjusted,
    /// Initialization failed; terminal
    Failed,
}

/// Result of a single [`ViewportAdjuster::adjust`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// Tag replaced with the rewritten content
    Rewritten { before: String, after: String },
    /// Screen is at least as wide as the minimum
    WideEnough { screen_width: u32 },
    /// Content already carries the minimum width.
    ///
    /// Also returned when the page itself shipped `width=<minimum>`: the
    /// tag is left in place rather than swapped for an identical copy.
    AlreadyAdjusted,
    /// Content has no width directive to rewrite
    NoWidthDirective,
    /// Initialization did not succeed
    NotInitialized,
    /// The host could not report or update the document
    HostUnavailable(HostError),
}

impl AdjustOutcome {
    /// Whether the document was changed.
    pub fn mutated(&self) -> bool {
        matches!(self, AdjustOutcome::Rewritten { .. })
    }
}

enum State<E> {
    Ready {
        element: E,
        min_width: u32,
        adjusted: bool,
    },
    Failed(AdjusterError),
}

/// Minimum viewport width enforcer for one document.
pub struct ViewportAdjuster<E> {
    config: AdjusterConfig,
    state: State<E>,
}

impl<E: Clone> ViewportAdjuster<E> {
    /// Locate the viewport tag and read its minimum width.
    ///
    /// Never fails outright: a missing tag or directive yields an adjuster
    /// in [`Phase::Failed`] after logging a warning.
    pub fn initialize<H>(host: &H, config: AdjusterConfig) -> Self
    where
        H: ViewportHost<Element = E>,
    {
        let state = match Self::locate(host, &config) {
            Ok((element, min_width)) => {
                debug!("Minimum viewport width set to {}", min_width);
                State::Ready {
                    element,
                    min_width,
                    adjusted: false,
                }
            }
            Err(e) => {
                warn!("{}", e);
                State::Failed(e)
            }
        };

        Self { config, state }
    }

    /// Initialize with the default configuration.
    pub fn with_defaults<H>(host: &H) -> Self
    where
        H: ViewportHost<Element = E>,
    {
        Self::initialize(host, AdjusterConfig::default())
    }

    fn locate<H>(host: &H, config: &AdjusterConfig) -> Result<(E, u32), AdjusterError>
    where
        H: ViewportHost<Element = E>,
    {
        let element = host
            .find_viewport(&config.meta_name)
            .ok_or_else(|| AdjusterError::MissingElement(config.meta_name.clone()))?;
        let content = host.content(&element).unwrap_or_default();
        let min_width = parse_min_width(&content, &config.min_width_key)?;
        Ok((element, min_width))
    }

    /// Widen the viewport if the screen is narrower than the minimum.
    pub fn adjust<H>(&mut self, host: &mut H) -> AdjustOutcome
    where
        H: ViewportHost<Element = E>,
    {
        let State::Ready {
            element,
            min_width,
            adjusted,
        } = &mut self.state
        else {
            warn!("{}", AdjusterError::Precondition);
            return AdjustOutcome::NotInitialized;
        };

        let screen_width = match host.screen_width() {
            Ok(width) => width,
            Err(e) => {
                warn!("Cannot read screen width: {}", e);
                return AdjustOutcome::HostUnavailable(e);
            }
        };

        if screen_width >= *min_width {
            debug!("Screen width {} >= minimum {}, leaving viewport alone", screen_width, min_width);
            return AdjustOutcome::WideEnough { screen_width };
        }

        let before = host.content(element).unwrap_or_default();
        let Some(after) = rewrite_width(&before, &self.config.width_key, *min_width) else {
            warn!(
                "No {} directive in viewport content {:?}; nothing to rewrite",
                self.config.width_key, before
            );
            return AdjustOutcome::NoWidthDirective;
        };

        if after == before {
            debug!("Viewport already at minimum width {}", min_width);
            return AdjustOutcome::AlreadyAdjusted;
        }

        match host.replace_viewport(element, &after) {
            Ok(replacement) => {
                info!("Viewport widened to {} (screen width {})", min_width, screen_width);
                *element = replacement;
                *adjusted = true;
                AdjustOutcome::Rewritten { before, after }
            }
            Err(e) => {
                warn!("Failed to replace viewport tag: {}", e);
                AdjustOutcome::HostUnavailable(e)
            }
        }
    }

    /// Cached minimum width, if initialization succeeded.
    pub fn min_width(&self) -> Option<u32> {
        match &self.state {
            State::Ready { min_width, .. } => Some(*min_width),
            State::Failed(_) => None,
        }
    }

    /// Handle to the current viewport tag.
    pub fn element(&self) -> Option<&E> {
        match &self.state {
            State::Ready { element, .. } => Some(element),
            State::Failed(_) => None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Ready { adjusted: false, .. } => Phase::Initialized,
            State::Ready { adjusted: true, .. } => Phase::Adjusted,
            State::Failed(_) => Phase::Failed,
        }
    }

    /// Initialization error, if any.
    pub fn failure(&self) -> Option<&AdjusterError> {
        match &self.state {
            State::Failed(e) => Some(e),
            State::Ready { .. } => None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &AdjusterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    fn viewport_content(doc: &MemoryDocument) -> String {
        let id = doc.find_viewport("viewport").unwrap();
        doc.content(&id).unwrap()
    }

    #[test]
    fn test_narrow_screen_rewrites_width() {
        let mut doc = MemoryDocument::with_viewport("width=device-width, min-width=400, initial-scale=1", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert_eq!(adjuster.min_width(), Some(400));
        assert_eq!(adjuster.phase(), Phase::Initialized);

        let outcome = adjuster.adjust(&mut doc);

        assert!(outcome.mutated());
        assert_eq!(viewport_content(&doc), "width=400, min-width=400, initial-scale=1");
        assert_eq!(adjuster.phase(), Phase::Adjusted);
        assert_eq!(doc.replacements(), 1);
    }

    #[test]
    fn test_wide_screen_is_untouched() {
        let content = "width=device-width, min-width=400, initial-scale=1";
        for width in [400, 401, 1024] {
            let mut doc = MemoryDocument::with_viewport(content, width);
            let mut adjuster = ViewportAdjuster::with_defaults(&doc);

            assert_eq!(adjuster.adjust(&mut doc), AdjustOutcome::WideEnough { screen_width: width });
            assert_eq!(viewport_content(&doc), content);
            assert_eq!(doc.replacements(), 0);
        }
    }

    #[test]
    fn test_adjust_twice_is_idempotent() {
        let mut doc = MemoryDocument::with_viewport("width=device-width, min-width=400", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        adjuster.adjust(&mut doc);
        let once = viewport_content(&doc);
        let second = adjuster.adjust(&mut doc);

        assert_eq!(second, AdjustOutcome::AlreadyAdjusted);
        assert_eq!(viewport_content(&doc), once);
        assert_eq!(doc.replacements(), 1);
    }

    #[test]
    fn test_page_already_at_minimum() {
        let mut doc = MemoryDocument::with_viewport("width=400, min-width=400", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert_eq!(adjuster.adjust(&mut doc), AdjustOutcome::AlreadyAdjusted);
        assert_eq!(doc.replacements(), 0);
        assert_eq!(adjuster.phase(), Phase::Initialized);
        assert_eq!(viewport_content(&doc), "width=400, min-width=400");
    }

    #[test]
    fn test_adjuster_follows_replacement() {
        let mut doc = MemoryDocument::with_viewport("width=device-width, min-width=400", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);
        let original = *adjuster.element().unwrap();

        adjuster.adjust(&mut doc);

        let current = *adjuster.element().unwrap();
        assert_ne!(original, current);
        assert!(doc.is_attached(current));
        assert!(!doc.is_attached(original));
    }

    #[test]
    fn test_missing_viewport_tag() {
        let mut doc = MemoryDocument::new();
        doc.set_screen_width(320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert_eq!(adjuster.phase(), Phase::Failed);
        assert!(matches!(adjuster.failure(), Some(AdjusterError::MissingElement(_))));
        assert_eq!(adjuster.adjust(&mut doc), AdjustOutcome::NotInitialized);
        assert_eq!(doc.replacements(), 0);
    }

    #[test]
    fn test_non_numeric_min_width() {
        for width in [100, 320, 4000] {
            let mut doc = MemoryDocument::with_viewport("min-width=abc", width);
            let mut adjuster = ViewportAdjuster::with_defaults(&doc);

            assert_eq!(adjuster.min_width(), None);
            assert!(matches!(
                adjuster.failure(),
                Some(AdjusterError::Configuration(ConfigurationError::NonNumeric { .. }))
            ));
            assert_eq!(adjuster.adjust(&mut doc), AdjustOutcome::NotInitialized);
            assert_eq!(viewport_content(&doc), "min-width=abc");
        }
    }

    #[test]
    fn test_missing_min_width() {
        let mut doc = MemoryDocument::with_viewport("width=device-width, initial-scale=1", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert!(matches!(
            adjuster.failure(),
            Some(AdjusterError::Configuration(ConfigurationError::MissingDirective { .. }))
        ));
        assert!(!adjuster.adjust(&mut doc).mutated());
    }

    #[test]
    fn test_no_width_directive() {
        let mut doc = MemoryDocument::with_viewport("min-width=400, initial-scale=1", 320);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert_eq!(adjuster.adjust(&mut doc), AdjustOutcome::NoWidthDirective);
        assert_eq!(doc.replacements(), 0);
    }

    #[test]
    fn test_missing_screen() {
        let mut doc = MemoryDocument::new();
        doc.push_meta(vec![
            (String::from("name"), String::from("viewport")),
            (String::from("content"), String::from("width=device-width, min-width=400")),
        ]);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert_eq!(
            adjuster.adjust(&mut doc),
            AdjustOutcome::HostUnavailable(HostError::NoWindow)
        );
    }

    #[test]
    fn test_screen_rotation_narrowing() {
        let mut doc = MemoryDocument::with_viewport("width=device-width, min-width=400", 800);
        let mut adjuster = ViewportAdjuster::with_defaults(&doc);

        assert!(!adjuster.adjust(&mut doc).mutated());
        doc.set_screen_width(360);
        assert!(adjuster.adjust(&mut doc).mutated());
        assert_eq!(viewport_content(&doc), "width=400, min-width=400");
    }

    #[test]
    fn test_custom_keys() {
        let config = AdjusterConfig {
            meta_name: String::from("viewport"),
            min_width_key: String::from("data-min"),
            width_key: String::from("width"),
        };
        let mut doc = MemoryDocument::with_viewport("width=device-width, data-min=600", 375);
        let mut adjuster = ViewportAdjuster::initialize(&doc, config);

        assert_eq!(adjuster.min_width(), Some(600));
        adjuster.adjust(&mut doc);
        assert_eq!(viewport_content(&doc), "width=600, data-min=600");
    }

    #[test]
    fn test_independent_instances() {
        let mut narrow = MemoryDocument::with_viewport("width=device-width, min-width=400", 320);
        let mut wide = MemoryDocument::with_viewport("width=device-width, min-width=400", 1280);
        let mut a = ViewportAdjuster::with_defaults(&narrow);
        let mut b = ViewportAdjuster::with_defaults(&wide);

        assert!(a.adjust(&mut narrow).mutated());
        assert!(!b.adjust(&mut wide).mutated());
        assert_eq!(b.phase(), Phase::Initialized);
    }
}
