//! Overlay capability
//!
//! The core decides *when* the paused / game-over card appears and what score
//! it shows; the host owns how it looks.

use crate::sim::EndReason;

/// What the overlay should currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayView {
    Hidden,
    /// Paused card with resume and restart affordances
    Paused { score: u64 },
    /// Final card with a restart affordance
    GameOver {
        reason: EndReason,
        score: u64,
        duration_secs: u32,
    },
}

impl OverlayView {
    /// Headline text for the card
    pub fn title(&self) -> Option<String> {
        match self {
            OverlayView::Hidden => None,
            OverlayView::Paused { .. } => Some("Game Paused".to_string()),
            OverlayView::GameOver {
                reason: EndReason::Destroyed,
                ..
            } => Some("Game Over".to_string()),
            OverlayView::GameOver {
                reason: EndReason::Survived,
                duration_secs,
                ..
            } => Some(format!("You Survived {duration_secs} Seconds!")),
        }
    }

    pub fn score(&self) -> Option<u64> {
        match self {
            OverlayView::Hidden => None,
            OverlayView::Paused { score } | OverlayView::GameOver { score, .. } => Some(*score),
        }
    }

    pub fn can_resume(&self) -> bool {
        matches!(self, OverlayView::Paused { .. })
    }

    pub fn can_restart(&self) -> bool {
        !matches!(self, OverlayView::Hidden)
    }
}

/// Notified whenever the overlay should change
pub trait Overlay {
    fn show(&mut self, view: OverlayView);
}

/// Overlay that only logs transitions
#[derive(Debug, Default)]
pub struct LogOverlay {
    pub current: Option<OverlayView>,
}

impl Overlay for LogOverlay {
    fn show(&mut self, view: OverlayView) {
        match (view.title(), view.score()) {
            (Some(title), Some(score)) => log::info!("{title} (score: {score})"),
            _ => log::debug!("Overlay hidden"),
        }
        self.current = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(OverlayView::Hidden.title(), None);
        assert_eq!(
            OverlayView::Paused { score: 20 }.title().as_deref(),
            Some("Game Paused")
        );
        let survived = OverlayView::GameOver {
            reason: EndReason::Survived,
            score: 90,
            duration_secs: 60,
        };
        assert_eq!(survived.title().as_deref(), Some("You Survived 60 Seconds!"));
        assert_eq!(survived.score(), Some(90));
        assert!(!survived.can_resume());
        assert!(survived.can_restart());
    }
}
