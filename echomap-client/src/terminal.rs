//! Terminal rendering for the `echomap` CLI.

use colored::Colorize;
use echomap_core::Coordinates;

use crate::view::{ComposerOutcome, MapView, NoteMarker, Viewport};

/// Prints markers and composer events instead of drawing a map.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalMapView {
    pub quiet: bool
}

/// One line per marker: `#id  (lat, lng)  posted_at  text`.
#[must_use]
pub fn format_marker(marker: &NoteMarker) -> String {
    format!(
        "#{:<4} ({}) {} {}",
        marker.id, marker.position, marker.posted_at, marker.text
    )
}

/// Status line printed when the composer closes.
#[must_use]
pub fn composer_closed_line(outcome: ComposerOutcome) -> &'static str {
    match outcome {
        ComposerOutcome::Committed => "note posted",
        ComposerOutcome::Cancelled => "draft discarded"
    }
}

impl MapView for TerminalMapView {
    fn render_markers(&self, markers: &[NoteMarker]) {
        if self.quiet {
            return;
        }
        if markers.is_empty() {
            println!("{}", "No notes yet.".dimmed());
            return;
        }
        println!("{}", format!("{} notes", markers.len()).bold().underline());
        for marker in markers {
            println!("{}", format_marker(marker));
        }
    }

    fn recenter(&self, viewport: Viewport) {
        eprintln!(
            "{} centered on ({}) at zoom {}",
            "info:".blue().bold(),
            viewport.center,
            viewport.zoom
        );
    }

    fn open_composer(&self, position: Coordinates) {
        eprintln!("{} new note at ({position})", "info:".blue().bold());
    }

    fn close_composer(&self, outcome: ComposerOutcome) {
        let line = composer_closed_line(outcome);
        match outcome {
            ComposerOutcome::Committed => println!("{} {line}", "✓".green().bold()),
            ComposerOutcome::Cancelled => eprintln!("{} {line}", "info:".blue().bold())
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echomap_core::NoteId;

    #[test]
    fn test_format_marker() {
        let marker = NoteMarker {
            id: NoteId::new(7),
            position: Coordinates::new(51.505, -0.09),
            text: "Hello".to_string(),
            posted_at: "2025-08-20 10:00:00 UTC".to_string()
        };

        assert_eq!(
            format_marker(&marker),
            "#7    (51.5050, -0.0900) 2025-08-20 10:00:00 UTC Hello"
        );
    }

    #[test]
    fn test_render_does_not_panic() {
        let view = TerminalMapView::default();
        view.render_markers(&[]);
        view.show_error("boom");
        view.close_composer(ComposerOutcome::Committed);
        view.close_composer(ComposerOutcome::Cancelled);
    }

    #[test]
    fn test_cancelled_draft_is_not_reported_as_posted() {
        assert_eq!(composer_closed_line(ComposerOutcome::Committed), "note posted");
        assert_eq!(composer_closed_line(ComposerOutcome::Cancelled), "draft discarded");
    }
}
