use std::io::Write;

use abstractor_core::ExtractionOutcome;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extracted abstract and the SDG classification table.
pub fn print_outcome(
    w: &mut dyn Write,
    outcome: &ExtractionOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Abstract".bold())?;
    } else {
        writeln!(w, "Abstract")?;
    }
    writeln!(w, "{}", outcome.abstract_text)?;
    writeln!(w)?;

    if outcome.sdg.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "No SDG classification available.".dimmed())?;
        } else {
            writeln!(w, "No SDG classification available.")?;
        }
        return Ok(());
    }

    if color.enabled() {
        writeln!(w, "{}", "SDG classification".bold())?;
    } else {
        writeln!(w, "SDG classification")?;
    }
    for score in &outcome.sdg {
        if color.enabled() {
            writeln!(w, "  {}: {}%", score.label.green(), score.score)?;
        } else {
            writeln!(w, "  {}: {}%", score.label, score.score)?;
        }
    }
    Ok(())
}
