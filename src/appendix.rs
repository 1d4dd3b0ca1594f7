//! Blocks written after the main content of a document.

use crate::colour::colours;
use crate::layout::{FontRole, Measure, Renderer, Style};
use crate::mix::{random_word, RandomSource, Statistics};
use crate::units::Pt;
use crate::PDFError;

const RED_WORDS: usize = 500;
const HIDDEN_BS: usize = 2000;
const ORANGE_WORDS: usize = 500;
const NUMBERED_ENTRIES: usize = 1000;
const HIDDEN_ZS: usize = 100;

/// Write a summary of a mixed sequence: a bold heading, then one line per count.
pub fn write_statistics<M: Measure + ?Sized>(
    renderer: &mut Renderer<'_, M>,
    stats: &Statistics,
) -> Result<(), PDFError> {
    renderer.move_down(2.0)?;

    let heading = Style::NEUTRAL.with_font(FontRole::Bold);
    renderer.write_visible("Mix statistics", heading)?;
    renderer.new_line()?;

    let mut lines = vec![
        format!("Total pieces: {}", stats.total),
        format!("Visible pieces: {}", stats.visible),
        format!("Invisible pieces: {}", stats.invisible),
        format!("Visibility ratio: {:.2}%", stats.visibility_ratio()),
    ];
    lines.extend(
        stats
            .by_source
            .iter()
            .map(|(source, count)| format!("{source}: {count} pieces")),
    );
    for line in lines {
        renderer.write_visible(&line, Style::NEUTRAL)?;
        renderer.new_line()?;
    }

    renderer.reset_style();
    Ok(())
}

/// Write the fixed block of marker sequences: red and orange random words, long runs of
/// hidden letters, and a numbered list whose entries are each followed by hidden text.
/// Every word is drawn from `rng`.
pub fn write_special_sequences<M, R>(renderer: &mut Renderer<'_, M>, rng: &mut R) -> Result<(), PDFError>
where
    M: Measure + ?Sized,
    R: RandomSource + ?Sized,
{
    renderer.move_down(2.0)?;

    let red = Style::BODY.with_colour(colours::RED).with_size(Pt(10.0));
    renderer.write_visible(&words(rng, RED_WORDS, 5), red)?;
    renderer.new_line()?;

    renderer.write_hidden(&"b".repeat(HIDDEN_BS))?;
    renderer.new_line()?;

    let orange = Style::BODY.with_colour(colours::ORANGE).with_size(Pt(10.0));
    renderer.write_visible(&words(rng, ORANGE_WORDS, 5), orange)?;
    renderer.new_line()?;
    renderer.move_down(1.0)?;

    let hidden_zs = "z".repeat(HIDDEN_ZS);
    for i in 1..=NUMBERED_ENTRIES {
        let entry = format!("{i}. {} ", random_word(rng, 7));
        renderer.write_visible(&entry, Style::NEUTRAL)?;
        renderer.write_hidden(&hidden_zs)?;
    }
    renderer.new_line()?;

    renderer.reset_style();
    tracing::debug!(cursor = ?renderer.cursor(), "wrote special sequences");
    Ok(())
}

/// `count` random words of `length` letters, each followed by a space
fn words<R: RandomSource + ?Sized>(rng: &mut R, count: usize, length: usize) -> String {
    let mut text = String::with_capacity(count * (length + 1));
    for _ in 0..count {
        text.push_str(&random_word(rng, length));
        text.push(' ');
    }
    text
}
