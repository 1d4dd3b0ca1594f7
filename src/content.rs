//! Content stream generation for page text.

use crate::page::SpanLayout;
use crate::PDFError;
use std::io::Write;

/// Renders text spans to a PDF content stream.
///
/// Consecutive spans sharing a font, colour, and opacity are drawn inside a single `BT`/`ET`
/// text object, each positioned with its own absolute text matrix. Every text object is
/// wrapped in `q`/`Q` so that the colour and graphics state it sets never leak into the next.
/// Opacities below 1.0 select the graphics state `/GSn`, where `n` is the opacity's index in
/// `opacities`.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_spans(spans: &[SpanLayout], opacities: &[f32]) -> Result<Vec<u8>, PDFError> {
    let mut content: Vec<u8> = Vec::default();

    for batch in spans.chunk_by(|a, b| a.same_style(b)) {
        // chunk_by never yields an empty slice
        let first = &batch[0];

        write!(content, "q\n")?;
        if let Some(index) = graphics_state(first.opacity, opacities) {
            write!(content, "/GS{index} gs\n")?;
        }
        write!(content, "{}\n", first.colour.fill_operator())?;
        write!(content, "BT\n")?;
        write!(content, "/F{} {} Tf\n", first.font.index, first.font.size)?;
        for span in batch {
            write!(content, "1 0 0 1 {} {} Tm\n", span.coords.0, span.coords.1)?;
            write!(content, "<")?;
            for gid in span.glyphs.iter() {
                write!(content, "{gid:04x}")?;
            }
            write!(content, "> Tj\n")?;
        }
        write!(content, "ET\n")?;
        write!(content, "Q\n")?;
    }

    Ok(content)
}

fn graphics_state(opacity: f32, opacities: &[f32]) -> Option<usize> {
    if opacity >= 1.0 {
        return None;
    }
    opacities.iter().position(|&o| o == opacity)
}

/// The distinct opacities below 1.0 used by `spans`, in order of first use
pub(crate) fn collect_opacities<'s>(spans: impl IntoIterator<Item = &'s SpanLayout>) -> Vec<f32> {
    let mut opacities: Vec<f32> = Vec::new();
    for span in spans {
        if span.opacity < 1.0 && !opacities.contains(&span.opacity) {
            opacities.push(span.opacity);
        }
    }
    opacities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::page::SpanFont;
    use crate::units::Pt;

    fn span(text: &str, size: f32, opacity: f32, x: f32) -> SpanLayout {
        SpanLayout {
            text: text.to_string(),
            glyphs: text.chars().map(|ch| ch as u16).collect(),
            font: SpanFont {
                index: 0,
                size: Pt(size),
            },
            colour: if opacity < 1.0 {
                colours::WHITE
            } else {
                colours::BLACK
            },
            opacity,
            coords: (Pt(x), Pt(700.0)),
        }
    }

    fn rendered(spans: &[SpanLayout]) -> String {
        let opacities = collect_opacities(spans);
        let content = render_spans(spans, &opacities).expect("can render");
        String::from_utf8(content).expect("content is ascii")
    }

    #[test]
    fn empty_pages_have_empty_content() {
        assert!(rendered(&[]).is_empty());
    }

    #[test]
    fn same_style_glyphs_share_a_text_object() {
        let spans = [span("a", 0.1, 0.01, 72.0), span("b", 0.1, 0.01, 72.5)];
        let content = rendered(&spans);

        assert_eq!(content.matches("BT").count(), 1);
        assert_eq!(content.matches(" Tm").count(), 2);
        assert!(content.contains("/GS0 gs\n"));
        assert!(content.contains("1 0 0 1 72.5 700 Tm\n<0062> Tj\n"));
    }

    #[test]
    fn style_changes_start_a_new_wrapped_block() {
        let spans = [
            span("He", 10.0, 1.0, 72.0),
            span("x", 0.1, 0.01, 82.0),
            span("y", 0.1, 0.01, 82.1),
            span("llo", 10.0, 1.0, 82.2),
        ];
        let content = rendered(&spans);

        assert_eq!(content.matches("BT").count(), 3);
        assert_eq!(content.matches("q\n").count(), 3);
        assert_eq!(content.matches("Q\n").count(), 3);
        // opaque text never selects a graphics state
        assert_eq!(content.matches(" gs").count(), 1);
        assert!(content.starts_with("q\n0 g\nBT\n/F0 10 Tf\n1 0 0 1 72 700 Tm\n<00480065> Tj\n"));
    }

    #[test]
    fn opacities_are_collected_once() {
        let spans = [
            span("a", 0.1, 0.01, 0.0),
            span("b", 10.0, 1.0, 0.0),
            span("c", 0.1, 0.5, 0.0),
            span("d", 0.1, 0.01, 0.0),
        ];
        assert_eq!(collect_opacities(&spans), vec![0.01, 0.5]);
    }
}
