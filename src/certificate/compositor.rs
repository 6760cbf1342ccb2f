//! Certificate compositor: template underlay plus positioned text overlays.
//!
//! All overlay geometry is authored in a fixed 1080x1080 design space and
//! rescaled to the loaded template's pixel dimensions at draw time, so the
//! same layout holds for any template resolution.

use super::surface::{hex_color, Surface};
use super::{template, CertError};

/// Side length of the design coordinate system.
pub const DESIGN_SIZE: f32 = 1080.0;

/// Line height factor applied to the overlay font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// One text element to composite, positioned in design-space units.
#[derive(Clone, Debug)]
pub struct TextOverlay {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// `#RRGGBB` fill color.
    pub color: String,
    pub max_width: f32,
    pub max_lines: usize,
    pub value: String,
    pub h_align: HAlign,
}

/// Render a full certificate: load the template (the only await), size the
/// surface to match it, blit it as the base layer and paint the overlays in
/// order. A template that fails to load or decode rejects the whole render
/// before the surface is touched.
pub async fn render_certificate<S: Surface>(
    http: &reqwest::Client,
    template_ref: &str,
    surface: &mut S,
    overlays: &[TextOverlay],
) -> Result<(), CertError> {
    let template = template::load_template(http, template_ref).await?;

    surface.resize(template.width(), template.height());
    surface.draw_image(&template);
    draw_overlays(surface, overlays)
}

/// Paint overlays onto an already-sized surface.
pub fn draw_overlays<S: Surface>(surface: &mut S, overlays: &[TextOverlay]) -> Result<(), CertError> {
    // Validate every color before the first pixel goes down; a bad overlay
    // must not leave a half-painted surface behind.
    let colors = overlays
        .iter()
        .map(|o| hex_color(&o.color))
        .collect::<Result<Vec<_>, _>>()?;

    let scale_x = surface.width() as f32 / DESIGN_SIZE;
    let scale_y = surface.height() as f32 / DESIGN_SIZE;

    for (overlay, color) in overlays.iter().zip(colors) {
        let px = overlay.font_size * scale_y;
        let max_width = overlay.max_width * scale_x;
        let line_height = overlay.font_size * LINE_HEIGHT_FACTOR * scale_y;

        let lines = wrap_text(
            |s| surface.measure_text(s, px),
            &overlay.value,
            max_width,
            overlay.max_lines,
        );
        if lines.is_empty() {
            continue;
        }

        let anchor_x = overlay.x * scale_x;
        let total_height = line_height * (lines.len() - 1) as f32;
        let mut baseline = overlay.y * scale_y - total_height / 2.0;

        for line in &lines {
            let width = surface.measure_text(line, px);
            let x = match overlay.h_align {
                HAlign::Left => anchor_x,
                HAlign::Center => anchor_x - width / 2.0,
                HAlign::Right => anchor_x - width,
            };
            surface.fill_text(line, x, baseline, px, color);
            baseline += line_height;
        }
    }

    Ok(())
}

/// Greedy word wrap. A word joins the current line unless the widened line
/// would exceed `max_width` while the current line is non-empty; a single
/// word wider than `max_width` is never split. Lines past `max_lines` are
/// dropped without an ellipsis.
pub fn wrap_text<F>(measure: F, value: &str, max_width: f32, max_lines: usize) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in value.split(' ') {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&test) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = test;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.truncate(max_lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba};

    /// Recording surface with a deterministic text metric: every char is
    /// half the font size wide.
    struct FakeSurface {
        width: u32,
        height: u32,
        lines: Vec<DrawnLine>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct DrawnLine {
        text: String,
        x: f32,
        baseline: f32,
        px: f32,
    }

    impl FakeSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                lines: Vec::new(),
            }
        }
    }

    impl Surface for FakeSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
        }

        fn draw_image(&mut self, _image: &DynamicImage) {}

        fn measure_text(&self, text: &str, px: f32) -> f32 {
            text.chars().count() as f32 * px * 0.5
        }

        fn fill_text(&mut self, text: &str, x: f32, baseline: f32, px: f32, _color: Rgba<u8>) {
            self.lines.push(DrawnLine {
                text: text.to_string(),
                x,
                baseline,
                px,
            });
        }
    }

    fn overlay(value: &str) -> TextOverlay {
        TextOverlay {
            x: 550.0,
            y: 480.0,
            font_size: 48.0,
            color: "#000000".into(),
            max_width: 800.0,
            max_lines: 2,
            value: value.into(),
            h_align: HAlign::Center,
        }
    }

    fn by_len(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn wraps_greedily_at_max_width() {
        let lines = wrap_text(by_len, "aaa bbb ccc ddd", 7.0, 10);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn overlong_word_stays_on_its_own_line() {
        let lines = wrap_text(by_len, "hi incomprehensibilities yo", 10.0, 10);
        assert_eq!(lines, vec!["hi", "incomprehensibilities", "yo"]);
    }

    #[test]
    fn truncates_to_max_lines_without_ellipsis() {
        let lines = wrap_text(by_len, "one two three four five six", 7.0, 1);
        assert_eq!(lines, vec!["one two"]);
    }

    #[test]
    fn empty_value_produces_no_lines() {
        assert!(wrap_text(by_len, "", 10.0, 3).is_empty());
        assert!(wrap_text(by_len, " ", 10.0, 3).is_empty());
    }

    #[test]
    fn rewrapping_wrapped_lines_is_stable() {
        let first = wrap_text(by_len, "the quick brown fox jumps over the lazy dog", 15.0, 10);
        let rejoined = first.join(" ");
        let second = wrap_text(by_len, &rejoined, 15.0, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn single_line_is_vertically_centered_on_anchor() {
        // "Jane Doe" at 48px: 8 chars * 24 = 192 wide, well under 800.
        let mut surface = FakeSurface::new(1080, 1080);
        draw_overlays(&mut surface, &[overlay("Jane Doe")]).unwrap();

        assert_eq!(surface.lines.len(), 1);
        let line = &surface.lines[0];
        assert_eq!(line.text, "Jane Doe");
        assert_eq!(line.baseline, 480.0);
        assert_eq!(line.px, 48.0);
        // centered: anchor 550 minus half of the 192px measured width
        assert_eq!(line.x, 550.0 - 96.0);
    }

    #[test]
    fn two_lines_straddle_the_anchor() {
        // Force a wrap: each word is 20 chars = 480px at 48px, two words
        // together exceed maxWidth 800.
        let mut surface = FakeSurface::new(1080, 1080);
        let text = format!("{} {}", "a".repeat(20), "b".repeat(20));
        draw_overlays(&mut surface, &[overlay(&text)]).unwrap();

        assert_eq!(surface.lines.len(), 2);
        let line_height = 48.0 * 1.2;
        assert_eq!(surface.lines[0].baseline, 480.0 - line_height / 2.0);
        assert_eq!(surface.lines[1].baseline, 480.0 + line_height / 2.0);
    }

    #[test]
    fn max_lines_drops_overflow_when_drawing() {
        let mut surface = FakeSurface::new(1080, 1080);
        let mut o = overlay(&"word ".repeat(30));
        o.max_lines = 1;
        draw_overlays(&mut surface, &[o]).unwrap();
        assert_eq!(surface.lines.len(), 1);
    }

    #[test]
    fn doubled_template_doubles_every_metric() {
        let mut base = FakeSurface::new(1080, 1080);
        draw_overlays(&mut base, &[overlay("Jane Doe")]).unwrap();

        let mut doubled = FakeSurface::new(2160, 2160);
        draw_overlays(&mut doubled, &[overlay("Jane Doe")]).unwrap();

        let (a, b) = (&base.lines[0], &doubled.lines[0]);
        assert_eq!(b.px, a.px * 2.0);
        assert_eq!(b.baseline, a.baseline * 2.0);
        assert_eq!(b.x, a.x * 2.0);
    }

    #[test]
    fn overlays_paint_in_order() {
        let mut surface = FakeSurface::new(1080, 1080);
        draw_overlays(&mut surface, &[overlay("under"), overlay("over")]).unwrap();
        assert_eq!(surface.lines[0].text, "under");
        assert_eq!(surface.lines[1].text, "over");
    }

    #[test]
    fn bad_color_rejects_before_any_paint() {
        let mut surface = FakeSurface::new(1080, 1080);
        let mut bad = overlay("late");
        bad.color = "#XYZ".into();
        let res = draw_overlays(&mut surface, &[overlay("first"), bad]);
        assert!(res.is_err());
        assert!(surface.lines.is_empty());
    }
}
