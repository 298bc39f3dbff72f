//! ANSI terminal rendering for glyph grids.
//!
//! Frames are built into one string and written in a single call, so a
//! partially drawn frame is never visible.

use std::io::Write;

use crate::effects::{
    highlight_spans, static_row, FlickerFrame, HighlightGrid, HighlightStyle,
};

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const CLEAR_LINE: &str = "\x1b[K";
const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Text opacity below which a flickering row is drawn dim.
const DIM_OPACITY: f32 = 0.95;

/// Paint one row, coloring highlighted spans.
pub fn paint_row(row: &str, mask: Option<&[bool]>, style: HighlightStyle) -> String {
    if !style.enabled {
        return row.to_string();
    }
    let mut output = String::with_capacity(row.len());
    for span in highlight_spans(row, mask) {
        if span.highlighted {
            output.push_str(&format!("\x1b[{}m", style.color.ansi_code()));
            output.push_str(span.text);
            output.push_str(RESET);
        } else {
            output.push_str(span.text);
        }
    }
    output
}

/// Paint one row as it looks at a flicker instant.
///
/// A terminal can't draw partial opacity or sub-cell offsets, so the layer
/// with the higher opacity wins and a faded row is drawn dim.
pub fn paint_flicker_row(row: &str, frame: &FlickerFrame) -> String {
    if let Some(overlay) = frame.overlay {
        if overlay.opacity > frame.text.opacity {
            return static_row(row);
        }
    }
    if frame.text.opacity < DIM_OPACITY {
        format!("{}{}{}", DIM, row, RESET)
    } else {
        row.to_string()
    }
}

/// Draw already painted lines from the top-left corner.
pub fn render_lines<W: Write, S: AsRef<str>>(out: &mut W, lines: &[S]) -> std::io::Result<()> {
    let mut output = String::new();
    output.push_str(HIDE_CURSOR);
    output.push_str(CURSOR_HOME);
    for line in lines {
        output.push_str(line.as_ref());
        output.push_str(CLEAR_LINE);
        output.push_str("\r\n");
    }
    output.push_str(RESET);

    out.write_all(output.as_bytes())?;
    out.flush()
}

/// Draw a frame, highlighting cells flagged in `highlight`.
pub fn render_frame<W: Write>(
    out: &mut W,
    rows: &[String],
    highlight: Option<&HighlightGrid>,
    style: HighlightStyle,
) -> std::io::Result<()> {
    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(y, row)| paint_row(row, highlight.and_then(|h| h.row(y)), style))
        .collect();
    render_lines(out, &lines)
}

/// Clear the screen before the first frame.
pub fn clear_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.write_all(format!("{}{}", CLEAR_SCREEN, CURSOR_HOME).as_bytes())?;
    out.flush()
}

/// Restore the cursor after the last frame.
pub fn finish<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.write_all(format!("{}{}", RESET, SHOW_CURSOR).as_bytes())?;
    out.flush()
}

/// Print a grid as plain lines, without cursor control.
pub fn print_grid<W: Write>(
    out: &mut W,
    rows: &[String],
    highlight: Option<&HighlightGrid>,
    style: HighlightStyle,
) -> std::io::Result<()> {
    for (y, row) in rows.iter().enumerate() {
        writeln!(out, "{}", paint_row(row, highlight.and_then(|h| h.row(y)), style))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{HighlightColor, LayerState};

    fn style(color: HighlightColor) -> HighlightStyle {
        HighlightStyle {
            enabled: true,
            color,
        }
    }

    #[test]
    fn test_paint_row_colors_highlighted_spans() {
        let painted = paint_row("ab", Some(&[false, true][..]), style(HighlightColor::Red));
        assert_eq!(painted, "a\x1b[31mb\x1b[0m");
    }

    #[test]
    fn test_paint_row_disabled_is_plain() {
        let disabled = HighlightStyle {
            enabled: false,
            color: HighlightColor::Red,
        };
        assert_eq!(paint_row("ab", Some(&[true, true][..]), disabled), "ab");
    }

    #[test]
    fn test_paint_row_without_mask() {
        assert_eq!(paint_row("abc", None, HighlightStyle::default()), "abc");
        assert_eq!(paint_row("", None, HighlightStyle::default()), "");
    }

    #[test]
    fn test_render_frame_wraps_in_cursor_control() {
        let mut out = Vec::new();
        let rows = vec!["@@".to_string(), "..".to_string()];
        render_frame(&mut out, &rows, None, HighlightStyle::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?25l\x1b[H@@"));
        assert!(text.contains("..\x1b[K\r\n"));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_print_grid_highlights_by_row() {
        let mut out = Vec::new();
        let rows = vec!["ab".to_string(), "cd".to_string()];
        let mask = HighlightGrid::from_rows(vec![vec![false, false], vec![true, true]]);
        print_grid(&mut out, &rows, Some(&mask), style(HighlightColor::Green)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "ab\n\x1b[32mcd\x1b[0m\n");
    }

    #[test]
    fn test_flicker_overlay_wins_when_brighter() {
        let frame = FlickerFrame {
            text: LayerState {
                opacity: 0.0,
                offset_px: 0.0,
            },
            overlay: Some(LayerState {
                opacity: 1.0,
                offset_px: 0.0,
            }),
        };
        assert_eq!(paint_flicker_row("abc", &frame), "///");
    }

    #[test]
    fn test_flicker_dims_faded_row() {
        let frame = FlickerFrame {
            text: LayerState {
                opacity: 0.9,
                offset_px: 0.5,
            },
            overlay: None,
        };
        assert_eq!(paint_flicker_row("ab", &frame), "\x1b[2mab\x1b[0m");
        let steady = FlickerFrame {
            text: LayerState {
                opacity: 1.0,
                offset_px: 0.0,
            },
            overlay: None,
        };
        assert_eq!(paint_flicker_row("ab", &steady), "ab");
    }
}
