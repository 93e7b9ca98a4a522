//! Turns displayable rows into terminal lines.
//!
//! Text is wrapped on plain content first and styled per line afterwards, so
//! ANSI sequences never count toward the width.

use crate::avatar::Image;
use crate::changeset::{Row, SummaryRow};
use crate::item::RowItem;
use crate::style::{ReviewStyles, SHOW_MORE};
use unicode_width::UnicodeWidthChar;

const AVATAR_LOADED: &str = "◉";
const AVATAR_PLACEHOLDER: &str = "○";

/// Wraps `text` to `width` display columns.
///
/// Breaks at spaces where possible and hard-splits words longer than the
/// width. Explicit newlines are kept. A zero width yields one line per
/// paragraph, unwrapped.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if width == 0 {
            lines.push(paragraph.to_string());
            continue;
        }
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split(' ') {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            let gap = usize::from(!line.is_empty());
            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if line_width + w > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
        lines.push(line);
    }
    lines
}

/// Wrapped review text, cut to the row's truncation limit.
///
/// Returns the visible lines and whether anything was hidden.
pub fn visible_text(item: &RowItem, width: usize) -> (Vec<String>, bool) {
    let mut lines = wrap_text(&item.text.plain, width);
    let limit = item.truncation_limit();
    if limit > 0 && lines.len() > limit {
        lines.truncate(limit);
        (lines, true)
    } else {
        (lines, false)
    }
}

fn avatar_glyph(image: &Image) -> &'static str {
    if image.is_placeholder() {
        AVATAR_PLACEHOLDER
    } else {
        AVATAR_LOADED
    }
}

/// Renders a review row as lines, without a trailing blank line.
pub fn render_review(item: &RowItem, width: usize, styles: &ReviewStyles) -> Vec<String> {
    let mut out = Vec::new();
    out.push(format!(
        "{} {}  {}",
        avatar_glyph(&item.avatar),
        item.username.render(),
        item.rating.render()
    ));

    let (lines, truncated) = visible_text(item, width.saturating_sub(2));
    out.extend(
        lines
            .iter()
            .map(|line| format!("  {}", item.text.render_fragment(line))),
    );

    if !item.photos.is_empty() {
        let loaded = item.photos.iter().filter(|p| !p.is_placeholder()).count();
        out.push(format!("  [{} photos, {} loaded]", item.photos.len(), loaded));
    }
    if truncated {
        out.push(format!("  {}", styles.show_more.render(SHOW_MORE)));
    }
    out.push(format!("  {}", item.created.render()));
    out
}

/// Renders the summary row as a single line.
pub fn render_summary(summary: SummaryRow, styles: &ReviewStyles) -> Vec<String> {
    vec![styles.summary.render(&summary.label())]
}

/// Renders any displayable row.
pub fn render_row(row: Row<'_>, width: usize, styles: &ReviewStyles) -> Vec<String> {
    match row {
        Row::Review(item) => render_review(item, width, styles),
        Row::Summary(summary) => render_summary(summary, styles),
    }
}
