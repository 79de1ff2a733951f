use crate::ast::{Line, Segment, Song, Tag, ARTIST, SUBTITLE, TITLE};
use quick_xml::escape::escape;

/// Convert a Song to HTML.
///
/// Every line is a `row` div; every segment is a `column` with the chord above
/// its lyrics, so CSS can keep chords aligned without monospace fonts. Source
/// comments are not rendered.
pub fn to_html(song: &Song) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"chord-sheet\">\n");
    for line in &song.lines {
        html.push_str(&line_to_html(line));
    }
    html.push_str("</div>\n");
    html
}

fn line_to_html(line: &Line) -> String {
    match line {
        Line::Lyrics(segments) if segments.is_empty() => "  <div class=\"empty-line\"></div>\n".to_string(),
        Line::Lyrics(segments) => {
            let mut html = String::new();
            html.push_str("  <div class=\"row\">\n");
            for segment in segments {
                html.push_str(&segment_to_html(segment));
            }
            html.push_str("  </div>\n");
            html
        }
        Line::Tag(tag) => tag_to_html(tag),
        Line::Comment(_) => String::new(),
    }
}

fn segment_to_html(segment: &Segment) -> String {
    let chord = if segment.has_chord() {
        let chord = escape(segment.chord.as_str());
        format!("<div class=\"chord\" data-chord=\"{}\">{}</div>", chord, chord)
    } else {
        "<div class=\"chord\"></div>".to_string()
    };
    format!(
        "    <div class=\"column\">{}<div class=\"lyrics\">{}</div></div>\n",
        chord,
        escape(segment.lyrics.as_str())
    )
}

fn tag_to_html(tag: &Tag) -> String {
    let value = tag.value.as_deref().map(|v| escape(v).into_owned());

    match (tag.name.as_str(), value) {
        (TITLE, Some(value)) => row("title", &value),
        (SUBTITLE, Some(value)) => row("subtitle", &value),
        (ARTIST, Some(value)) => row("artist", &value),
        (_, Some(value)) if tag.is_comment() => row("comment", &value),
        (_, value) if tag.is_section_start() => {
            let label = tag.section_label().unwrap_or_default();
            match value {
                Some(value) => row("comment", &format!("{} {}", escape(label.as_str()), value)),
                None => row("comment", &escape(label.as_str())),
            }
        }
        (_, Some(value)) if !tag.is_section_end() => format!(
            "  <div class=\"row\"><div class=\"meta-label\">{}</div><div class=\"meta-value\">{}</div></div>\n",
            escape(tag.name.as_str()),
            value
        ),
        _ => String::new(),
    }
}

fn row(class: &str, content: &str) -> String {
    format!("  <div class=\"row\"><div class=\"{}\">{}</div></div>\n", class, content)
}
