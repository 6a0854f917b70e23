//! HTML pages: landing, selection form, results.

use crate::recommend::Recommendations;
use crate::song::Entry;
use std::fmt::Write;

/// Moods offered on the selection page. The sampler accepts any mood.
pub const MOOD_OPTIONS: [&str; 5] = ["Happy", "Sad", "Romantic", "Energetic", "Calm"];

/// Languages offered on the selection page.
pub const LANGUAGE_OPTIONS: [&str; 3] = ["Telugu", "Hindi", "English"];

pub const LANDING_PAGE: &str = include_str!("templates/landing.html");
const SELECT_TEMPLATE: &str = include_str!("templates/select.html");
const RESULTS_TEMPLATE: &str = include_str!("templates/results.html");

pub fn select_page() -> String {
    SELECT_TEMPLATE
        .replace("{{MOOD_BUTTONS}}", &option_buttons("mood", &MOOD_OPTIONS))
        .replace("{{LANGUAGE_BUTTONS}}", &option_buttons("language", &LANGUAGE_OPTIONS))
}

fn option_buttons(kind: &str, values: &[&str]) -> String {
    values
        .iter()
        .map(|value| {
            format!(
                r#"        <button type="button" class="option-btn" data-type="{kind}" data-value="{value}">{value}</button>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn results_page(recommendations: &Recommendations) -> String {
    RESULTS_TEMPLATE.replace("{{RESULTS}}", &results_fragment(recommendations))
}

fn results_fragment(recommendations: &Recommendations) -> String {
    if recommendations.is_empty() {
        return r#"<p class="empty">No recommendations available.</p>"#.to_string();
    }

    let mut html = String::new();
    for group in recommendations {
        // Writing into a String can't fail.
        let _ = writeln!(html, "<h3>{}</h3>\n<ul>", escape_html(&group.mood));
        for entry in &group.entries {
            let _ = writeln!(html, "{}", entry_item(entry));
        }
        html.push_str("</ul>\n");
    }
    html
}

fn entry_item(entry: &Entry) -> String {
    match entry {
        Entry::Song(song) => format!(
            "    <li><b>{}</b> by {}<br>({}, {})</li>",
            escape_html(&song.title),
            escape_html(&song.artist),
            escape_html(&song.language),
            escape_html(&song.mood),
        ),
        Entry::NotFound(placeholder) => {
            format!(r#"    <li class="empty">{}</li>"#, escape_html(&placeholder.title))
        }
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
