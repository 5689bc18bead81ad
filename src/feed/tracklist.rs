// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use quick_xml::Reader;
use quick_xml::events::Event;

/// Undo the escaping that feed generators apply to embedded HTML.
///
/// Only the three entities that hide markup are handled here, in the order
/// `&lt;`, `&gt;`, `&amp;`; the remaining entities are decoded per text node.
pub fn decode_markup_entities(content: &str) -> String {
    content
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Strip a `<![CDATA[ ... ]]>` wrapper that survived as escaped text.
///
/// Generators that write the wrapper as element text get it escaped, so it
/// only reappears after [`decode_markup_entities`].
fn unwrap_cdata(html: &str) -> &str {
    let trimmed = html.trim();
    trimmed
        .strip_prefix("<![CDATA[")
        .map(|inner| inner.strip_suffix("]]>").unwrap_or(inner))
        .unwrap_or(html)
}

/// Re-escape every `<` that cannot open markup, such as the one in a decoded
/// `A &lt; B` track name. The entity is decoded again per text node.
fn escape_stray_lt(html: &str) -> String {
    let mut escaped = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    while let Some(c) = chars.next() {
        let opens_markup = matches!(
            chars.peek(),
            Some(&next) if next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
        );
        if c == '<' && !opens_markup {
            escaped.push_str("&lt;");
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn is_tag(name: &[u8], tag: &str) -> bool {
    name.eq_ignore_ascii_case(tag.as_bytes())
}

/// Extract the track names from an episode's `content:encoded` HTML.
///
/// The tracklist is the first `<ul>` of the fragment; every `<li>` directly
/// below it contributes its trimmed text content. Items nested in inner lists
/// are not part of their parent entry. `<li>` elements outside a `<ul>`,
/// including those of a top-level `<ol>`, are not a tracklist. Malformed
/// markup ends the scan, keeping whatever was collected until then.
pub fn extract_tracklist(content: &str) -> Vec<String> {
    let decoded = decode_markup_entities(content);
    let html = escape_stray_lt(unwrap_cdata(&decoded));

    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.trim_text(false);

    let mut tracks = Vec::new();
    // 0 = before the list, then nesting depth of <ul> elements inside it
    let mut list_depth = 0usize;
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if is_tag(name.as_ref(), "ul") || (is_tag(name.as_ref(), "ol") && list_depth > 0) {
                    list_depth += 1;
                } else if is_tag(name.as_ref(), "li") && list_depth == 1 {
                    // An unclosed sibling ends where the next one starts
                    if let Some(text) = current.replace(String::new()) {
                        push_track(&mut tracks, &text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if (is_tag(name.as_ref(), "ul") || is_tag(name.as_ref(), "ol")) && list_depth > 0 {
                    list_depth -= 1;
                    if list_depth == 0 {
                        break;
                    }
                } else if is_tag(name.as_ref(), "li") && list_depth == 1 {
                    if let Some(text) = current.take() {
                        push_track(&mut tracks, &text);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if list_depth == 1
                    && let Some(text) = current.as_mut()
                {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if list_depth == 1
                    && let Some(text) = current.as_mut()
                {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::debug!("Tracklist markup error, keeping {} entries: {}", tracks.len(), e);
                break;
            }
            Ok(_) => {}
        }
    }

    // A final <li> left open by sloppy markup still counts
    if let Some(text) = current.take() {
        push_track(&mut tracks, &text);
    }

    tracks
}

fn push_track(tracks: &mut Vec<String>, raw: &str) {
    let decoded = html_escape::decode_html_entities(raw);
    let track = decoded.trim();
    if !track.is_empty() {
        tracks.push(track.to_string());
    }
}
