use quick_xml::Reader;
use quick_xml::events::Event;

/// Un-prefixed `duration`, `episode` and `season` values of one `<item>`.
///
/// Some generators write these podcast fields without the `itunes:` prefix,
/// which the `rss` crate drops; they are recovered with a separate pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainItemFields {
    pub duration: Option<String>,
    pub episode: Option<String>,
    pub season: Option<String>,
}

impl PlainItemFields {
    /// Look up a field by its local name
    pub fn get(&self, local_name: &str) -> Option<&str> {
        match local_name {
            "duration" => self.duration.as_deref(),
            "episode" => self.episode.as_deref(),
            "season" => self.season.as_deref(),
            _ => None,
        }
    }

    fn slot(&mut self, name: &[u8]) -> Option<&mut Option<String>> {
        match name {
            b"duration" => Some(&mut self.duration),
            b"episode" => Some(&mut self.episode),
            b"season" => Some(&mut self.season),
            _ => None,
        }
    }
}

/// Scan a feed for un-prefixed item fields, one entry per item in the order
/// `rss::Channel::items()` reports them: `<item>` elements directly under
/// `<channel>` first, then RSS 1.0 style items directly under the root.
/// Self-closing items count as items without fields. Scanning stops quietly
/// at the first XML error; the document has already been validated by the
/// main parse.
pub fn scan_plain_item_fields(xml: &[u8]) -> Vec<PlainItemFields> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut channel_items: Vec<PlainItemFields> = Vec::new();
    let mut root_items: Vec<PlainItemFields> = Vec::new();
    // Names of the currently open elements
    let mut path: Vec<Vec<u8>> = Vec::new();
    // Position in `path` of the open item, and whether it sits under the root
    let mut open_item: Option<(usize, bool)> = None;
    let mut capture: Option<(Vec<u8>, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                let depth = path.len();
                if let Some(under_root) = item_placement(&name, &path) {
                    let items = if under_root { &mut root_items } else { &mut channel_items };
                    items.push(PlainItemFields::default());
                    open_item = Some((depth, under_root));
                } else if open_item.map(|(d, _)| d + 1) == Some(depth)
                    && matches!(name.as_slice(), b"duration" | b"episode" | b"season")
                {
                    capture = Some((name.clone(), String::new()));
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                match item_placement(e.name().as_ref(), &path) {
                    Some(true) => root_items.push(PlainItemFields::default()),
                    Some(false) => channel_items.push(PlainItemFields::default()),
                    None => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = capture.as_mut() {
                    match e.unescape() {
                        Ok(value) => text.push_str(&value),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
                let depth = path.len();
                match open_item {
                    Some((item_depth, under_root)) if item_depth + 1 == depth => {
                        let items = if under_root { &mut root_items } else { &mut channel_items };
                        if let Some((field, text)) = capture.take()
                            && let Some(fields) = items.last_mut()
                            && let Some(slot) = fields.slot(&field)
                        {
                            slot.get_or_insert(text);
                        }
                    }
                    Some((item_depth, _)) if item_depth == depth => open_item = None,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::debug!("Stopping un-prefixed field scan: {e}");
                break;
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    channel_items.append(&mut root_items);
    channel_items
}

/// Where an `<item>` opening at the end of `path` belongs: `Some(false)` under
/// the channel, `Some(true)` directly under the root element.
fn item_placement(name: &[u8], path: &[Vec<u8>]) -> Option<bool> {
    if name != b"item" {
        return None;
    }
    match path {
        [_root] => Some(true),
        [_root, parent] if parent.as_slice() == b"channel" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_unprefixed_fields_per_item() {
        let xml = br#"<rss><channel>
            <item><title>A</title><duration>1:00</duration><season>2</season></item>
            <item><title>B</title></item>
            <item><episode> 7 </episode></item>
        </channel></rss>"#;

        let items = scan_plain_item_fields(xml);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].get("duration"), Some("1:00"));
        assert_eq!(items[0].get("season"), Some("2"));
        assert_eq!(items[1], PlainItemFields::default());
        assert_eq!(items[2].get("episode"), Some("7"));
    }

    #[test]
    fn ignores_prefixed_and_nested_elements() {
        let xml = br#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"><channel>
            <item>
              <itunes:duration>9:99</itunes:duration>
              <extra><season>5</season></extra>
            </item>
        </channel></rss>"#;

        let items = scan_plain_item_fields(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].duration, None);
        assert_eq!(items[0].season, None);
    }

    #[test]
    fn self_closing_items_keep_positions_aligned() {
        let xml = br#"<rss><channel>
            <item/>
            <item><title>B</title><season>2</season><episode>5</episode></item>
        </channel></rss>"#;

        let items = scan_plain_item_fields(xml);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], PlainItemFields::default());
        assert_eq!(items[1].get("season"), Some("2"));
        assert_eq!(items[1].get("episode"), Some("5"));
    }

    #[test]
    fn items_outside_the_channel_are_not_counted() {
        let xml = br#"<rss><channel>
            <image><item><season>9</season></item></image>
            <item><season>1</season></item>
        </channel></rss>"#;

        let items = scan_plain_item_fields(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("season"), Some("1"));
    }

    #[test]
    fn root_level_items_follow_channel_items() {
        let xml = br#"<rdf:RDF>
            <item><season>3</season></item>
            <channel><item><season>1</season></item></channel>
        </rdf:RDF>"#;

        let items = scan_plain_item_fields(xml);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("season"), Some("1"));
        assert_eq!(items[1].get("season"), Some("3"));
    }
}
