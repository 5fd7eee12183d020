//! Streaming RSS parser for Google News search feeds.
//!
//! A Google News item looks like:
//!
//! ```xml
//! <item>
//!   <title>Exxon pushes back on scope 3 rules - Reuters</title>
//!   <link>https://news.google.com/rss/articles/CBMi...</link>
//!   <pubDate>Tue, 14 Oct 2025 07:00:00 GMT</pubDate>
//!   <description>&lt;a href="..."&gt;Exxon pushes back...&lt;/a&gt;</description>
//!   <source url="https://www.reuters.com">Reuters</source>
//! </item>
//! ```

use crate::dates::parse_published;
use crate::models::{Article, UNKNOWN_SOURCE};
use crate::utils::html_to_text;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, instrument, warn};

use super::FeedError;

/// Parse an RSS document into articles tagged with `keyword`.
///
/// Items without a `<link>` are skipped. A well-formed feed with no items
/// yields an empty vector; a document that is not RSS at all is an error.
///
/// A feed that breaks off after some complete items (a truncated body, a
/// mangled tag) keeps those items. The item being read when the error hit
/// is dropped. An error before the first complete item fails the parse.
#[instrument(level = "debug", skip(xml), fields(bytes = xml.len()))]
pub fn parse_feed(xml: &[u8], keyword: &str) -> Result<Vec<Article>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut articles = Vec::new();
    let mut saw_feed_root = false;
    let mut skipped = 0usize;

    let mut current_item: Option<ItemBuilder> = None;
    let mut current_field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"rss" | b"channel" => saw_feed_root = true,
                    b"item" => current_item = Some(ItemBuilder::default()),
                    other if current_item.is_some() => {
                        current_field = Field::from_tag(other);
                        text.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"item" {
                    if let Some(builder) = current_item.take() {
                        match builder.build(keyword) {
                            Some(article) => articles.push(article),
                            None => skipped += 1,
                        }
                    }
                } else if let (Some(item), Some(field)) = (current_item.as_mut(), current_field.take())
                {
                    item.set(field, text.trim());
                }
            }
            Ok(Event::Text(e)) => {
                if current_field.is_some() {
                    let raw = String::from_utf8_lossy(&e);
                    match unescape(&raw) {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&raw),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if current_field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if current_field.is_some() {
                    let name = String::from_utf8_lossy(&e);
                    match resolve_reference(&name) {
                        Some(resolved) => text.push_str(&resolved),
                        None => {
                            text.push('&');
                            text.push_str(&name);
                            text.push(';');
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                let position = reader.buffer_position();
                if !saw_feed_root || articles.is_empty() {
                    return Err(FeedError::Parse(format!(
                        "XML parse error at byte {position}: {e}"
                    )));
                }
                warn!(
                    position,
                    error = %e,
                    kept = articles.len(),
                    "Malformed feed XML; keeping items parsed so far"
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_feed_root {
        return Err(FeedError::Parse("document is not an RSS feed".to_string()));
    }

    debug!(count = articles.len(), skipped, "Parsed feed items");
    Ok(articles)
}

/// Resolve `amp`, `#39`, `#x27` and friends to their text.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
    Source,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"pubDate" => Some(Field::PubDate),
            b"description" => Some(Field::Description),
            b"source" => Some(Field::Source),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<String>,
}

impl ItemBuilder {
    fn set(&mut self, field: Field, value: &str) {
        if value.is_empty() {
            return;
        }
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
            Field::Source => &mut self.source,
        };
        *slot = Some(value.to_string());
    }

    fn build(self, keyword: &str) -> Option<Article> {
        let link = self.link?;
        let published = self.pub_date.unwrap_or_default();
        let published_date = parse_published(&published);
        Some(Article {
            keyword: keyword.to_string(),
            title: self.title.unwrap_or_default(),
            link,
            source: self.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            published,
            published_date,
            description: self
                .description
                .map(|d| html_to_text(&d))
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TWO_ITEMS: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>"scope 3 emissions" - Google News</title>
    <link>https://news.google.com/search?q=scope+3+emissions</link>
    <item>
      <title>Exxon pushes back on scope 3 rules - Reuters</title>
      <link>https://news.google.com/rss/articles/abc</link>
      <pubDate>Tue, 14 Oct 2025 07:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/abc"&gt;Exxon pushes back&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Reuters&lt;/font&gt;</description>
      <source url="https://www.reuters.com">Reuters</source>
    </item>
    <item>
      <title><![CDATA[AT&T & the GHG Protocol]]></title>
      <link>https://news.google.com/rss/articles/def</link>
      <pubDate>sometime last week</pubDate>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn test_parse_google_news_items() {
        let articles = parse_feed(TWO_ITEMS.as_bytes(), "scope 3 emissions").unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.keyword, "scope 3 emissions");
        assert_eq!(first.title, "Exxon pushes back on scope 3 rules - Reuters");
        assert_eq!(first.link, "https://news.google.com/rss/articles/abc");
        assert_eq!(first.source, "Reuters");
        assert!(first.published_date.is_some());
        assert!(first.description.starts_with("Exxon pushes back"));
        assert!(first.description.ends_with("Reuters"));
        assert!(!first.description.contains('<'));
    }

    #[test]
    fn test_missing_source_and_bad_date_fall_back() {
        let articles = parse_feed(TWO_ITEMS.as_bytes(), "k").unwrap();
        let second = &articles[1];
        assert_eq!(second.title, "AT&T & the GHG Protocol");
        assert_eq!(second.source, UNKNOWN_SOURCE);
        assert_eq!(second.published, "sometime last week");
        assert_eq!(second.published_date, None);
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_entities_in_text_keep_spacing() {
        let xml = r#"<rss><channel><item>
            <title>Tom &amp; Jerry&#39;s carbon</title>
            <link>https://a.example/1</link>
        </item></channel></rss>"#;
        let articles = parse_feed(xml.as_bytes(), "k").unwrap();
        assert_eq!(articles[0].title, "Tom & Jerry's carbon");
    }

    #[test]
    fn test_item_without_link_is_skipped() {
        let xml = r#"<rss><channel>
            <item><title>No link here</title></item>
            <item><title>Has link</title><link>https://a.example/1</link></item>
        </channel></rss>"#;
        let articles = parse_feed(xml.as_bytes(), "k").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Has link");
    }

    #[test]
    fn test_empty_feed_is_not_an_error() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel>
            <title>"carbon measures" - Google News</title>
        </channel></rss>"#;
        let articles = parse_feed(xml.as_bytes(), "carbon measures").unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_non_rss_document_is_an_error() {
        let html = "<html><body>Too many requests</body></html>";
        assert!(matches!(
            parse_feed(html.as_bytes(), "k"),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_xml_before_any_item_is_an_error() {
        let xml = "<rss><channel><item><title>oops</channel></rss>";
        assert!(matches!(
            parse_feed(xml.as_bytes(), "k"),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_tail_keeps_complete_items() {
        let xml = r#"<rss><channel>
            <item><title>First</title><link>https://a.example/1</link></item>
            <item><title>Second</title><link>https://a.example/2</link></item>
            <item><title>Broken</title><link>https://a.example/3</lnk></item>
        </channel></rss>"#;
        let articles = parse_feed(xml.as_bytes(), "k").unwrap();
        let links: Vec<&str> = articles.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, ["https://a.example/1", "https://a.example/2"]);
    }

    #[test]
    fn test_truncated_body_keeps_complete_items() {
        let cut = TWO_ITEMS.find("<item>\n      <title><![CDATA[").unwrap();
        let truncated = format!("{}<item><title>half an it", &TWO_ITEMS[..cut]);
        let articles = parse_feed(truncated.as_bytes(), "k").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "Reuters");
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
        assert_eq!(resolve_reference("#39").as_deref(), Some("'"));
        assert_eq!(resolve_reference("#x27").as_deref(), Some("'"));
        assert_eq!(resolve_reference("nbsp"), None);
    }
}
