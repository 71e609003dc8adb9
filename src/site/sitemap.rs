//! Sitemap parsing

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::OwlError;
use crate::errors::Result;

/// Every `<loc>` value in a sitemap, in document order
///
/// Matching is on the local element name, so namespaced sitemaps work too.
pub fn sitemap_urls(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Ok(Event::Text(t)) if in_loc => {
                let text = t
                    .unescape()
                    .map_err(|e| OwlError::ScrapeError(format!("Invalid sitemap text: {e}")))?;
                current.push_str(&text);
            }
            Ok(Event::CData(c)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let url = current.trim();
                if !url.is_empty() {
                    urls.push(url.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OwlError::ScrapeError(format!(
                    "Malformed sitemap at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(_) => {}
        }
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_sitemap() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.able.co/</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc> https://www.able.co/about </loc></url>
</urlset>"#;
        assert_eq!(
            sitemap_urls(xml).unwrap(),
            vec!["https://www.able.co/", "https://www.able.co/about"]
        );
    }

    #[test]
    fn test_escaped_and_cdata_locations() {
        let xml = "<urlset><url><loc>https://a.co/?x=1&amp;y=2</loc></url>\
                   <url><loc><![CDATA[https://a.co/b]]></loc></url></urlset>";
        assert_eq!(
            sitemap_urls(xml).unwrap(),
            vec!["https://a.co/?x=1&y=2", "https://a.co/b"]
        );
    }

    #[test]
    fn test_prefixed_loc_elements() {
        let xml = r#"<ns:urlset xmlns:ns="http://www.sitemaps.org/schemas/sitemap/0.9">
<ns:url><ns:loc>https://a.co/x</ns:loc></ns:url></ns:urlset>"#;
        assert_eq!(sitemap_urls(xml).unwrap(), vec!["https://a.co/x"]);
    }

    #[test]
    fn test_empty_sitemap() {
        assert!(sitemap_urls("<urlset></urlset>").unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        assert!(sitemap_urls("<urlset><url><loc>x</url></urlset>").is_err());
    }
}
