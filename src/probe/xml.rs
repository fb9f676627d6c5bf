//! Small typed XML query helpers for the GeoServer probes.
//!
//! Keeps namespace-qualified lookups out of the JSON probes' path. Both
//! helpers operate on a full response body held in memory; GeoServer
//! capability documents are small.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::{NsReader, Reader};

use super::ProbeError;

/// Read an attribute from the document's root element.
///
/// Returns `MissingField` when the root element has no such attribute and
/// `Parse` when the body is not well-formed XML.
pub fn root_attr(body: &str, name: &'static str) -> Result<String, ProbeError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| ProbeError::Parse(e.to_string()))?;
                    if attr.key.local_name().as_ref() == name.as_bytes() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| ProbeError::Parse(e.to_string()))?;
                        return Ok(value.into_owned());
                    }
                }
                return Err(ProbeError::MissingField(name));
            }
            Ok(Event::Eof) => return Err(ProbeError::Parse("no root element".to_string())),
            Ok(_) => continue,
            Err(e) => return Err(ProbeError::Parse(e.to_string())),
        }
    }
}

/// Count elements with the given local name bound to the given namespace.
pub fn count_in_namespace(
    body: &str,
    namespace: &str,
    local_name: &str,
) -> Result<usize, ProbeError> {
    let mut reader = NsReader::from_str(body);
    let mut count = 0;
    loop {
        match reader.read_resolved_event() {
            Ok((ResolveResult::Bound(Namespace(ns)), Event::Start(e)))
            | Ok((ResolveResult::Bound(Namespace(ns)), Event::Empty(e))) => {
                if ns == namespace.as_bytes() && e.local_name().as_ref() == local_name.as_bytes() {
                    count += 1;
                }
            }
            Ok((_, Event::Eof)) => return Ok(count),
            Ok(_) => continue,
            Err(e) => return Err(ProbeError::Parse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WFS_HITS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" numberOfFeatures="7" timeStamp="2024-06-01T04:00:00Z"/>"#;

    const WMTS_CAPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities xmlns="http://www.opengis.net/wmts/1.0" xmlns:ows="http://www.opengis.net/ows/1.1">
  <Contents>
    <Layer><ows:Title>one</ows:Title></Layer>
    <Layer><ows:Title>two</ows:Title></Layer>
    <ows:Layer>not a wmts layer</ows:Layer>
  </Contents>
</Capabilities>"#;

    #[test]
    fn test_root_attr_found() {
        assert_eq!(root_attr(WFS_HITS, "numberOfFeatures").unwrap(), "7");
    }

    #[test]
    fn test_root_attr_missing() {
        let err = root_attr(WFS_HITS, "numberOfRows").unwrap_err();
        assert!(matches!(err, ProbeError::MissingField("numberOfRows")));
    }

    #[test]
    fn test_root_attr_malformed_body() {
        let err = root_attr("this is not xml", "numberOfFeatures").unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }

    #[test]
    fn test_count_in_namespace() {
        let count =
            count_in_namespace(WMTS_CAPS, "http://www.opengis.net/wmts/1.0", "Layer").unwrap();
        // The ows:Layer element is bound to a different namespace.
        assert_eq!(count, 2);
    }

    #[test]
    fn test_count_in_namespace_no_matches() {
        let count =
            count_in_namespace(WFS_HITS, "http://www.opengis.net/wmts/1.0", "Layer").unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_count_in_namespace_malformed() {
        let err = count_in_namespace("<unclosed", "ns", "Layer").unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }
}
