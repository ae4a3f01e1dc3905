use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use roxmltree::{Document, Node, ParsingOptions};

use crate::config::Compression;
use crate::epg::model::{Channel, FeedDocument, Programme};
use crate::error::EpgError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub async fn fetch_feed(
    client: &reqwest::Client,
    source_name: &str,
    url: &str,
    compression: Compression,
    timeout: Duration,
) -> Result<FeedDocument, EpgError> {
    let fetch_error = |e: reqwest::Error| EpgError::Fetch {
        source_name: source_name.to_string(),
        message: e.to_string(),
    };

    let bytes = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?
        .bytes()
        .await
        .map_err(fetch_error)?;

    let xml = decode_body(source_name, &bytes, compression)?;
    parse_document(source_name, &xml)
}

/// Inflate (when needed) and UTF-8 decode a feed body.
pub fn decode_body(
    source_name: &str,
    bytes: &[u8],
    compression: Compression,
) -> Result<String, EpgError> {
    let gzipped = match compression {
        Compression::Gzip => true,
        Compression::None => false,
        Compression::Auto => bytes.starts_with(&GZIP_MAGIC),
    };

    if gzipped {
        let mut xml = String::new();
        GzDecoder::new(bytes)
            .read_to_string(&mut xml)
            .map_err(|e| EpgError::Decompress {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Ok(xml)
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|e| EpgError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }
}

pub fn parse_document(source_name: &str, xml: &str) -> Result<FeedDocument, EpgError> {
    let parse_error = |message: String| EpgError::Parse {
        source_name: source_name.to_string(),
        message,
    };

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options).map_err(|e| parse_error(e.to_string()))?;

    let root = doc.root_element();
    if !root.has_tag_name("tv") {
        return Err(parse_error(format!(
            "root element is <{}>, expected <tv>",
            root.tag_name().name()
        )));
    }

    let mut document = FeedDocument {
        source_name: source_name.to_string(),
        ..Default::default()
    };

    for node in root.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "channel" => document.channels.extend(parse_channel(node)),
            "programme" => document.programmes.extend(parse_programme(node)),
            _ => {}
        }
    }

    Ok(document)
}

fn parse_channel(node: Node<'_, '_>) -> Option<Channel> {
    let id = node.attribute("id").map(str::trim).filter(|id| !id.is_empty())?;
    let display_name = child_text(node, "display-name")
        .filter(|name| !name.is_empty())
        .unwrap_or(id);

    Some(Channel {
        id: id.to_string(),
        display_name: display_name.to_string(),
        icon_url: icon_src(node),
    })
}

fn parse_programme(node: Node<'_, '_>) -> Option<Programme> {
    let channel_id = node
        .attribute("channel")
        .map(str::trim)
        .filter(|id| !id.is_empty())?;

    Some(Programme {
        channel_id: channel_id.to_string(),
        start_raw: node.attribute("start").unwrap_or_default().to_string(),
        stop_raw: node.attribute("stop").unwrap_or_default().to_string(),
        title: child_text(node, "title").unwrap_or_default().to_string(),
        description: child_text(node, "desc").map(String::from),
        category: child_text(node, "category").map(String::from),
        icon_url: icon_src(node),
    })
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::trim)
}

fn icon_src(node: Node<'_, '_>) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name("icon"))
        .and_then(|icon| icon.attribute("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(String::from)
}
