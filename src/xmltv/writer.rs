//! Merged XMLTV serialization
//!
//! Produces a UTF-8 document with an XML declaration and a `tv` root
//! holding all merged channels followed by all merged programmes. Text
//! and attribute values are re-escaped on the way out; no DTD reference
//! is emitted.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io;
use std::path::Path;

use crate::errors::AppResult;
use crate::merge::MergedDocument;
use crate::xmltv::{Element, Node};

/// Serialize a merged document to bytes
pub fn serialize(merged: &MergedDocument) -> AppResult<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(into_io_error)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped("\n")))
        .map_err(into_io_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("tv")))
        .map_err(into_io_error)?;
    for channel in &merged.channels {
        write_element(&mut writer, channel)?;
    }
    for programme in &merged.programmes {
        write_element(&mut writer, programme)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("tv")))
        .map_err(into_io_error)?;

    Ok(writer.into_inner())
}

/// Serialize a merged document and write it to `path`
pub async fn write_to_file(merged: &MergedDocument, path: &Path) -> AppResult<()> {
    let bytes = serialize(merged)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(into_io_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(into_io_error)?;
    for child in &element.children {
        match child {
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(into_io_error)?,
            Node::Element(child) => write_element(writer, child)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(into_io_error)?;
    Ok(())
}

fn into_io_error(e: quick_xml::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
