// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-dictionary helpers: inherited attributes, page boxes, content arrays.

use lopdf::{Dictionary, Document, Object, ObjectId};

use folio_core::{PageBox, PaperSize};

/// Page attributes that may be inherited from ancestor `/Pages` nodes.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Page trees deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

/// Look up `key` on a page, walking `/Parent` links until it is found.
/// References are resolved one level.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value).clone());
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a single indirect reference; other objects are returned as-is.
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Numeric value of an integer or real object.
pub fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Parse a `[l b r t]` rectangle, normalising corner order.
pub fn parse_box(doc: &Document, object: &Object) -> Option<PageBox> {
    let items = resolve(doc, object).as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = number(resolve(doc, item))?;
    }
    Some(PageBox::new(
        values[0].min(values[2]),
        values[1].min(values[3]),
        values[0].max(values[2]),
        values[1].max(values[3]),
    ))
}

pub fn box_object(page_box: &PageBox) -> Object {
    Object::Array(vec![
        Object::Real(page_box.left),
        Object::Real(page_box.bottom),
        Object::Real(page_box.right),
        Object::Real(page_box.top),
    ])
}

/// Effective media box. Pages without one fall back to US Letter.
pub fn media_box(doc: &Document, page_id: ObjectId) -> PageBox {
    inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| parse_box(doc, &obj))
        .unwrap_or_else(|| PaperSize::Letter.page_box())
}

/// Effective `/Rotate`, 0 when absent.
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0)
}

/// Effective resources dictionary, cloned. Empty when the page has none.
pub fn resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    match inherited_attribute(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    }
}

/// The page's `/Contents` as a flat list of stream references.
pub fn content_references(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise byte-per-char).
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use lopdf::dictionary;

    use super::*;

    fn two_level_tree() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
                "Rotate" => 90,
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn attributes_are_inherited_from_the_page_tree() {
        let (doc, page_id) = two_level_tree();
        assert_eq!(media_box(&doc, page_id), PageBox::new(0.0, 0.0, 300.0, 400.0));
        assert_eq!(rotation(&doc, page_id), 90);
        assert!(resources(&doc, page_id).is_empty());
    }

    #[test]
    fn reversed_boxes_are_normalised() {
        let doc = Document::with_version("1.7");
        let reversed = Object::Array(vec![
            Object::Integer(612),
            Object::Integer(792),
            Object::Integer(0),
            Object::Real(0.0),
        ]);
        assert_eq!(
            parse_box(&doc, &reversed),
            Some(PageBox::new(0.0, 0.0, 612.0, 792.0))
        );
    }

    #[test]
    fn text_strings_decode_both_encodings() {
        assert_eq!(decode_text_string(b"Quarterly report"), "Quarterly report");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }
}
