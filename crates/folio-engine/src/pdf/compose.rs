// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay compositing — stamp page N of an overlay document onto page N of a
// target document.
//
// Each overlay page becomes a Form XObject in the target under a private
// resource name. The target's original content is bracketed in `q ... Q` so
// its graphics state cannot leak into the stamp, and the form is invoked last
// so it draws on top.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

use folio_core::error::{FolioError, Result};

use super::assemble::ObjectImporter;
use super::page;

const STAMP_PREFIX: &str = "FolioStamp";

/// Stamp every page of `target` with the page of `overlay` at the same index.
/// Returns the number of pages stamped.
#[instrument(skip_all)]
pub fn stamp_pages(target: &mut Document, overlay: &Document) -> Result<usize> {
    let target_pages: Vec<ObjectId> = target.get_pages().into_values().collect();
    let overlay_pages: Vec<ObjectId> = overlay.get_pages().into_values().collect();

    if overlay_pages.len() < target_pages.len() {
        return Err(FolioError::RenderFailed(format!(
            "overlay has {} pages, document has {}",
            overlay_pages.len(),
            target_pages.len()
        )));
    }

    let mut importer = ObjectImporter::new();
    for (page_id, overlay_page) in target_pages.iter().zip(&overlay_pages) {
        let form_id = import_as_form(&mut importer, overlay, *overlay_page, target, *page_id)?;
        attach_form(target, *page_id, form_id)?;
    }

    info!(pages = target_pages.len(), "Overlay stamped");
    Ok(target_pages.len())
}

/// Copy an overlay page into `target` as a Form XObject positioned at the
/// origin of the target page's media box.
fn import_as_form(
    importer: &mut ObjectImporter,
    overlay: &Document,
    overlay_page: ObjectId,
    target: &mut Document,
    target_page: ObjectId,
) -> Result<ObjectId> {
    let content = overlay.get_page_content(overlay_page).map_err(|err| {
        FolioError::RenderFailed(format!("overlay page content unreadable: {}", err))
    })?;
    let bbox = page::media_box(overlay, overlay_page);
    let resources = Object::Dictionary(page::resources(overlay, overlay_page));
    let resources = importer.import(overlay, target, &resources);
    let origin = page::media_box(target, target_page);

    let form = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => page::box_object(&bbox),
            "Matrix" => vec![
                1.into(), 0.into(), 0.into(), 1.into(),
                Object::Real(origin.left), Object::Real(origin.bottom),
            ],
            "Resources" => resources,
        },
        content,
    );
    Ok(target.add_object(form))
}

/// Register the form on the page and wrap the page content around it.
fn attach_form(doc: &mut Document, page_id: ObjectId, form_id: ObjectId) -> Result<()> {
    let mut resources = page::resources(doc, page_id);
    let mut xobjects = match resources.get(b"XObject") {
        Ok(obj) => page::resolve(doc, obj)
            .as_dict()
            .map(|dict| dict.clone())
            .unwrap_or_else(|_| lopdf::Dictionary::new()),
        Err(_) => lopdf::Dictionary::new(),
    };

    let name = (1..)
        .map(|n| format!("{STAMP_PREFIX}{n}"))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| STAMP_PREFIX.to_string());
    xobjects.set(name.clone(), form_id);
    resources.set("XObject", xobjects);

    let open = encode(vec![Operation::new("q", vec![])])?;
    let close = encode(vec![
        Operation::new("Q", vec![]),
        Operation::new("q", vec![]),
        Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
        Operation::new("Q", vec![]),
    ])?;

    let mut contents = page::content_references(doc, page_id);
    let open_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), open));
    let close_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), close));
    contents.insert(0, Object::Reference(open_id));
    contents.push(Object::Reference(close_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| FolioError::RenderFailed(format!("page {:?} not writable: {}", page_id, err)))?;
    page.set("Resources", resources);
    page.set("Contents", contents);

    debug!(?page_id, stamp = %name, "Form attached to page");
    Ok(())
}

/// Encode operations as a standalone stream. The leading newline keeps the
/// first token separate from whatever the previous stream ended with.
fn encode(operations: Vec<Operation>) -> Result<Vec<u8>> {
    let body = Content { operations }
        .encode()
        .map_err(|err| FolioError::RenderFailed(format!("stamp content stream: {}", err)))?;
    let mut bytes = Vec::with_capacity(body.len() + 1);
    bytes.push(b'\n');
    bytes.extend(body);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use folio_core::{PageBox, PageNumberOptions};

    use super::*;
    use crate::pdf::assemble::PageAssembler;
    use crate::pdf::overlay::render_page_numbers;

    fn target_with_existing_stamp_name(pages: usize) -> Document {
        let mut assembler = PageAssembler::new();
        for n in 0..pages {
            assembler.push_synthetic_page(
                &PageBox::from_size(612.0, 792.0),
                format!("0.2 g 0 0 {} 100 re f", 100 + n).into_bytes(),
                dictionary! { "XObject" => dictionary! { "FolioStamp1" => Object::Null } },
            );
        }
        assembler.finish()
    }

    #[test]
    fn stamps_each_page_under_a_fresh_name() {
        let mut target = target_with_existing_stamp_name(2);
        let overlay = render_page_numbers(2, &PageNumberOptions::default()).unwrap();

        assert_eq!(stamp_pages(&mut target, &overlay).unwrap(), 2);

        for (number, page_id) in target.get_pages() {
            let content = String::from_utf8_lossy(&target.get_page_content(page_id).unwrap())
                .into_owned();
            assert!(content.trim_start().starts_with('q'), "page {number}");
            assert!(content.contains("/FolioStamp2 Do"), "page {number}: {content}");
            assert!(content.contains(&format!("0 0 {} 100 re f", 99 + number)));

            let resources = page::resources(&target, page_id);
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            assert!(xobjects.has(b"FolioStamp1"));
            assert!(xobjects.has(b"FolioStamp2"));
        }
    }

    #[test]
    fn short_overlay_is_rejected() {
        let mut target = target_with_existing_stamp_name(3);
        let overlay = render_page_numbers(1, &PageNumberOptions::default()).unwrap();
        assert!(matches!(
            stamp_pages(&mut target, &overlay),
            Err(FolioError::RenderFailed(_))
        ));
    }

    #[test]
    fn stamped_document_survives_serialisation() {
        let mut target = target_with_existing_stamp_name(1);
        let overlay = render_page_numbers(1, &PageNumberOptions::default()).unwrap();
        stamp_pages(&mut target, &overlay).unwrap();

        let mut bytes = Vec::new();
        target.save_to(&mut bytes).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
