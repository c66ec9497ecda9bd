// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page geometry — rotation and cropping.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use folio_core::error::Result;
use folio_core::{CropMargins, Rotation};

use super::{page_dict_mut, page_selection};
use crate::artifact::Artifact;
use crate::engine::PdfEngine;
use crate::pdf::page::{box_object, inherited_attribute};
use crate::pdf::StructuralBackend;

impl PdfEngine {
    /// Rotate the selected pages (all pages when `pages` is `None`) clockwise
    /// by `rotation`, on top of any rotation they already carry. Unselected
    /// pages pass through untouched.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), degrees = rotation.degrees()))]
    pub fn rotate(
        &self,
        input: impl AsRef<Path>,
        rotation: Rotation,
        pages: Option<&[u32]>,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        let mut doc = self.open_plain(input.as_ref())?;
        let selected = page_selection(doc.page_count(), pages);

        let mut rotated = 0;
        for (page_id, chosen) in doc.page_ids().into_iter().zip(selected) {
            if !chosen {
                continue;
            }
            let angle = rotation.apply_to(doc.rotation(page_id));
            page_dict_mut(doc.document_mut(), page_id)?.set("Rotate", angle);
            rotated += 1;
        }

        info!(rotated, "Pages rotated");
        self.write_output(&StructuralBackend, &mut doc, output.as_ref())
    }

    /// Shrink the media box of the selected pages by `margins`. A page whose
    /// box would become empty keeps its original box.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn crop(
        &self,
        input: impl AsRef<Path>,
        margins: &CropMargins,
        pages: Option<&[u32]>,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        margins.validate()?;

        let mut doc = self.open_plain(input.as_ref())?;
        let selected = page_selection(doc.page_count(), pages);

        if margins.is_zero() {
            debug!("Zero margins, page boxes unchanged");
        } else {
            let mut cropped = 0;
            for (index, (page_id, chosen)) in doc.page_ids().into_iter().zip(selected).enumerate() {
                if !chosen {
                    continue;
                }
                let original = doc.media_box(page_id);
                let Some(shrunk) = original.shrink(margins) else {
                    warn!(
                        page = index + 1,
                        width = original.width(),
                        height = original.height(),
                        "Crop would leave an empty page, keeping original box"
                    );
                    continue;
                };

                let has_crop_box = inherited_attribute(doc.document(), page_id, b"CropBox").is_some();
                let page = page_dict_mut(doc.document_mut(), page_id)?;
                page.set("MediaBox", box_object(&shrunk));
                if has_crop_box {
                    page.set("CropBox", box_object(&shrunk));
                }
                cropped += 1;
            }
            info!(cropped, "Pages cropped");
        }

        self.write_output(&StructuralBackend, &mut doc, output.as_ref())
    }
}
