// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document backends — two interchangeable strategies for reading, writing and
// (de)crypting documents.
//
// The structural backend works at page-object level: it re-assembles a fresh
// page tree and encrypts with RC4-128. The content-stream backend rewrites the
// whole file (decompress, prune, renumber, recompress), can strip metadata and
// re-encode JPEG images, and encrypts with AES-128 crypt filters. Protect and
// unlock run them in order through `fallback::run_chain`.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use lopdf::encryption::crypt_filters::{Aes128CryptFilter, CryptFilter};
use lopdf::encryption::{DecryptionError, EncryptionState, EncryptionVersion, Permissions};
use lopdf::xref::XrefEntry;
use lopdf::{Dictionary, Document, Object, Reader, StringFormat};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use folio_core::error::{FolioError, Result};
use folio_core::{CompressionProfile, Credentials, PermissionSet};

use super::assemble::reassemble;
use super::document::LoadedDocument;

/// Which backend produced a result, for logs and fallback decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Structural,
    ContentStream,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => f.write_str("structural"),
            Self::ContentStream => f.write_str("content-stream"),
        }
    }
}

/// The document-model contract shared by both backends.
pub trait DocumentBackend {
    fn kind(&self) -> BackendKind;

    /// Parse the document at `path`.
    fn open(&self, path: &Path) -> Result<LoadedDocument>;

    /// Produce the bytes that will be written to the output path.
    fn serialize(&self, doc: &mut LoadedDocument) -> Result<Vec<u8>>;

    /// Decrypt in place. A rejected password is reported as `WrongPassword`.
    fn decrypt(&self, doc: &mut LoadedDocument, password: &str) -> Result<()>;

    /// Encrypt in place, sealing the document for output.
    fn encrypt(
        &self,
        doc: &mut LoadedDocument,
        credentials: &Credentials,
        permissions: &PermissionSet,
    ) -> Result<()>;
}

// -- Structural backend -------------------------------------------------------

/// Page-object level manipulation. Output is a re-assembled page tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralBackend;

impl DocumentBackend for StructuralBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Structural
    }

    fn open(&self, path: &Path) -> Result<LoadedDocument> {
        LoadedDocument::open(path)
    }

    #[instrument(skip_all, fields(backend = "structural"))]
    fn serialize(&self, doc: &mut LoadedDocument) -> Result<Vec<u8>> {
        if !doc.is_sealed() {
            let rebuilt = reassemble(doc.document())?;
            doc.replace_document(rebuilt);
        }
        doc.to_bytes()
    }

    fn decrypt(&self, doc: &mut LoadedDocument, password: &str) -> Result<()> {
        decrypt_in_place(doc, password)?;
        let rebuilt = reassemble(doc.document())?;
        doc.replace_document(rebuilt);
        Ok(())
    }

    #[instrument(skip_all, fields(backend = "structural"))]
    fn encrypt(
        &self,
        doc: &mut LoadedDocument,
        credentials: &Credentials,
        permissions: &PermissionSet,
    ) -> Result<()> {
        let mut rebuilt = reassemble(doc.document())?;
        ensure_file_id(&mut rebuilt);

        let version = EncryptionVersion::V2 {
            document: &rebuilt,
            owner_password: &credentials.owner,
            user_password: &credentials.user,
            key_length: 128,
            permissions: permission_mask(permissions),
        };
        let state = EncryptionState::try_from(version)
            .map_err(|err| FolioError::EncryptionFailed(format!("RC4 key setup: {}", err)))?;
        rebuilt
            .encrypt(&state)
            .map_err(|err| FolioError::EncryptionFailed(format!("RC4 encryption: {}", err)))?;

        doc.replace_document(rebuilt);
        doc.seal();
        info!("Document encrypted with RC4-128");
        Ok(())
    }
}

// -- Content-stream backend ---------------------------------------------------

/// Whole-file rewrite. Optionally applies a compression profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentStreamBackend {
    profile: Option<CompressionProfile>,
}

impl ContentStreamBackend {
    pub fn with_profile(profile: CompressionProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    /// Decompress, clean up, renumber and recompress every object.
    #[instrument(skip_all, fields(backend = "content-stream"))]
    pub fn rewrite(&self, doc: &mut Document) {
        let objects_before = doc.objects.len();
        doc.decompress();

        if let Some(profile) = self.profile {
            if profile.strip_metadata {
                strip_metadata(doc);
            }
            let reencoded = reencode_images(doc, profile.image_quality);
            debug!(reencoded, quality = profile.image_quality, "JPEG images re-encoded");
        }

        let pruned = doc.prune_objects();
        let emptied = doc.delete_zero_length_streams();
        doc.renumber_objects();
        doc.compress();

        debug!(
            objects_before,
            objects_after = doc.objects.len(),
            pruned = pruned.len(),
            emptied = emptied.len(),
            "Document rewritten"
        );
    }
}

impl DocumentBackend for ContentStreamBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ContentStream
    }

    fn open(&self, path: &Path) -> Result<LoadedDocument> {
        let data = std::fs::read(path)?;
        LoadedDocument::from_bytes(&data, path)
    }

    /// Unsealed output is packed into object streams behind a
    /// cross-reference stream. Sealed output keeps a classic table.
    fn serialize(&self, doc: &mut LoadedDocument) -> Result<Vec<u8>> {
        if doc.is_sealed() {
            return doc.to_bytes();
        }
        self.rewrite(doc.document_mut());
        doc.to_packed_bytes()
    }

    fn decrypt(&self, doc: &mut LoadedDocument, password: &str) -> Result<()> {
        decrypt_in_place(doc, password)?;
        self.rewrite(doc.document_mut());
        Ok(())
    }

    #[instrument(skip_all, fields(backend = "content-stream"))]
    fn encrypt(
        &self,
        doc: &mut LoadedDocument,
        credentials: &Credentials,
        permissions: &PermissionSet,
    ) -> Result<()> {
        let inner = doc.document_mut();
        self.rewrite(inner);
        ensure_file_id(inner);

        let aes: Arc<dyn CryptFilter> = Arc::new(Aes128CryptFilter);
        let version = EncryptionVersion::V4 {
            document: &*inner,
            encrypt_metadata: true,
            crypt_filters: BTreeMap::from([(b"StdCF".to_vec(), aes)]),
            stream_filter: b"StdCF".to_vec(),
            string_filter: b"StdCF".to_vec(),
            owner_password: &credentials.owner,
            user_password: &credentials.user,
            permissions: permission_mask(permissions),
        };
        let state = EncryptionState::try_from(version)
            .map_err(|err| FolioError::EncryptionFailed(format!("AES key setup: {}", err)))?;
        inner
            .encrypt(&state)
            .map_err(|err| FolioError::EncryptionFailed(format!("AES encryption: {}", err)))?;

        doc.seal();
        info!("Document encrypted with AES-128");
        Ok(())
    }
}

// -- Shared helpers -----------------------------------------------------------

/// Map every permission flag onto lopdf's permission mask.
pub fn permission_mask(set: &PermissionSet) -> Permissions {
    let flags = [
        (set.print, Permissions::PRINTABLE),
        (set.modify, Permissions::MODIFIABLE),
        (set.copy, Permissions::COPYABLE),
        (set.annotate, Permissions::ANNOTABLE),
        (set.form, Permissions::FILLABLE),
        (set.extract, Permissions::COPYABLE_FOR_ACCESSIBILITY),
        (set.assemble, Permissions::ASSEMBLABLE),
        (set.print_high_quality, Permissions::PRINTABLE_IN_HIGH_QUALITY),
    ];
    flags
        .into_iter()
        .filter(|(allowed, _)| *allowed)
        .fold(Permissions::empty(), |mask, (_, flag)| mask | flag)
}

/// Decrypt `doc` with `password`, separating a rejected password from other
/// failures.
///
/// A file that lopdf opened with the empty user password is already
/// plaintext, so the password is only checked. Otherwise every object is
/// re-read from the original bytes and decrypted with the password.
fn decrypt_in_place(doc: &mut LoadedDocument, password: &str) -> Result<()> {
    let mut plain = if doc.document().encryption_state.is_some() {
        doc.document()
            .authenticate_password(password)
            .map_err(password_error)?;
        debug!("Document opened with the empty user password, checking only");
        doc.document().clone()
    } else {
        let raw = doc.raw_bytes().ok_or_else(|| {
            FolioError::DecryptionFailed("original bytes of the encrypted file are unavailable".into())
        })?;
        let mut ciphertext = read_ciphertext(raw, doc.document());
        ciphertext.decrypt(password).map_err(password_error)?;
        ciphertext
    };

    strip_encryption(&mut plain);
    if plain.get_pages().is_empty() {
        return Err(FolioError::DecryptionFailed(
            "decrypted document has no pages".into(),
        ));
    }
    doc.replace_document(plain);
    Ok(())
}

/// Parse every uncompressed object of an encrypted file exactly as stored.
///
/// `shell` is the document lopdf returned for the file: trailer, xref table
/// and the encryption dictionary. Objects packed in object streams are
/// unpacked later by `Document::decrypt`, once their container is decrypted.
fn read_ciphertext(data: &[u8], shell: &Document) -> Document {
    let start = data.windows(5).position(|w| w == b"%PDF-").unwrap_or(0);
    let reader = Reader {
        buffer: &data[start..],
        document: shell.clone(),
        encryption_state: None,
        raw_objects: BTreeMap::new(),
    };

    let mut objects = BTreeMap::new();
    for (&number, entry) in &reader.document.reference_table.entries {
        let XrefEntry::Normal { generation, .. } = *entry else {
            continue;
        };
        let id = (number, generation);
        match reader.get_object(id, &mut HashSet::new()) {
            Ok(object) => {
                objects.insert(id, object);
            }
            Err(err) => debug!(?id, %err, "Skipping unparsable encrypted object"),
        }
    }

    let mut document = reader.document;
    document.objects.extend(objects);
    debug!(objects = document.objects.len(), "Encrypted objects read");
    document
}

/// Drop the encryption dictionary and every trace of it.
fn strip_encryption(doc: &mut Document) {
    if let Ok(id) = doc.trailer.get(b"Encrypt").and_then(Object::as_reference) {
        doc.objects.remove(&id);
    }
    doc.trailer.remove(b"Encrypt");
    doc.encryption_state = None;
}

fn password_error(err: lopdf::Error) -> FolioError {
    match err {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => FolioError::WrongPassword,
        other => FolioError::DecryptionFailed(other.to_string()),
    }
}

/// The standard security handler keys off the first `/ID` string.
fn ensure_file_id(doc: &mut Document) {
    if doc.trailer.has(b"ID") {
        return;
    }
    let id = Uuid::new_v4().as_bytes().to_vec();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
}

fn strip_metadata(doc: &mut Document) {
    doc.trailer.remove(b"Info");
    if let Ok(catalog) = doc.catalog_mut() {
        catalog.remove(b"Metadata");
    }
    debug!("Metadata stripped");
}

/// Re-encode 8-bit RGB/Gray JPEG images at `quality`, keeping a new encoding
/// only when it is smaller. Returns how many images were replaced.
fn reencode_images(doc: &mut Document, quality: u8) -> usize {
    let mut replaced = 0;
    for object in doc.objects.values_mut() {
        let Object::Stream(stream) = object else {
            continue;
        };
        let Some(gray) = reencodable_jpeg(&stream.dict) else {
            continue;
        };
        if let Some(smaller) = reencode_jpeg(&stream.content, quality, gray)
            .filter(|bytes| bytes.len() < stream.content.len())
        {
            stream.set_content(smaller);
            replaced += 1;
        }
    }
    replaced
}

/// `Some(is_gray)` when the stream is an 8-bit DeviceRGB/DeviceGray JPEG.
fn reencodable_jpeg(dict: &Dictionary) -> Option<bool> {
    let is_image = dict
        .get(b"Subtype")
        .and_then(|s| s.as_name())
        .map(|name| name == b"Image")
        .unwrap_or(false);
    if !is_image || dict.has(b"Decode") {
        return None;
    }

    let dct_only = match dict.get(b"Filter").ok()? {
        Object::Name(name) => name == b"DCTDecode",
        Object::Array(filters) => {
            filters.len() == 1 && matches!(&filters[0], Object::Name(n) if n == b"DCTDecode")
        }
        _ => false,
    };
    let eight_bit = dict
        .get(b"BitsPerComponent")
        .and_then(|b| b.as_i64())
        .map(|bits| bits == 8)
        .unwrap_or(false);
    if !dct_only || !eight_bit {
        return None;
    }

    match dict.get(b"ColorSpace").and_then(|c| c.as_name()).ok()? {
        b"DeviceRGB" => Some(false),
        b"DeviceGray" => Some(true),
        _ => None,
    }
}

fn reencode_jpeg(data: &[u8], quality: u8, gray: bool) -> Option<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(data, ImageFormat::Jpeg).ok()?;
    let normalised = if gray {
        DynamicImage::ImageLuma8(decoded.to_luma8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };
    let mut output = Vec::new();
    normalised
        .write_with_encoder(JpegEncoder::new_with_quality(&mut output, quality))
        .ok()?;
    Some(output)
}

#[cfg(test)]
mod tests {
    use lopdf::{Stream, dictionary};

    use super::*;

    #[test]
    fn all_eight_permissions_are_encoded() {
        let all = permission_mask(&PermissionSet::all());
        assert!(all.contains(Permissions::FILLABLE));
        assert!(all.contains(Permissions::PRINTABLE_IN_HIGH_QUALITY));

        let mut restricted = PermissionSet::all();
        restricted.assemble = false;
        restricted.copy = false;
        let mask = permission_mask(&restricted);
        assert!(!mask.contains(Permissions::ASSEMBLABLE));
        assert!(!mask.contains(Permissions::COPYABLE));
        assert!(mask.contains(Permissions::PRINTABLE));

        assert_eq!(permission_mask(&PermissionSet::none()), Permissions::empty());
    }

    #[test]
    fn file_id_is_added_once() {
        let mut doc = Document::with_version("1.7");
        ensure_file_id(&mut doc);
        let first = doc.trailer.get(b"ID").unwrap().clone();
        ensure_file_id(&mut doc);
        assert_eq!(doc.trailer.get(b"ID").unwrap(), &first);
    }

    #[test]
    fn only_plain_jpegs_are_reencoded() {
        let rgb = dictionary! {
            "Subtype" => "Image",
            "Filter" => "DCTDecode",
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
        };
        assert_eq!(reencodable_jpeg(&rgb), Some(false));

        let mut cmyk = rgb.clone();
        cmyk.set("ColorSpace", "DeviceCMYK");
        assert_eq!(reencodable_jpeg(&cmyk), None);

        let mut flate = rgb.clone();
        flate.set("Filter", "FlateDecode");
        assert_eq!(reencodable_jpeg(&flate), None);
    }

    #[test]
    fn noisy_jpeg_shrinks_at_low_quality() {
        let img = image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x ^ y) * 11 % 256) as u8])
        });
        let mut original = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_with_encoder(JpegEncoder::new_with_quality(&mut original, 100))
            .unwrap();

        let mut doc = Document::with_version("1.7");
        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 64,
                "Height" => 64,
                "Filter" => "DCTDecode",
                "BitsPerComponent" => 8,
                "ColorSpace" => "DeviceRGB",
            },
            original.clone(),
        ));

        assert_eq!(reencode_images(&mut doc, 30), 1);
        let stream = doc
            .objects
            .values()
            .find_map(|o| o.as_stream().ok())
            .unwrap();
        assert!(stream.content.len() < original.len());
    }

    #[test]
    fn rewrite_strips_metadata_for_low_tier() {
        let mut doc = Document::with_version("1.7");
        let info = doc.add_object(dictionary! {
            "Author" => Object::string_literal("someone"),
        });
        doc.trailer.set("Info", info);
        let catalog = doc.add_object(dictionary! { "Type" => "Catalog" });
        doc.trailer.set("Root", catalog);

        let backend = ContentStreamBackend::with_profile(folio_core::CompressionQuality::Low.profile());
        backend.rewrite(&mut doc);
        assert!(!doc.trailer.has(b"Info"));
    }
}
