//! PDF text and image extraction using lopdf and pdf-extract.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    fn page_id(&self, page_index: u32) -> Result<ObjectId> {
        let doc = self.document()?;
        doc.get_pages()
            .get(&(page_index + 1))
            .copied()
            .ok_or(PdfError::InvalidPage(page_index))
    }

    /// Whole-document text from pdf-extract, split evenly across pages.
    fn extract_pages_fallback(&self, page_count: usize) -> Result<Vec<String>> {
        let full_text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let lines: Vec<&str> = full_text.lines().collect();
        let lines_per_page = lines.len().div_ceil(page_count.max(1));

        Ok((0..page_count)
            .map(|page| {
                let start = (page * lines_per_page).min(lines.len());
                let end = ((page + 1) * lines_per_page).min(lines.len());
                lines[start..end].join("\n")
            })
            .collect())
    }

    fn try_extract_image_from_object(&self, doc: &Document, obj: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;

        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
        let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        trace!("Found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                _ => None,
            };

            match filter_name {
                // JPEG data is decoded straight from the raw stream
                Some(b"DCTDecode") => {
                    return image::load_from_memory_with_format(
                        &stream.content,
                        image::ImageFormat::Jpeg,
                    )
                    .ok();
                }
                Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("Unsupported image filter {:?}", filter_name);
                    return None;
                }
                _ => {}
            }
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);

        if bits != 8 {
            trace!("Unsupported bits per component: {}", bits);
            return None;
        }

        create_image_from_raw(&data, width, height, color_space)
    }

    /// Resources dictionary for a page, walking up the page tree.
    fn get_page_resources(&self, doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
        let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
            return None;
        };

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                return Some(res_dict.clone());
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.get_page_resources(doc, *parent_id),
            _ => None,
        }
    }

    /// MediaBox for a page, walking up the page tree.
    fn get_media_box(&self, doc: &Document, node_id: ObjectId) -> Option<[f32; 4]> {
        let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
            return None;
        };

        if let Ok(media_box) = dict.get(b"MediaBox") {
            if let Ok((_, Object::Array(values))) = doc.dereference(media_box) {
                let coords: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
                if let [x1, y1, x2, y2] = coords[..] {
                    return Some([x1, y1, x2, y2]);
                }
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.get_media_box(doc, *parent_id),
            _ => None,
        }
    }
}

fn create_image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    if width == 0 || height == 0 {
        return None;
    }
    let pixels = (width as usize).checked_mul(height as usize)?;
    let rgb_len = pixels.checked_mul(3)?;

    let rgba: Vec<u8> = match color_space {
        b"DeviceRGB" | b"RGB" if data.len() >= rgb_len => data[..rgb_len]
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        b"DeviceGray" | b"G" if data.len() >= pixels => data[..pixels]
            .iter()
            .flat_map(|&g| [g, g, g, 255])
            .collect(),
        _ => {
            trace!(
                "Could not decode image: colorspace={:?}, data_len={}",
                String::from_utf8_lossy(color_space),
                data.len()
            );
            return None;
        }
    };

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut pages = Vec::with_capacity(page_numbers.len());
        for number in &page_numbers {
            match doc.extract_text(&[*number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    warn!(
                        "Per-page text extraction failed on page {}: {}, falling back to pdf-extract",
                        number, e
                    );
                    return self.extract_pages_fallback(page_numbers.len());
                }
            }
        }

        Ok(pages)
    }

    fn extract_page_image(&self, page_index: u32) -> Result<Option<DynamicImage>> {
        let doc = self.document()?;
        let page_id = self.page_id(page_index)?;

        let mut images = Vec::new();
        if let Some(resources) = self.get_page_resources(doc, page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = doc.dereference(obj_ref) {
                            if let Some(img) = self.try_extract_image_from_object(doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        debug!("Extracted {} images from page {}", images.len(), page_index);
        Ok(images
            .into_iter()
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height())))
    }

    fn page_width(&self, page_index: u32) -> Option<f32> {
        let doc = self.document.as_ref()?;
        let page_id = self.page_id(page_index).ok()?;
        self.get_media_box(doc, page_id)
            .map(|[x1, _, x2, _]| (x2 - x1).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, dictionary};

    /// Build a one-page PDF showing `text` on a 612x792 page.
    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_pages().is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.load(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_extracts_page_text() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf("Invoice No: INV-001")).unwrap();

        assert_eq!(extractor.page_count(), 1);
        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("INV-001"));
    }

    #[test]
    fn test_inherited_media_box() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf("x")).unwrap();

        assert_eq!(extractor.page_width(0), Some(612.0));
        assert_eq!(extractor.page_width(1), None);
    }

    #[test]
    fn test_page_without_images() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf("x")).unwrap();

        assert!(extractor.extract_page_image(0).unwrap().is_none());
        assert!(matches!(
            extractor.extract_page_image(3),
            Err(PdfError::InvalidPage(3))
        ));
    }

    #[test]
    fn test_raw_gray_image() {
        let img = create_image_from_raw(&[0, 128, 255, 64], 2, 2, b"DeviceGray").unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
        assert!(create_image_from_raw(&[0, 1], 2, 2, b"DeviceGray").is_none());
        assert!(create_image_from_raw(&[0; 16], 2, 2, b"DeviceCMYK").is_none());
    }

    #[test]
    fn test_raw_image_with_oversized_dimensions() {
        assert!(create_image_from_raw(&[0; 16], u32::MAX, u32::MAX, b"DeviceRGB").is_none());
        assert!(create_image_from_raw(&[0; 16], u32::MAX, u32::MAX, b"DeviceGray").is_none());
        assert!(create_image_from_raw(&[0; 16], 0, 4, b"DeviceGray").is_none());
    }

    #[test]
    fn test_image_object_with_bad_dimensions() {
        let extractor = PdfExtractor::new();
        let doc = Document::with_version("1.5");

        for (width, height) in [(-1i64, 2i64), (2, 0), (i64::MAX, 2)] {
            let image = Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0; 16],
            ));
            assert!(extractor.try_extract_image_from_object(&doc, &image).is_none());
        }
    }
}
