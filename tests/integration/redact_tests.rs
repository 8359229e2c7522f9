//! End-to-end redaction tests on files in temporary directories.
//!
//! Tests verify:
//! - The macro page is replaced and its compression set to 1
//! - All other bytes, including the directory layout, are unchanged
//! - In-place and copy outputs behave as expected
//! - Failures are reported per page and never change the file length

use std::fs;

use tempfile::TempDir;

use wsi_redact::{
    read_directories, redact_macro, ByteStore, ExplicitPages, FillColor, MacroPage,
    PlaceholderCodec, RedactError, Redactor, TiffTag,
};

use super::test_utils::{
    create_ndpi_like, create_slide_with_pages, fixed_encoder, ifd_bytes, is_valid_jpeg,
    strip_range, tag_value, write_slide, ByteOrderType, PageBuilder, TiffBuilder,
};

// =============================================================================
// Macro Redaction Tests
// =============================================================================

#[test]
fn test_macro_redacted_into_copy() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    let report = redact_macro(&input, &output).unwrap();

    assert!(!report.in_place);
    assert_eq!(report.file_len, original.len() as u64);
    assert_eq!(report.pages.len(), 1);
    let page = &report.pages[0];
    assert_eq!(page.index, 1);
    assert_eq!((page.width, page.height), (64, 32));
    assert_eq!(page.previous_compression, 7);

    // Input untouched
    assert_eq!(fs::read(&input).unwrap(), original);

    let redacted = fs::read(&output).unwrap();
    assert_eq!(redacted.len(), original.len());
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 1);

    // Placeholder at the start of the strip, zeros after it
    let strip = strip_range(&redacted, 1);
    let payload = &redacted[strip.start..strip.start + page.payload_len];
    assert!(is_valid_jpeg(payload));
    let decoded = image::load_from_memory(payload).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 32));
    assert!(redacted[strip.start + page.payload_len..strip.end]
        .iter()
        .all(|&b| b == 0));
}

#[test]
fn test_other_pages_byte_identical() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    redact_macro(&input, &output).unwrap();
    let redacted = fs::read(&output).unwrap();

    for page in [0, 2] {
        assert_eq!(ifd_bytes(&redacted, page), ifd_bytes(&original, page));
        assert_eq!(
            redacted[strip_range(&redacted, page)],
            original[strip_range(&original, page)]
        );
        assert_eq!(tag_value(&redacted, page, TiffTag::Compression), 7);
    }

    // Only the strip and the compression value field of page 1 differ
    let strip = strip_range(&original, 1);
    let directories = read_directories(&ByteStore::from_bytes(&original).unwrap()).unwrap();
    let compression_field = directories[1]
        .get_entry(TiffTag::Compression)
        .unwrap()
        .value_field_offset() as usize;

    for (i, (a, b)) in original.iter().zip(&redacted).enumerate() {
        if a != b {
            assert!(
                strip.contains(&i) || (compression_field..compression_field + 4).contains(&i),
                "unexpected change at offset {}",
                i
            );
        }
    }
}

#[test]
fn test_directory_topology_unchanged() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    redact_macro(&input, &output).unwrap();
    let redacted = fs::read(&output).unwrap();

    let before = read_directories(&ByteStore::from_bytes(&original).unwrap()).unwrap();
    let after = read_directories(&ByteStore::from_bytes(&redacted).unwrap()).unwrap();
    assert_eq!(before.len(), after.len());

    for (b, a) in before.iter().zip(&after) {
        assert_eq!(b.offset, a.offset);
        assert_eq!(b.next_ifd_offset, a.next_ifd_offset);
        assert_eq!(b.entry_count(), a.entry_count());
        for (eb, ea) in b.entries.iter().zip(&a.entries) {
            assert_eq!(eb.offset, ea.offset);
            assert_eq!(eb.tag_id, ea.tag_id);
            assert_eq!(eb.field_type_raw, ea.field_type_raw);
            assert_eq!(eb.count, ea.count);
            if eb.tag_id != TiffTag::Compression.as_u16() {
                assert_eq!(eb.value_offset_bytes, ea.value_offset_bytes);
            }
        }
    }
}

#[test]
fn test_in_place_redaction() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);

    let report = redact_macro(&input, &input).unwrap();
    assert!(report.in_place);

    let redacted = fs::read(&input).unwrap();
    assert_eq!(redacted.len(), original.len());
    assert_ne!(redacted, original);
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 1);
}

#[test]
fn test_in_place_through_other_spelling() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let dotted = dir.path().join(".").join("slide.ndpi");

    let report = redact_macro(&input, &dotted).unwrap();
    assert!(report.in_place);
    assert_eq!(tag_value(&fs::read(&input).unwrap(), 1, TiffTag::Compression), 1);
}

#[test]
fn test_in_place_through_hard_link() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let link = dir.path().join("link.ndpi");
    fs::hard_link(&input, &link).unwrap();

    let report = redact_macro(&input, &link).unwrap();
    assert!(report.in_place);

    // Both names still see one intact, redacted slide
    let redacted = fs::read(&input).unwrap();
    assert_eq!(redacted.len(), original.len());
    assert_eq!(&redacted[..8], &original[..8]);
    assert_eq!(read_directories(&ByteStore::from_bytes(&redacted).unwrap()).unwrap().len(), 3);
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 1);
    assert_eq!(
        redacted[strip_range(&redacted, 0)],
        original[strip_range(&original, 0)]
    );
    assert_eq!(fs::read(&link).unwrap(), redacted);
}

#[cfg(unix)]
#[test]
fn test_in_place_through_symlink() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::BigEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let link = dir.path().join("link.ndpi");
    std::os::unix::fs::symlink(&input, &link).unwrap();

    let report = redact_macro(&input, &link).unwrap();
    assert!(report.in_place);

    let redacted = fs::read(&input).unwrap();
    assert_eq!(redacted.len(), original.len());
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 1);
    assert_eq!(tag_value(&redacted, 2, TiffTag::Compression), 7);
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = write_slide(dir.path(), "redacted.ndpi", b"stale");

    redact_macro(&input, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap().len(), original.len());
}

// =============================================================================
// Small File Tests
// =============================================================================

#[test]
fn test_one_and_two_page_files_unchanged() {
    let dir = TempDir::new().unwrap();

    for count in [1, 2] {
        let original = create_slide_with_pages(count, 64);
        let input = write_slide(dir.path(), "small.tif", &original);
        let output = dir.path().join("small-out.tif");

        let report = redact_macro(&input, &output).unwrap();
        assert!(report.pages.is_empty());
        assert_eq!(fs::read(&output).unwrap(), original);
    }
}

#[test]
fn test_macro_page_of_long_chain() {
    let dir = TempDir::new().unwrap();
    let original = create_slide_with_pages(1030, 8);
    let input = write_slide(dir.path(), "long.tif", &original);
    let output = dir.path().join("long-out.tif");

    let report = Redactor::with_encoder(fixed_encoder(4))
        .redact_pages(&input, &output, &MacroPage)
        .unwrap();
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].index, 1028);

    let redacted = fs::read(&output).unwrap();
    assert_eq!(tag_value(&redacted, 1028, TiffTag::Compression), 1);
    assert_eq!(tag_value(&redacted, 1022, TiffTag::Compression), 7);
    assert_eq!(tag_value(&redacted, 1029, TiffTag::Compression), 7);
}

#[test]
fn test_non_tiff_input() {
    let dir = TempDir::new().unwrap();
    let input = write_slide(dir.path(), "notes.txt", b"this is not a slide");
    let output = dir.path().join("out.txt");

    let result = redact_macro(&input, &output);
    assert!(matches!(result, Err(RedactError::NoPagesFound)));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let result = redact_macro(dir.path().join("absent.ndpi"), dir.path().join("out.ndpi"));
    assert!(matches!(result, Err(RedactError::Io(_))));
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_payload_at_capacity() {
    let dir = TempDir::new().unwrap();
    let original = create_slide_with_pages(3, 100);
    let input = write_slide(dir.path(), "slide.tif", &original);
    let output = dir.path().join("out.tif");

    let report = Redactor::with_encoder(fixed_encoder(100))
        .redact_pages(&input, &output, &MacroPage)
        .unwrap();
    assert_eq!(report.pages[0].payload_len, 100);

    let redacted = fs::read(&output).unwrap();
    assert!(redacted[strip_range(&redacted, 1)].iter().all(|&b| b == 0xAB));
}

#[test]
fn test_payload_over_capacity() {
    let dir = TempDir::new().unwrap();
    let original = create_slide_with_pages(3, 100);
    let input = write_slide(dir.path(), "slide.tif", &original);
    let output = dir.path().join("out.tif");

    let result = Redactor::with_encoder(fixed_encoder(101)).redact_pages(&input, &output, &MacroPage);
    assert!(matches!(
        result,
        Err(RedactError::PayloadTooLarge {
            page: 1,
            payload: 101,
            capacity: 100
        })
    ));

    // Length preserved even on failure; the tag is not rewritten
    let partial = fs::read(&output).unwrap();
    assert_eq!(partial.len(), original.len());
    assert_eq!(tag_value(&partial, 1, TiffTag::Compression), 7);
    assert_eq!(fs::read(&input).unwrap(), original);
}

// =============================================================================
// Malformed Page Tests
// =============================================================================

#[test]
fn test_missing_strip_byte_counts() {
    let dir = TempDir::new().unwrap();
    let original = TiffBuilder::new()
        .add_page(PageBuilder::new(16, 8, 64))
        .add_page(PageBuilder::new(16, 8, 64).without_tag(279))
        .add_page(PageBuilder::new(16, 8, 64))
        .build();
    let input = write_slide(dir.path(), "slide.tif", &original);
    let output = dir.path().join("out.tif");

    let result = redact_macro(&input, &output);
    assert!(matches!(
        result,
        Err(RedactError::MissingRequiredTag {
            page: 1,
            tag: TiffTag::StripByteCounts
        })
    ));
    assert_eq!(fs::read(&output).unwrap(), original);
}

#[test]
fn test_missing_image_width_reported_first() {
    let dir = TempDir::new().unwrap();
    let original = TiffBuilder::new()
        .add_page(PageBuilder::new(16, 8, 64))
        .add_page(
            PageBuilder::new(16, 8, 64)
                .without_tag(256)
                .without_tag(259),
        )
        .add_page(PageBuilder::new(16, 8, 64))
        .build();
    let input = write_slide(dir.path(), "slide.tif", &original);

    let result = redact_macro(&input, dir.path().join("out.tif"));
    assert!(matches!(
        result,
        Err(RedactError::MissingRequiredTag {
            page: 1,
            tag: TiffTag::ImageWidth
        })
    ));
}

#[test]
fn test_multi_strip_page_rejected() {
    let dir = TempDir::new().unwrap();
    let original = TiffBuilder::new()
        .add_page(PageBuilder::new(16, 8, 64))
        .add_page(PageBuilder::new(16, 8, 64).with_strips(4))
        .add_page(PageBuilder::new(16, 8, 64))
        .build();
    let input = write_slide(dir.path(), "slide.tif", &original);

    let result = redact_macro(&input, dir.path().join("out.tif"));
    assert!(matches!(
        result,
        Err(RedactError::MultiStripUnsupported { page: 1, count: 4 })
    ));
}

#[test]
fn test_earlier_pages_not_rolled_back() {
    let dir = TempDir::new().unwrap();
    let original = TiffBuilder::new()
        .add_page(PageBuilder::new(16, 8, 64))
        .add_page(PageBuilder::new(16, 8, 64).with_strips(2))
        .add_page(PageBuilder::new(16, 8, 64))
        .build();
    let input = write_slide(dir.path(), "slide.tif", &original);
    let output = dir.path().join("out.tif");

    let result = Redactor::with_encoder(fixed_encoder(8)).redact_pages(
        &input,
        &output,
        &ExplicitPages::new([0, 1, 2]),
    );
    assert!(matches!(
        result,
        Err(RedactError::MultiStripUnsupported { page: 1, .. })
    ));

    let partial = fs::read(&output).unwrap();
    assert_eq!(tag_value(&partial, 0, TiffTag::Compression), 1);
    assert_eq!(tag_value(&partial, 2, TiffTag::Compression), 7);
}

// =============================================================================
// Byte Order and Field Type Tests
// =============================================================================

#[test]
fn test_big_endian_slide() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::BigEndian);
    assert_eq!(&original[..2], b"MM");
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    let report = redact_macro(&input, &output).unwrap();
    assert_eq!((report.pages[0].width, report.pages[0].height), (64, 32));

    let redacted = fs::read(&output).unwrap();
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 1);

    let directories = read_directories(&ByteStore::from_bytes(&redacted).unwrap()).unwrap();
    let field = directories[1]
        .get_entry(TiffTag::Compression)
        .unwrap()
        .value_field_offset() as usize;
    assert_eq!(&redacted[field..field + 4], &[0x00, 0x01, 0x00, 0x00]);

    let strip = strip_range(&redacted, 1);
    assert!(is_valid_jpeg(&redacted[strip]));
}

#[test]
fn test_long_compression_field() {
    let dir = TempDir::new().unwrap();
    let original = TiffBuilder::new()
        .with_byte_order(ByteOrderType::BigEndian)
        .add_page(PageBuilder::new(16, 8, 64))
        .add_page(PageBuilder::new(16, 8, 64).with_compression(33003, 4))
        .add_page(PageBuilder::new(16, 8, 64))
        .build();
    let input = write_slide(dir.path(), "slide.svs", &original);
    let output = dir.path().join("out.svs");

    let report = Redactor::with_encoder(fixed_encoder(4))
        .redact_pages(&input, &output, &MacroPage)
        .unwrap();
    assert_eq!(report.pages[0].previous_compression, 33003);

    let redacted = fs::read(&output).unwrap();
    let directories = read_directories(&ByteStore::from_bytes(&redacted).unwrap()).unwrap();
    let field = directories[1]
        .get_entry(TiffTag::Compression)
        .unwrap()
        .value_field_offset() as usize;
    assert_eq!(&redacted[field..field + 4], &[0x00, 0x00, 0x00, 0x01]);
}

// =============================================================================
// Placeholder Options Tests
// =============================================================================

#[test]
fn test_png_placeholder_with_fill() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    let report = Redactor::new()
        .with_fill(FillColor([255, 255, 255]))
        .with_codec(PlaceholderCodec::Png)
        .redact_pages(&input, &output, &MacroPage)
        .unwrap();

    let redacted = fs::read(&output).unwrap();
    let strip = strip_range(&redacted, 1);
    let payload = &redacted[strip.start..strip.start + report.pages[0].payload_len];
    assert_eq!(&payload[..4], b"\x89PNG");

    let decoded = image::load_from_memory(payload).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 32));
    assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn test_explicit_pages_with_unknown_index() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);
    let output = dir.path().join("redacted.ndpi");

    let report = Redactor::with_encoder(fixed_encoder(16))
        .redact_pages(&input, &output, &ExplicitPages::new([2, 0, 7]))
        .unwrap();

    let indices: Vec<_> = report.pages.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 2]);

    let redacted = fs::read(&output).unwrap();
    assert_eq!(tag_value(&redacted, 0, TiffTag::Compression), 1);
    assert_eq!(tag_value(&redacted, 1, TiffTag::Compression), 7);
    assert_eq!(tag_value(&redacted, 2, TiffTag::Compression), 1);
}

#[test]
fn test_closure_selector() {
    let dir = TempDir::new().unwrap();
    let original = create_ndpi_like(ByteOrderType::LittleEndian);
    let input = write_slide(dir.path(), "slide.ndpi", &original);

    let last = |dirs: &[wsi_redact::Ifd]| -> std::collections::BTreeSet<usize> {
        dirs.len().checked_sub(1).into_iter().collect()
    };
    let report = Redactor::with_encoder(fixed_encoder(16))
        .redact_pages(&input, &input, &last)
        .unwrap();
    assert_eq!(report.pages[0].index, 2);
}
