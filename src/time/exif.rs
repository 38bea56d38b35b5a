//! EXIF date-taken access for images
//!
//! Reading goes through kamadak-exif. Writing is JPEG-only and works on
//! the raw container: the fixed-length ASCII DateTimeOriginal field is
//! patched in place when present, otherwise a minimal EXIF APP1 segment
//! is inserted. HEIC containers are read-only here.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,
    Tag::DateTimeDigitized,
    Tag::DateTime,
];

const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

/// Wire format for EXIF capture timestamps: `YYYY:MM:DD HH:MM:SS`
pub fn to_wire_format(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y:%m:%d %H:%M:%S").to_string()
}

/// Read the date-taken value from a file's embedded metadata
///
/// Returns `Ok(None)` when the file carries no EXIF block or no date tag;
/// only the initial open is a hard error. A container without metadata is
/// normal input, not a failure.
pub fn read_date_taken(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(_) => return Ok(None),
    };

    for tag in DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY)
            && let Some(datetime) = parse_exif_datetime(&field.display_value().to_string())
        {
            trace!(?path, ?tag, "Found EXIF date");
            return Ok(Some(datetime));
        }
    }

    Ok(None)
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // Some writers use subseconds or unconventional separators
    let formats = [
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}

/// Write the date-taken value into a JPEG file
///
/// The DateTimeOriginal field is a fixed 20-byte ASCII value
/// ("YYYY:MM:DD HH:MM:SS\0"), so an existing field can be overwritten in
/// place without shifting the rest of the container. Files without the
/// field get a minimal EXIF APP1 segment inserted after SOI. The patched
/// buffer is written back in one pass.
pub fn write_date_taken(path: &Path, datetime: &NaiveDateTime) -> Result<()> {
    let mut data = fs::read(path)?;

    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::ExifWriteUnsupported {
            path: path.to_path_buf(),
            message: "not a JPEG container".to_string(),
        });
    }

    let wire = to_wire_format(datetime);

    if patch_date_taken(&mut data, &wire).map_err(|message| Error::ExifWrite {
        path: path.to_path_buf(),
        message,
    })? {
        trace!(?path, wire, "Patched DateTimeOriginal in place");
        fs::write(path, &data)?;
        return Ok(());
    }

    // No patchable field; insert a fresh minimal APP1 segment. It lands
    // before any existing APP1 block, so readers that take the first EXIF
    // segment see the new date.
    let segment = build_exif_segment(&wire);
    let insert_at = insertion_offset(&data);
    let mut patched = Vec::with_capacity(data.len() + segment.len());
    patched.extend_from_slice(&data[..insert_at]);
    patched.extend_from_slice(&segment);
    patched.extend_from_slice(&data[insert_at..]);

    trace!(?path, wire, "Inserted EXIF APP1 segment");
    fs::write(path, &patched)?;
    Ok(())
}

/// Walk the JPEG segments and overwrite an existing DateTimeOriginal
/// field. Returns `Ok(true)` when a field was patched.
fn patch_date_taken(data: &mut [u8], wire: &str) -> std::result::Result<bool, String> {
    let mut pos = 2usize;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            break;
        }
        let marker = data[pos + 1];

        // SOS or EOI: no more metadata segments
        if marker == 0xDA || marker == 0xD9 {
            break;
        }

        // Standalone markers carry no length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }

        let seg_len = ((data[pos + 2] as usize) << 8) | (data[pos + 3] as usize);
        if seg_len < 2 || pos + 2 + seg_len > data.len() {
            break;
        }

        if marker == 0xE1 {
            let seg_start = pos + 4;
            let seg_end = pos + 2 + seg_len;

            if seg_start + 6 <= seg_end && &data[seg_start..seg_start + 6] == b"Exif\0\0" {
                let tiff_start = seg_start + 6;
                if patch_tiff_date_taken(data, tiff_start, seg_end, wire)? {
                    return Ok(true);
                }
            }
        }

        pos += 2 + seg_len;
    }

    Ok(false)
}

#[derive(Clone, Copy, PartialEq)]
enum ByteOrder {
    Little,
    Big,
}

fn read_u16(data: &[u8], offset: usize, order: ByteOrder) -> u16 {
    match order {
        ByteOrder::Little => u16::from_le_bytes([data[offset], data[offset + 1]]),
        ByteOrder::Big => u16::from_be_bytes([data[offset], data[offset + 1]]),
    }
}

fn read_u32(data: &[u8], offset: usize, order: ByteOrder) -> u32 {
    match order {
        ByteOrder::Little => u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]),
        ByteOrder::Big => u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]),
    }
}

/// Locate DateTimeOriginal inside the TIFF block and overwrite its value
fn patch_tiff_date_taken(
    data: &mut [u8],
    tiff_start: usize,
    seg_end: usize,
    wire: &str,
) -> std::result::Result<bool, String> {
    if tiff_start + 8 > seg_end {
        return Err("TIFF header too short".to_string());
    }

    let order = match &data[tiff_start..tiff_start + 2] {
        b"II" => ByteOrder::Little,
        b"MM" => ByteOrder::Big,
        _ => return Err("unknown TIFF byte order".to_string()),
    };

    if read_u16(data, tiff_start + 2, order) != 42 {
        return Err("invalid TIFF magic".to_string());
    }

    let ifd0_abs = tiff_start + read_u32(data, tiff_start + 4, order) as usize;
    if ifd0_abs + 2 > seg_end {
        return Ok(false);
    }

    // Walk IFD0 for the Exif IFD pointer
    let mut exif_ifd_abs: Option<usize> = None;
    let entry_count = read_u16(data, ifd0_abs, order) as usize;
    for i in 0..entry_count {
        let entry_abs = ifd0_abs + 2 + i * 12;
        if entry_abs + 12 > seg_end {
            break;
        }
        if read_u16(data, entry_abs, order) == TAG_EXIF_IFD_POINTER {
            exif_ifd_abs = Some(tiff_start + read_u32(data, entry_abs + 8, order) as usize);
        }
    }

    let Some(exif_ifd_abs) = exif_ifd_abs else {
        return Ok(false);
    };
    if exif_ifd_abs + 2 > seg_end {
        return Ok(false);
    }

    let entry_count = read_u16(data, exif_ifd_abs, order) as usize;
    for i in 0..entry_count {
        let entry_abs = exif_ifd_abs + 2 + i * 12;
        if entry_abs + 12 > seg_end {
            break;
        }
        let tag = read_u16(data, entry_abs, order);
        let dtype = read_u16(data, entry_abs + 2, order);
        let count = read_u32(data, entry_abs + 4, order) as usize;

        // ASCII "YYYY:MM:DD HH:MM:SS\0" is exactly 20 bytes, stored
        // out-of-line
        if tag == TAG_DATETIME_ORIGINAL && dtype == 2 && count == 20 {
            let value_abs = tiff_start + read_u32(data, entry_abs + 8, order) as usize;
            if value_abs + 20 <= seg_end {
                data[value_abs..value_abs + 19].copy_from_slice(wire.as_bytes());
                data[value_abs + 19] = 0;
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Offset at which a new APP1 segment should be inserted: right after
/// SOI, or after a leading JFIF APP0 if one is present.
fn insertion_offset(data: &[u8]) -> usize {
    if data.len() >= 6 && data[2] == 0xFF && data[3] == 0xE0 {
        let seg_len = ((data[4] as usize) << 8) | (data[5] as usize);
        let end = 2 + 2 + seg_len;
        if seg_len >= 2 && end <= data.len() {
            return end;
        }
    }
    2
}

/// Build a minimal little-endian EXIF APP1 segment carrying a single
/// DateTimeOriginal field.
///
/// Layout (offsets relative to the TIFF header):
///   0  TIFF header ("II", 42, IFD0 offset = 8)
///   8  IFD0: one entry (ExifIFDPointer -> 26), next = 0
///   26 Exif IFD: one entry (DateTimeOriginal, ASCII, count 20,
///      value offset 44), next = 0
///   44 the 20-byte datetime value
fn build_exif_segment(wire: &str) -> Vec<u8> {
    debug_assert_eq!(wire.len(), 19);

    let mut tiff = Vec::with_capacity(64);
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&TAG_EXIF_IFD_POINTER.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes()); // LONG
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes()); // next IFD

    // Exif IFD
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&TAG_DATETIME_ORIGINAL.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes()); // ASCII
    tiff.extend_from_slice(&20u32.to_le_bytes());
    tiff.extend_from_slice(&44u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes()); // next IFD

    tiff.extend_from_slice(wire.as_bytes());
    tiff.push(0);

    let mut segment = Vec::with_capacity(4 + 6 + tiff.len());
    segment.extend_from_slice(&[0xFF, 0xE1]);
    segment.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    segment.extend_from_slice(b"Exif\0\0");
    segment.extend_from_slice(&tiff);
    segment
}
