//! Tests for the ISF bulletin parser

pub mod importer_tests;
pub mod line_kind_tests;

/// Column-title row opening an origin block, as the ISC emits it
pub const ORIGIN_HEADER_LINE: &str = "Date       Time        Err   RMS Latitude Longitude  Smaj  Smin  Az Depth   Err Ndef Nsta Gap  mdist  Mdist Qual   Author      OrigID";

/// Column-title row opening a measure block
pub const MEASURE_HEADER_LINE: &str = "Magnitude  Err Nsta Author      OrigID";

/// Write `text` into a fixed-width buffer at byte offset `start`
pub fn place(buf: &mut [u8], start: usize, text: &str) {
    buf[start..start + text.len()].copy_from_slice(text.as_bytes());
}

/// Build a well-formed 136-column origin block line. The origin id must be
/// exactly 8 characters so the line does not end in trimmable whitespace.
pub fn origin_line(origin_id: &str, author: &str) -> String {
    assert_eq!(origin_id.len(), 8);
    let mut buf = vec![b' '; 136];
    place(&mut buf, 0, "2010/01/12");
    place(&mut buf, 11, "21:53:10");
    place(&mut buf, 19, ".");
    place(&mut buf, 20, "57");
    place(&mut buf, 24, " 0.16");
    place(&mut buf, 30, " 0.35");
    place(&mut buf, 36, " 33.0310");
    place(&mut buf, 45, " -86.6190");
    place(&mut buf, 55, " 12.1");
    place(&mut buf, 61, "  8.7");
    place(&mut buf, 67, " 34");
    place(&mut buf, 71, " 10.0");
    place(&mut buf, 78, " 1.2");
    place(&mut buf, 83, "  22");
    place(&mut buf, 88, "  11");
    place(&mut buf, 93, " 90");
    place(&mut buf, 97, "  0.56");
    place(&mut buf, 104, " 12.24");
    place(&mut buf, 111, "m");
    place(&mut buf, 113, "i");
    place(&mut buf, 115, "ke");
    place(&mut buf, 118, author);
    place(&mut buf, 128, origin_id);
    String::from_utf8(buf).unwrap()
}

/// Build a well-formed 38-column measure block line
pub fn measure_line(scale: &str, agency: &str, origin_id: &str) -> String {
    assert_eq!(origin_id.len(), 8);
    let mut buf = vec![b' '; 38];
    place(&mut buf, 0, scale);
    place(&mut buf, 6, " 4.60");
    place(&mut buf, 11, "0.2");
    place(&mut buf, 15, "  12");
    place(&mut buf, 19, agency);
    place(&mut buf, 30, origin_id);
    String::from_utf8(buf).unwrap()
}

/// A minimal well-formed single-event bulletin
pub fn single_event_bulletin() -> String {
    [
        "ISC Bulletin",
        "Event 00162786 Alabama",
        "",
        ORIGIN_HEADER_LINE,
        &origin_line("00162786", "ISC"),
        MEASURE_HEADER_LINE,
        &measure_line("mb", "ISC", "00162786"),
        "STOP",
    ]
    .join("\n")
}
