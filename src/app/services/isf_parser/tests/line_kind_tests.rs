//! Tests for bulletin line classification

use super::{MEASURE_HEADER_LINE, ORIGIN_HEADER_LINE, measure_line, origin_line};
use crate::app::services::isf_parser::line_kind::{
    LineKind, classify, event_header_fields, unknown_scale_fields,
};

#[test]
fn recognizes_literal_lines() {
    assert_eq!(classify("ISC Bulletin", true), LineKind::CatalogueHeader);
    assert_eq!(classify("ISC Bulletin", false), LineKind::CatalogueHeader);
    assert_eq!(classify("STOP", false), LineKind::Stop);
}

#[test]
fn recognizes_header_rows() {
    assert_eq!(classify(ORIGIN_HEADER_LINE, false), LineKind::OriginHeader);
    assert_eq!(classify(MEASURE_HEADER_LINE, false), LineKind::MeasureHeader);
    // header patterns fire regardless of parser position
    assert_eq!(classify(ORIGIN_HEADER_LINE, true), LineKind::OriginHeader);
}

#[test]
fn recognizes_event_headers() {
    assert_eq!(
        classify("Event 00162786 Alabama", false),
        LineKind::EventHeader
    );
    // a bare "Event" word is not a header
    assert_eq!(classify("Event", false), LineKind::Junk);
}

#[test]
fn event_header_fields_are_extracted() {
    let header = event_header_fields("Event 00162786 Alabama").unwrap();
    assert_eq!(header.source_key, "00162786");
    assert_eq!(header.name, "Alabama");

    assert!(event_header_fields("not an event line").is_none());
}

#[test]
fn comments_and_blank_lines() {
    assert_eq!(classify("(#PRIME origin 00162786)", false), LineKind::Comment);
    assert_eq!(classify("", false), LineKind::Comment);
    assert_eq!(classify("   ", false), LineKind::Comment);
    // an empty pair of parentheses is not a comment
    assert_eq!(classify("()", false), LineKind::Junk);
}

#[test]
fn block_lines_are_length_detected() {
    let origin = origin_line("00162786", "ISC");
    assert_eq!(origin.len(), 136);
    assert_eq!(classify(&origin, false), LineKind::OriginBlock);

    let measure = measure_line("mb", "ISC", "00162786");
    assert_eq!(measure.len(), 38);
    assert_eq!(classify(&measure, false), LineKind::MeasureBlock);
}

#[test]
fn length_detection_is_gated_before_the_catalogue_header() {
    // before any catalogue header, a 136- or 38-character line is junk
    let origin = origin_line("00162786", "ISC");
    assert_eq!(classify(&origin, true), LineKind::Junk);
    let measure = measure_line("mb", "ISC", "00162786");
    assert_eq!(classify(&measure, true), LineKind::Junk);
}

#[test]
fn recognizes_unknown_scale_measures() {
    assert_eq!(
        classify("5.20 0.30 12 XYZ;ABC 00162786", false),
        LineKind::MeasureUnknownScaleBlock
    );
    // error and station groups may be omitted
    assert_eq!(
        classify("7.10   NEIC 00162786", false),
        LineKind::MeasureUnknownScaleBlock
    );
}

#[test]
fn unknown_scale_fields_are_extracted() {
    let full = unknown_scale_fields("5.20 0.30 12 XYZ;ABC 00162786").unwrap();
    assert_eq!(full.value, "5.20");
    assert_eq!(full.error, Some("0.30"));
    assert_eq!(full.stations, Some("12"));
    assert_eq!(full.agency, "XYZ;ABC");
    assert_eq!(full.origin, "00162786");

    let sparse = unknown_scale_fields("7.10   NEIC 00162786").unwrap();
    assert_eq!(sparse.value, "7.10");
    assert_eq!(sparse.error, None);
    assert_eq!(sparse.stations, None);
    assert_eq!(sparse.agency, "NEIC");
    assert_eq!(sparse.origin, "00162786");
}

#[test]
fn everything_else_is_junk() {
    assert_eq!(classify("International Seismological Centre", true), LineKind::Junk);
    assert_eq!(classify("GARBAGE LINE HERE", false), LineKind::Junk);
}
