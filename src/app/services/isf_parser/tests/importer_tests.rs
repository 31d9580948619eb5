//! End-to-end tests for the import driver: happy path, idempotence,
//! block-level recovery, junk tolerance, and transactional abort

use super::{MEASURE_HEADER_LINE, ORIGIN_HEADER_LINE, measure_line, origin_line, single_event_bulletin};
use crate::app::models::{
    AgencyId, EventId, EventSourceId, MeasureData, MeasureId, OriginData, OriginId,
};
use crate::app::services::catalogue::{
    Catalogue, CatalogueError, CatalogueResult, MemoryCatalogue,
};
use crate::app::services::isf_parser::{ImportOptions, import_bulletin};
use crate::constants::UNKNOWN_SCALE;
use crate::Error;

fn import(bulletin: &str, catalogue: &mut MemoryCatalogue) -> crate::Result<crate::ImportSummary> {
    import_bulletin(bulletin.as_bytes(), catalogue, &ImportOptions::default())
}

#[test]
fn imports_a_single_event_bulletin() {
    let mut cat = MemoryCatalogue::new();
    let summary = import(&single_event_bulletin(), &mut cat).unwrap();

    assert_eq!(summary.event_sources_created, 1);
    assert_eq!(summary.events_created, 1);
    assert_eq!(summary.agencies_created, 1);
    assert_eq!(summary.origins_created, 1);
    assert_eq!(summary.measures_created, 1);
    assert!(!summary.has_errors());

    assert_eq!(cat.event_sources()[0].name, "ISC Bulletin");
    let event = &cat.events()[0];
    assert_eq!(event.source_key, "00162786");
    assert_eq!(event.name, "Alabama");

    let measure = &cat.measures()[0];
    assert_eq!(measure.scale, "mb");
    assert_eq!(measure.value, 4.6);
    assert_eq!(measure.standard_error, Some(0.2));
    assert_eq!(measure.event, event.id);
    assert_eq!(measure.origin, cat.origin_by_key("00162786").unwrap().id);
}

#[test]
fn reimport_creates_nothing_new() {
    let bulletin = single_event_bulletin();
    let mut cat = MemoryCatalogue::new();
    import(&bulletin, &mut cat).unwrap();

    let summary = import(&bulletin, &mut cat).unwrap();
    assert_eq!(summary.total_created(), 0);
    assert!(!summary.has_errors());

    assert_eq!(cat.events().len(), 1);
    assert_eq!(cat.origins().len(), 1);
    assert_eq!(cat.measures().len(), 1);
}

#[test]
fn reimport_updates_the_event_name() {
    let mut cat = MemoryCatalogue::new();
    import(&single_event_bulletin(), &mut cat).unwrap();
    assert_eq!(cat.events()[0].name, "Alabama");

    let renamed = single_event_bulletin().replace(
        "Event 00162786 Alabama",
        "Event 00162786 Central Alabama",
    );
    let summary = import(&renamed, &mut cat).unwrap();
    assert_eq!(summary.events_created, 0);
    assert_eq!(cat.events()[0].name, "Central Alabama");
}

#[test]
fn malformed_block_is_skipped_and_parsing_continues() {
    let bulletin = [
        "ISC Bulletin",
        "Event EVA First",
        ORIGIN_HEADER_LINE,
        &origin_line("OID00001", "ISC"),
        MEASURE_HEADER_LINE,
        &measure_line("mb", "ISC", "OID00001"),
        "GARBAGE LINE HERE",
        "Event EVB Second",
        ORIGIN_HEADER_LINE,
        &origin_line("OID00002", "NEIC"),
        MEASURE_HEADER_LINE,
        &measure_line("MS", "NEIC", "OID00002"),
        "STOP",
    ]
    .join("\n");

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();

    // both events made it despite the malformed line between them
    assert_eq!(summary.events_created, 2);
    assert_eq!(summary.origins_created, 2);
    assert_eq!(summary.measures_created, 2);
    assert_eq!(summary.agencies_created, 2);

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].line, 7);
    assert!(summary.errors[0].message.contains("violates the ISF format"));
    assert!(
        summary.errors[0]
            .message
            .contains("http://www.isc.ac.uk/standards/isf/")
    );
}

#[test]
fn recovery_does_not_discard_earlier_records() {
    // the malformed line truncates its own block only
    let bulletin = [
        "ISC Bulletin",
        "Event EVA First",
        ORIGIN_HEADER_LINE,
        &origin_line("OID00001", "ISC"),
        "not a measure header",
        "STOP",
    ]
    .join("\n");

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(cat.events().len(), 1);
    assert_eq!(cat.origins().len(), 1);
}

#[test]
fn leading_junk_is_skipped_by_default() {
    let bulletin = format!(
        "International Seismological Centre\nWeb request results\n{}",
        single_event_bulletin()
    );

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();
    assert!(!summary.has_errors());
    assert_eq!(summary.events_created, 1);
}

#[test]
fn leading_junk_is_an_error_when_disallowed() {
    let bulletin = format!("Web request results\n{}", single_event_bulletin());

    let mut cat = MemoryCatalogue::new();
    let options = ImportOptions { allow_junk: false };
    let summary = import_bulletin(bulletin.as_bytes(), &mut cat, &options).unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].line, 1);
    // the rest of the bulletin still imports
    assert_eq!(summary.events_created, 1);
    assert_eq!(summary.measures_created, 1);
}

#[test]
fn junk_after_the_header_is_always_an_error() {
    let bulletin = "ISC Bulletin\nGARBAGE\nSTOP";

    let mut cat = MemoryCatalogue::new();
    let summary = import(bulletin, &mut cat).unwrap();
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].line, 2);
}

#[test]
fn unknown_scale_measures_use_the_sentinel_scale() {
    let bulletin = [
        "ISC Bulletin",
        "Event 00162786 Alabama",
        ORIGIN_HEADER_LINE,
        &origin_line("00162786", "ISC"),
        MEASURE_HEADER_LINE,
        "5.20 0.30 12 XYZ;ABC 00162786",
        "7.10   NEIC 00162786",
        "STOP",
    ]
    .join("\n");

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();
    assert!(!summary.has_errors());
    assert_eq!(summary.measures_created, 2);
    // agencies resolved through the fallback path are not counted as created
    assert_eq!(summary.agencies_created, 1);

    let full = &cat.measures()[0];
    assert_eq!(full.scale, UNKNOWN_SCALE);
    assert_eq!(full.value, 5.2);
    assert_eq!(full.standard_error, Some(0.3));

    let sparse = &cat.measures()[1];
    assert_eq!(sparse.scale, UNKNOWN_SCALE);
    assert_eq!(sparse.value, 7.1);
    assert_eq!(sparse.standard_error, None);

    let names: Vec<_> = cat.agencies().iter().map(|a| a.source_key.as_str()).collect();
    assert_eq!(names, ["ISC", "XYZ;ABC", "NEIC"]);
}

#[test]
fn measure_referencing_an_unknown_origin_is_recorded() {
    let bulletin = [
        "ISC Bulletin",
        "Event 00162786 Alabama",
        ORIGIN_HEADER_LINE,
        &origin_line("00162786", "ISC"),
        MEASURE_HEADER_LINE,
        &measure_line("mb", "ISC", "99999999"),
        "STOP",
    ]
    .join("\n");

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();

    assert_eq!(summary.measures_created, 0);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].line, 6);
    assert!(cat.measures().is_empty());
}

#[test]
fn comments_and_trailing_content_are_ignored() {
    let bulletin = [
        "ISC Bulletin",
        "(comments may appear anywhere)",
        "Event 00162786 Alabama",
        "",
        ORIGIN_HEADER_LINE,
        &origin_line("00162786", "ISC"),
        "(#PRIME)",
        MEASURE_HEADER_LINE,
        &measure_line("mb", "ISC", "00162786"),
        "STOP",
        "anything after the stop line is never parsed",
    ]
    .join("\n");

    let mut cat = MemoryCatalogue::new();
    let summary = import(&bulletin, &mut cat).unwrap();
    assert!(!summary.has_errors());
    assert_eq!(summary.total_created(), 5);
}

/// Delegating catalogue that injects an integrity conflict on the n-th
/// measure write
struct ConflictingCatalogue {
    inner: MemoryCatalogue,
    fail_at_measure: usize,
    measure_calls: usize,
}

impl ConflictingCatalogue {
    fn new(fail_at_measure: usize) -> Self {
        Self {
            inner: MemoryCatalogue::new(),
            fail_at_measure,
            measure_calls: 0,
        }
    }
}

impl Catalogue for ConflictingCatalogue {
    fn begin(&mut self) -> CatalogueResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> CatalogueResult<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> CatalogueResult<()> {
        self.inner.rollback()
    }

    fn find_or_create_event_source(
        &mut self,
        name: &str,
    ) -> CatalogueResult<(EventSourceId, bool)> {
        self.inner.find_or_create_event_source(name)
    }

    fn find_or_create_agency(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(AgencyId, bool)> {
        self.inner.find_or_create_agency(source_key, event_source)
    }

    fn find_or_create_event(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
    ) -> CatalogueResult<(EventId, bool)> {
        self.inner.find_or_create_event(source_key, event_source)
    }

    fn rename_event(&mut self, event: EventId, name: &str) -> CatalogueResult<()> {
        self.inner.rename_event(event, name)
    }

    fn find_or_create_origin(
        &mut self,
        source_key: &str,
        event_source: EventSourceId,
        data: &OriginData,
    ) -> CatalogueResult<(OriginId, bool)> {
        self.inner.find_or_create_origin(source_key, event_source, data)
    }

    fn find_or_create_measure(
        &mut self,
        event: EventId,
        origin: OriginId,
        agency: AgencyId,
        scale: &str,
        data: &MeasureData,
    ) -> CatalogueResult<(MeasureId, bool)> {
        self.measure_calls += 1;
        if self.measure_calls == self.fail_at_measure {
            return Err(CatalogueError::conflict(
                "measure already recorded with different data",
            ));
        }
        self.inner
            .find_or_create_measure(event, origin, agency, scale, data)
    }
}

#[test]
fn persistence_conflict_aborts_and_rolls_back() {
    let bulletin = [
        "ISC Bulletin",
        "Event 00162786 Alabama",
        ORIGIN_HEADER_LINE,
        &origin_line("00162786", "ISC"),
        MEASURE_HEADER_LINE,
        &measure_line("mb", "ISC", "00162786"),
        &measure_line("MS", "ISC", "00162786"),
        "STOP",
    ]
    .join("\n");

    let mut cat = ConflictingCatalogue::new(2);
    let err = import_bulletin(bulletin.as_bytes(), &mut cat, &ImportOptions::default())
        .unwrap_err();

    match err {
        Error::ParsingFailure { line } => assert_eq!(line, 7),
        other => panic!("expected a parsing failure, got {other}"),
    }

    // the transaction was rolled back: nothing survives, not even the
    // records decoded before the conflict
    assert!(cat.inner.event_sources().is_empty());
    assert!(cat.inner.origins().is_empty());
    assert!(cat.inner.measures().is_empty());
}

#[test]
fn io_failure_aborts_and_rolls_back() {
    struct FailingReader;
    impl std::io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("stream went away"))
        }
    }

    let mut cat = MemoryCatalogue::new();
    let reader = std::io::BufReader::new(FailingReader);
    let err = import_bulletin(reader, &mut cat, &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    // a fresh transaction can be opened afterwards
    assert!(cat.begin().is_ok());
}
