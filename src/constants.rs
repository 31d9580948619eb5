//! Application constants for the ISF catalogue importer
//!
//! This module contains the literal strings of the ISF bulletin grammar and
//! the fixed code tables used when decoding origin blocks.

// =============================================================================
// Bulletin literals
// =============================================================================

/// Where ISF bulletins of this shape are generated
pub const CATALOGUE_URL: &str = "http://www.isc.ac.uk/cgi-bin/web-db-v4";

/// Reference documentation for the ISF format, quoted in parse errors
pub const ISF_FORMAT_URL: &str = "http://www.isc.ac.uk/standards/isf/";

/// Exact content of the catalogue header line
pub const CATALOGUE_HEADER: &str = "ISC Bulletin";

/// Exact content of the terminator line
pub const STOP_LINE: &str = "STOP";

/// Length of a fixed-width origin block line
pub const ORIGIN_BLOCK_LEN: usize = 136;

/// Length of a fixed-width magnitude measure block line
pub const MEASURE_BLOCK_LEN: usize = 38;

/// Sentinel scale code for measures whose scale the bulletin does not name
/// (the JMA "unknown magnitude" marker)
pub const UNKNOWN_SCALE: &str = "Muk";

/// Description recorded for event-type codes not in [`event_type_description`]
pub const UNKNOWN_EVENT_TYPE_DESCRIPTION: &str = "unknown event type";

// =============================================================================
// Code tables
// =============================================================================

/// Map an ISF event-type code to its description.
///
/// Codes outside the fixed table fall back to
/// [`UNKNOWN_EVENT_TYPE_DESCRIPTION`] rather than failing: agencies do emit
/// codes the standard never defined.
pub fn event_type_description(code: &str) -> &'static str {
    match code {
        "uk" => "unknown",
        "de" => "damaging earthquake ( Not standard IMS )",
        "fe" => "felt earthquake ( Not standard IMS )",
        "ke" => "known earthquake",
        "se" => "suspected earthquake",
        "kr" => "known rockburst",
        "sr" => "suspected rockburst",
        "ki" => "known induced event",
        "si" => "suspected induced event",
        "km" => "known mine expl.",
        "sm" => "suspected mine expl.",
        "kh" => "known chemical expl. ( Not standard IMS )",
        "sh" => "suspected chemical expl. ( Not standard IMS )",
        "kx" => "known experimental expl.",
        "sx" => "suspected experimental expl.",
        "kn" => "known nuclear expl.",
        "sn" => "suspected nuclear explosion",
        "ls" => "landslide",
        _ => UNKNOWN_EVENT_TYPE_DESCRIPTION,
    }
}
