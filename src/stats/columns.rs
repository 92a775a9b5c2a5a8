//! Heuristic column inference.
//!
//! Particle files carry no fixed schema, so the semantically interesting
//! columns are found by name: an ordered list of exact candidates is tried
//! first, then a lower-cased substring scan over the available field names.
//! Both passes are first-hit-wins, and each concern (grouping, x axis,
//! y axis) is evaluated independently — a single field may satisfy more
//! than one of them.

// ---------------------------------------------------------------------------
// Candidate tables
// ---------------------------------------------------------------------------

/// Exact grouping-column candidates, in priority order.
pub const MICROGRAPH_CANDIDATES: &[&str] = &[
    "MicrographName",
    "Micrographs Filename",
    "micrograph",
    "image",
    "ImageName",
    "_rlnMicrographName",
    "rlnMicrographName",
];

/// Substrings accepted by the grouping fallback scan, in priority order.
pub const MICROGRAPH_HINTS: &[&str] = &["micrograph", "image", "filename"];

/// Exact x-axis candidates, in priority order.
pub const X_CANDIDATES: &[&str] = &[
    "CoordinateX",
    "x",
    "X",
    "X-Coordinate",
    "_rlnCoordinateX",
    "rlnCoordinateX",
    "pos_x",
    "posX",
    "x_coord",
];

/// Exact y-axis candidates, in priority order.
pub const Y_CANDIDATES: &[&str] = &[
    "CoordinateY",
    "y",
    "Y",
    "Y-Coordinate",
    "_rlnCoordinateY",
    "rlnCoordinateY",
    "pos_y",
    "posY",
    "y_coord",
];

// ---------------------------------------------------------------------------
// Selection functions
// ---------------------------------------------------------------------------

/// Pick the grouping (micrograph) column from the available field names.
pub fn find_micrograph_column<'a>(columns: &[&'a str]) -> Option<&'a str> {
    for candidate in MICROGRAPH_CANDIDATES {
        if let Some(col) = columns.iter().find(|col| *col == candidate) {
            return Some(col);
        }
    }
    columns.iter().copied().find(|col| {
        let lower = col.to_lowercase();
        MICROGRAPH_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

/// Pick the x-coordinate column.
pub fn find_x_column<'a>(columns: &[&'a str]) -> Option<&'a str> {
    find_axis_column(columns, X_CANDIDATES, 'x')
}

/// Pick the y-coordinate column.
pub fn find_y_column<'a>(columns: &[&'a str]) -> Option<&'a str> {
    find_axis_column(columns, Y_CANDIDATES, 'y')
}

/// Exact candidates first; fallback accepts a field whose lower-cased name
/// contains the axis letter together with "coord" or "pos" (or is the bare
/// axis letter itself).
fn find_axis_column<'a>(columns: &[&'a str], candidates: &[&str], axis: char) -> Option<&'a str> {
    for candidate in candidates {
        if let Some(col) = columns.iter().find(|col| *col == candidate) {
            return Some(col);
        }
    }
    columns.iter().copied().find(|col| {
        let lower = col.to_lowercase();
        lower.contains(axis)
            && (lower.contains("coord") || lower.contains("pos") || lower == axis.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_candidates_win_in_priority_order() {
        // Both candidates present: the earlier list entry wins regardless of
        // field order.
        let columns = ["image", "MicrographName"];
        assert_eq!(find_micrograph_column(&columns), Some("MicrographName"));

        let columns = ["x_coord", "CoordinateX"];
        assert_eq!(find_x_column(&columns), Some("CoordinateX"));
    }

    #[test]
    fn every_exact_candidate_is_found() {
        for candidate in MICROGRAPH_CANDIDATES {
            assert_eq!(find_micrograph_column(&[candidate]), Some(*candidate));
        }
        for candidate in X_CANDIDATES {
            assert_eq!(find_x_column(&[candidate]), Some(*candidate));
        }
        for candidate in Y_CANDIDATES {
            assert_eq!(find_y_column(&[candidate]), Some(*candidate));
        }
    }

    #[test]
    fn micrograph_fallback_scans_in_field_order() {
        let columns = ["CoordinateZ", "SourceImagePath", "OriginalFilename"];
        // "image" hit in the second field wins over the "filename" hit later.
        assert_eq!(find_micrograph_column(&columns), Some("SourceImagePath"));
    }

    #[test]
    fn micrograph_matching_is_case_sensitive_for_exact_candidates() {
        // "Image" is not an exact candidate, but the fallback catches it.
        let columns = ["Image"];
        assert_eq!(find_micrograph_column(&columns), Some("Image"));
    }

    #[test]
    fn axis_fallback_needs_coord_or_pos() {
        assert_eq!(find_x_column(&["helix", "pixel_x_pos"]), Some("pixel_x_pos"));
        assert_eq!(find_y_column(&["my_coord_y"]), Some("my_coord_y"));
        // Contains the letter but neither "coord" nor "pos".
        assert_eq!(find_x_column(&["pixel"]), None);
    }

    #[test]
    fn no_match_yields_none() {
        let columns = ["DefocusU", "DefocusV", "Voltage"];
        assert_eq!(find_micrograph_column(&columns), None);
        assert_eq!(find_x_column(&columns), None);
        assert_eq!(find_y_column(&columns), None);
        assert_eq!(find_micrograph_column(&[]), None);
    }
}
