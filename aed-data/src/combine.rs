use aed_sources::point::SeriesPoint;

/// All requested series concatenated into one table, with a parallel
/// provenance label per constituent source (a URL, or the sentinel when
/// the synthetic fallback ran). No cross-series alignment is performed;
/// groups with differing sampling frequencies simply coexist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    pub records: Vec<SeriesPoint>,
    pub provenance: Vec<String>,
}

/// Concatenate per-source series, preserving each record's group and
/// threading the provenance labels through for display.
pub fn combine(series: Vec<(Vec<SeriesPoint>, String)>) -> CombinedTable {
    let mut table = CombinedTable::default();
    for (points, provenance) in series {
        table.records.extend(points);
        table.provenance.push(provenance);
    }
    table
}
