//! Console output for the command line

use crate::cache::CacheMetadata;
use crate::models::NormalizationStats;
use crate::validation::ValidationReport;

/// Print a validation report, one violation per line
pub fn print_report(report: &ValidationReport) {
    println!(
        "Validation {}: {} rows, {} blocking, {} warnings",
        report.status,
        report.row_count,
        report.blocking_count(),
        report.warning_count()
    );
    for violation in &report.violations {
        println!("  {violation}");
    }
    println!(
        "Quality: {} unmatched causes, {} unmatched municipalities, {} invalid dates",
        report.quality.unmatched_causes, report.quality.unmatched_geo, report.quality.invalid_dates
    );
}

/// Print where the cache is, how big it is and when it was written
pub fn print_cache_metadata(metadata: &CacheMetadata) {
    println!("Cache: {}", metadata.path.display());
    println!("  rows: {}", metadata.row_count);
    println!("  generated at: {}", metadata.generated_at.to_rfc3339());
}

/// Print the counters of a normalization run
pub fn print_stats(stats: &NormalizationStats) {
    println!(
        "Normalized {} of {} input rows ({} fetal excluded)",
        stats.output_rows, stats.input_rows, stats.fetal_excluded
    );
    if stats.unrecognized_sex > 0 || stats.unrecognized_age_groups > 0 {
        println!(
            "  {} unrecognized sex values, {} out-of-range age groups",
            stats.unrecognized_sex, stats.unrecognized_age_groups
        );
    }
}
