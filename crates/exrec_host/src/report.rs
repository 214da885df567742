//! Console summary of a malignant-count histogram.

use exrec_common::layout::{EcConfig, LogicalError};
use exrec_core::MaligHistogram;
use num_traits::Zero;

/// Prints the non-zero counts of every `(ec, error)` cell by weight.
///
/// The `AB` rows are the counts of the real exRec; the rows with a `-` are
/// the variants with that block's trailing EC removed.
pub fn print_histogram(histogram: &MaligHistogram) {
    println!("\nMalignant Counts (k_max = {})", histogram.k_max());
    if histogram.is_zero() {
        println!("No malignant fault sets.");
        return;
    }
    for ec in EcConfig::ALL.into_iter().rev() {
        for error in LogicalError::ALL {
            let column = histogram.column(ec, error);
            if column.iter().all(|c| c.is_zero()) {
                continue;
            }
            println!("[{} {}]", ec.label(), error.label());
            for (k, count) in column.iter().enumerate() {
                if !count.is_zero() {
                    println!("  k={:2}: {}", k, count);
                }
            }
        }
    }
}
