//! The transposition side of the attack: column statistics, coordinate
//! grouping, partner matching, and de-fractionation.

pub mod defraction;
pub mod frequency;
pub mod grouping;
pub mod pattern;

pub use self::defraction::de_fraction;
pub use self::frequency::{index_of_coincidence, profile_columns, Histogram, HistogramMetric};
pub use self::grouping::{group_columns, Partition};
pub use self::pattern::{match_pattern, PatternMatch};
