//! Statistics over population fitness values.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics and the median used for selection
//!
//! # Examples
//!
//! ```
//! use hanabi_stats::descriptive::{DescriptiveStats, median};
//!
//! let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(stats.mean, 2.5);
//! assert_eq!(stats.median, 2.5);
//!
//! assert_eq!(median(&[7.0, 1.0, 5.0]), Some(5.0));
//! assert_eq!(median(&[]), None);
//! ```

pub mod descriptive;
