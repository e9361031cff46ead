pub mod formatting;

pub use formatting::{format_hu, format_spacing, series_label, truncate_label};
