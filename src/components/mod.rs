pub mod segmented_toggle;
pub mod slider_group;

pub use segmented_toggle::segmented_toggle;
pub use slider_group::slider_group;
