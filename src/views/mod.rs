pub mod folder_list;
pub mod image_viewer;
pub mod metadata_panel;
pub mod tree_browser;

pub use folder_list::folder_panel;
pub use image_viewer::{image_panel, slice_controls, window_controls};
pub use metadata_panel::slice_info_panel;
pub use tree_browser::tree_panel;
