pub mod index;
pub mod loader;
pub mod registry;
pub mod slice;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use index::{build_index, SeriesNode, StudyIndex};
pub use registry::FolderRegistry;
pub use slice::{Rescale, Slice, SliceHeader, SliceRef};
pub use tree::{SeriesKey, SidebarMode, TreeNodeKey};
