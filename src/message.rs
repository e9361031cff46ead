use std::path::PathBuf;
use std::sync::Arc;

use iced::mouse::ScrollDelta;
use iced::Point;

use crate::model::{SeriesKey, SidebarMode, Slice, StudyIndex, TreeNodeKey};
use crate::windowing::{WindowMode, WindowParam};

#[derive(Debug, Clone)]
pub enum Message {
    SetSidebarMode(SidebarMode),
    PickFolder,
    FolderPicked(Option<PathBuf>),
    RemoveFolder(PathBuf),
    Rescan,
    ScanFinished {
        generation: u64,
        index: Arc<StudyIndex>,
    },
    ToggleNode(TreeNodeKey),
    SelectSeries(SeriesKey),
    SliceLoaded {
        series: SeriesKey,
        position: usize,
        result: Result<Arc<Slice>, String>,
    },
    SetSlice(f64),
    StepSlice(i32),
    ViewerScrolled(ScrollDelta),
    DragStarted,
    DragEnded,
    PointerMoved(Point),
    SetWindowMode(WindowMode),
    SetWindow(WindowParam, f64),
    NudgeWindow(WindowParam, f64),
    ResetWindow,
    ExportPng,
    ExportFinished(Result<Option<PathBuf>, String>),
}
