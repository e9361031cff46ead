use crate::components::segmented_toggle;
use crate::config::Config;
use crate::image_pipeline::{RenderedSlice, SliceRenderer};
use crate::message::Message;
use crate::model::loader::load_slice;
use crate::model::{build_index, FolderRegistry, SidebarMode, StudyIndex, TreeNodeKey};
use crate::viewer::SeriesViewer;
use crate::views::{
    folder_panel, image_panel, slice_controls, slice_info_panel, tree_panel, window_controls,
};
use crate::windowing::{WindowControl, WindowLimits};
use iced::mouse::ScrollDelta;
use iced::widget::image::Handle;
use iced::widget::text::Wrapping;
use iced::widget::{column, container, row, scrollable, text};
use iced::{application, Alignment, Color, Element, Length, Point, Size, Task, Theme};
use rfd::AsyncFileDialog;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

const APP_TITLE: &str = "DCMViewer";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> iced::Result {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let config = Config::from_env();

    application(APP_TITLE, App::update, App::view)
        .theme(App::theme)
        .window_size(Size::new(1400.0, 860.0))
        .run_with(move || App::new(config))
}

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
struct DragState {
    active: bool,
    last: Option<Point>,
}

pub struct App {
    registry: FolderRegistry,
    index: Arc<StudyIndex>,
    scan_generation: u64,
    scanning: bool,
    sidebar_mode: SidebarMode,
    collapsed_nodes: BTreeSet<TreeNodeKey>,
    viewer: Option<SeriesViewer>,
    window: WindowControl,
    rendered: Option<Arc<RenderedSlice>>,
    handle: Option<Handle>,
    drag: DragState,
    notice: Option<Notice>,
}

impl App {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let mut notice = None;
        let registry = match FolderRegistry::load(&config.folders_file) {
            Ok(registry) => registry,
            Err(err) => {
                log::warn!(
                    "Unable to read folder registry {}: {err}",
                    config.folders_file.display()
                );
                notice = Some(Notice::Error(format!("Folder list unreadable: {err}")));
                FolderRegistry::empty(&config.folders_file)
            }
        };

        let mut app = Self {
            registry,
            index: Arc::new(StudyIndex::default()),
            scan_generation: 0,
            scanning: false,
            sidebar_mode: SidebarMode::default(),
            collapsed_nodes: BTreeSet::new(),
            viewer: None,
            window: WindowControl::new(config.default_window, config.drag_sensitivity),
            rendered: None,
            handle: None,
            drag: DragState::default(),
            notice,
        };
        let task = app.start_scan();
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SetSidebarMode(mode) => {
                self.sidebar_mode = mode;
                Task::none()
            }
            Message::PickFolder => Task::perform(
                async {
                    AsyncFileDialog::new()
                        .set_title("Add DICOM folder")
                        .pick_folder()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::FolderPicked,
            ),
            Message::FolderPicked(None) => Task::none(),
            Message::FolderPicked(Some(folder)) => match self.registry.add(folder.clone()) {
                Ok(true) => {
                    self.notice = Some(Notice::Info(format!("Added {}", folder.display())));
                    self.start_scan()
                }
                Ok(false) => {
                    self.notice = Some(Notice::Info(format!(
                        "{} is already registered",
                        folder.display()
                    )));
                    Task::none()
                }
                Err(err) => {
                    log::warn!("Unable to add folder {}: {err}", folder.display());
                    self.notice = Some(Notice::Error(format!("Unable to add folder: {err}")));
                    Task::none()
                }
            },
            Message::RemoveFolder(folder) => match self.registry.remove(&folder) {
                Ok(true) => {
                    self.notice = Some(Notice::Info(format!("Removed {}", folder.display())));
                    self.start_scan()
                }
                Ok(false) => Task::none(),
                Err(err) => {
                    log::warn!("Unable to remove folder {}: {err}", folder.display());
                    self.notice = Some(Notice::Error(format!("Unable to remove folder: {err}")));
                    Task::none()
                }
            },
            Message::Rescan => self.start_scan(),
            Message::ScanFinished { generation, index } => {
                if generation != self.scan_generation {
                    log::debug!(
                        "Dropping result of scan {generation}, scan {} is current",
                        self.scan_generation
                    );
                    return Task::none();
                }
                self.scanning = false;
                self.index = index;
                self.refresh_viewer()
            }
            Message::ToggleNode(key) => {
                if !self.collapsed_nodes.remove(&key) {
                    self.collapsed_nodes.insert(key);
                }
                Task::none()
            }
            Message::SelectSeries(key) => {
                if self.viewer.as_ref().is_some_and(|viewer| *viewer.key() == key) {
                    return Task::none();
                }
                let Some(series) = self.index.series(&key) else {
                    log::warn!("Series {key} is no longer indexed");
                    return Task::none();
                };
                log::info!("Opening series {key} ({} slices)", series.slices.len());
                self.viewer = Some(SeriesViewer::open(series));
                self.show_current()
            }
            Message::SliceLoaded {
                series,
                position,
                result,
            } => {
                let Some(viewer) = self
                    .viewer
                    .as_mut()
                    .filter(|viewer| *viewer.key() == series)
                else {
                    log::debug!("Dropping slice {position} of closed series {series}");
                    return Task::none();
                };

                match result {
                    Ok(slice) => {
                        let expected = viewer
                            .series()
                            .slices
                            .get(position)
                            .is_some_and(|slice_ref| slice_ref.path == slice.path);
                        if !expected {
                            log::debug!("Dropping stale slice {}", slice.path.display());
                            return Task::none();
                        }
                        let on_screen = position == viewer.position();
                        if let Some(initial) = viewer.store(position, slice) {
                            self.window.reset_to(initial);
                        }
                        if on_screen {
                            self.render_current();
                        }
                    }
                    Err(err) => {
                        viewer.load_failed(position);
                        self.notice = Some(Notice::Error(err));
                    }
                }
                Task::none()
            }
            Message::SetSlice(value) => {
                let target = value.max(0.0).round() as usize;
                self.navigate(|viewer| viewer.set_position(target))
            }
            Message::StepSlice(delta) => self.navigate(|viewer| viewer.step(delta)),
            Message::ViewerScrolled(delta) => match slice_step_from_scroll(delta) {
                0 => Task::none(),
                step => self.navigate(|viewer| viewer.step(step)),
            },
            Message::DragStarted => {
                self.drag = DragState {
                    active: true,
                    last: None,
                };
                Task::none()
            }
            Message::DragEnded => {
                self.drag = DragState::default();
                Task::none()
            }
            Message::PointerMoved(point) => {
                if !self.drag.active {
                    return Task::none();
                }
                let changed = self.drag.last.is_some_and(|last| {
                    self.window
                        .drag(f64::from(point.x - last.x), f64::from(point.y - last.y))
                });
                self.drag.last = Some(point);
                if changed {
                    self.render_current();
                }
                Task::none()
            }
            Message::SetWindowMode(mode) => {
                self.window.set_mode(mode);
                Task::none()
            }
            Message::SetWindow(param, value) => {
                if self.window.set(param, value) {
                    self.render_current();
                }
                Task::none()
            }
            Message::NudgeWindow(param, delta) => {
                if self.window.nudge(param, delta) {
                    self.render_current();
                }
                Task::none()
            }
            Message::ResetWindow => {
                if self.window.reset() {
                    self.render_current();
                }
                Task::none()
            }
            Message::ExportPng => {
                let Some(rendered) = self.rendered.clone() else {
                    return Task::none();
                };
                let file_name = self.export_file_name();
                Task::perform(
                    async move {
                        let Some(handle) = AsyncFileDialog::new()
                            .set_title("Export slice as PNG")
                            .add_filter("PNG image", &["png"])
                            .set_file_name(file_name)
                            .save_file()
                            .await
                        else {
                            return Ok(None);
                        };
                        let path = with_png_extension(handle.path().to_path_buf());
                        rendered
                            .save_png(&path)
                            .map(|()| Some(path))
                            .map_err(|err| err.to_string())
                    },
                    Message::ExportFinished,
                )
            }
            Message::ExportFinished(result) => {
                match result {
                    Ok(Some(path)) => {
                        self.notice = Some(Notice::Info(format!("Exported {}", path.display())));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        log::error!("PNG export failed: {err}");
                        self.notice = Some(Notice::Error(format!("Export failed: {err}")));
                    }
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let sidebar_toggle = segmented_toggle(
            ("Studies", SidebarMode::Studies),
            ("Folders", SidebarMode::Folders),
            self.sidebar_mode,
            Message::SetSidebarMode,
        );
        let sidebar_content = match self.sidebar_mode {
            SidebarMode::Studies => tree_panel(
                &self.index,
                &self.collapsed_nodes,
                self.viewer.as_ref().map(SeriesViewer::key),
                self.scanning,
            ),
            SidebarMode::Folders => folder_panel(&self.registry, self.scanning),
        };
        let sidebar = container(
            column![
                text(APP_TITLE).size(20),
                sidebar_toggle,
                scrollable(sidebar_content).height(Length::Fill),
            ]
            .spacing(12),
        )
        .padding(16)
        .width(Length::FillPortion(2))
        .height(Length::Fill);

        let image = container(image_panel(self.handle.as_ref(), self.viewer.as_ref()))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center);

        let mut controls = column![].spacing(10);
        if let Some(viewer) = &self.viewer {
            controls = controls.push(slice_controls(viewer));
        }
        let limits = WindowLimits::for_data(
            self.viewer.as_ref().and_then(SeriesViewer::data_range),
            self.window.window(),
        );
        controls = controls.push(window_controls(
            &self.window,
            limits,
            self.rendered.is_some(),
        ));

        let center_panel = container(column![image, controls].spacing(12))
            .padding(16)
            .width(Length::FillPortion(5))
            .height(Length::Fill);

        let info_panel = container(scrollable(slice_info_panel(
            self.viewer.as_ref(),
            self.window.window(),
        )))
        .padding(16)
        .width(Length::FillPortion(2));

        column![
            row![sidebar, center_panel, info_panel]
                .spacing(16)
                .width(Length::Fill)
                .height(Length::Fill),
            self.status_bar(),
        ]
        .padding(8)
        .spacing(8)
        .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn status_bar(&self) -> Element<'_, Message> {
        let current_file = self
            .viewer
            .as_ref()
            .and_then(SeriesViewer::current_ref)
            .map(|slice_ref| slice_ref.path.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let scan_state = if self.scanning { " (scanning…)" } else { "" };

        let mut bar = row![
            text(format!(
                "Files: {} ({} skipped){scan_state}",
                self.index.indexed_files(),
                self.index.skipped_files()
            ))
            .size(13),
            text(format!("Current: {current_file}"))
                .size(13)
                .width(Length::Fill)
                .wrapping(Wrapping::None),
        ]
        .spacing(24)
        .align_y(Alignment::Center);

        match &self.notice {
            Some(Notice::Info(message)) => bar = bar.push(text(message.as_str()).size(13)),
            Some(Notice::Error(message)) => {
                bar = bar.push(
                    text(message.as_str())
                        .size(13)
                        .color(Color::from_rgb(0.95, 0.45, 0.45)),
                )
            }
            None => {}
        }

        bar.push(text(format!("v{APP_VERSION}")).size(13))
            .padding([4, 8])
            .into()
    }

    fn start_scan(&mut self) -> Task<Message> {
        self.scan_generation += 1;
        self.scanning = true;
        let generation = self.scan_generation;
        let folders = self.registry.folders().to_vec();
        log::info!("Starting scan {generation} of {} folder(s)", folders.len());

        Task::perform(
            async move { Arc::new(build_index(&folders)) },
            move |index| Message::ScanFinished { generation, index },
        )
    }

    /// Re-resolves the open series against a freshly swapped-in index.
    fn refresh_viewer(&mut self) -> Task<Message> {
        let Some(viewer) = &self.viewer else {
            return Task::none();
        };
        match self.index.series(viewer.key()) {
            None => {
                log::info!("Series {} disappeared after rescan", viewer.key());
                self.viewer = None;
                self.render_current();
                Task::none()
            }
            Some(series) if *series == **viewer.series() => Task::none(),
            Some(series) => {
                log::info!("Series {} changed after rescan, reopening", series.key);
                self.viewer = Some(SeriesViewer::open(series));
                self.show_current()
            }
        }
    }

    fn navigate(&mut self, apply: impl FnOnce(&mut SeriesViewer) -> bool) -> Task<Message> {
        let Some(viewer) = self.viewer.as_mut() else {
            return Task::none();
        };
        if apply(viewer) {
            self.show_current()
        } else {
            Task::none()
        }
    }

    /// Renders the current slice if it is cached and requests it otherwise.
    fn show_current(&mut self) -> Task<Message> {
        self.render_current();

        let Some(viewer) = self.viewer.as_mut() else {
            return Task::none();
        };
        let Some((position, path)) = viewer.begin_load() else {
            return Task::none();
        };
        let series = viewer.key().clone();

        Task::perform(
            async move {
                load_slice(&path).map(Arc::new).map_err(|err| {
                    let message = format!("{}: {err}", path.display());
                    log::warn!("Unable to load slice {message}");
                    message
                })
            },
            move |result| Message::SliceLoaded {
                series: series.clone(),
                position,
                result,
            },
        )
    }

    fn render_current(&mut self) {
        let rendered = self
            .viewer
            .as_ref()
            .and_then(SeriesViewer::current_slice)
            .map(|slice| SliceRenderer::render(slice, self.window.window()));
        self.handle = rendered.as_ref().map(RenderedSlice::to_handle);
        self.rendered = rendered.map(Arc::new);
    }

    fn export_file_name(&self) -> String {
        self.viewer
            .as_ref()
            .and_then(SeriesViewer::current_ref)
            .and_then(|slice_ref| slice_ref.path.file_stem())
            .map(|stem| format!("{}.png", stem.to_string_lossy()))
            .unwrap_or_else(|| "slice.png".to_string())
    }
}

/// One slice per wheel notch; scrolling up moves to the next slice.
fn slice_step_from_scroll(delta: ScrollDelta) -> i32 {
    let y = match delta {
        ScrollDelta::Lines { y, .. } | ScrollDelta::Pixels { y, .. } => y,
    };
    if y > 0.0 {
        1
    } else if y < 0.0 {
        -1
    } else {
        0
    }
}

fn with_png_extension(path: PathBuf) -> PathBuf {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        path
    } else {
        path.with_extension("png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::SliceFixture;
    use crate::model::SeriesKey;
    use crate::windowing::Window;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_app(scratch: &Path) -> App {
        let config = Config {
            folders_file: scratch.join("folders.txt"),
            ..Config::default()
        };
        let (app, _) = App::new(config);
        app
    }

    fn series_key() -> SeriesKey {
        SeriesKey::new("PAT001", "1.2.3", "1.2.3.4")
    }

    fn scanned_index(dir: &Path, slices: i32) -> Arc<StudyIndex> {
        for number in 1..=slices {
            SliceFixture::new("1.2.3.4", &format!("1.2.3.4.{number}"))
                .instance_number(number)
                .pixels(1, 2, vec![-100, 400])
                .write(&dir.join(format!("{number}.dcm")));
        }
        Arc::new(build_index(&[dir.to_path_buf()]))
    }

    #[test]
    fn stale_scan_results_are_dropped() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());
        let index = scanned_index(scratch.path(), 1);

        let stale = app.scan_generation;
        let _ = app.update(Message::Rescan);
        let _ = app.update(Message::ScanFinished {
            generation: stale,
            index: index.clone(),
        });
        assert!(app.index.is_empty());
        assert!(app.scanning);

        let _ = app.update(Message::ScanFinished {
            generation: app.scan_generation,
            index,
        });
        assert_eq!(app.index.series_count(), 1);
        assert!(!app.scanning);
    }

    #[test]
    fn selecting_a_series_loads_and_renders_the_middle_slice() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());
        let index = scanned_index(scratch.path(), 3);
        let _ = app.update(Message::ScanFinished {
            generation: app.scan_generation,
            index,
        });

        let _ = app.update(Message::SelectSeries(series_key()));
        let viewer = app.viewer.as_ref().expect("series opened");
        assert_eq!(viewer.position(), 1);
        assert!(viewer.is_loading());
        assert!(app.rendered.is_none());

        let path = viewer.current_ref().expect("slice").path.clone();
        let slice = load_slice(&path).expect("fixture loads");
        let _ = app.update(Message::SliceLoaded {
            series: series_key(),
            position: 1,
            result: Ok(Arc::new(slice)),
        });

        assert_eq!(app.window.window(), Window::from_bounds(-100.0, 400.0));
        let rendered = app.rendered.as_ref().expect("rendered");
        assert_eq!(rendered.pixels, vec![0, 255]);
        assert!(app.handle.is_some());
    }

    #[test]
    fn slice_results_for_other_series_are_ignored() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());
        let index = scanned_index(scratch.path(), 1);
        let _ = app.update(Message::ScanFinished {
            generation: app.scan_generation,
            index,
        });
        let _ = app.update(Message::SelectSeries(series_key()));

        let path = scratch.path().join("1.dcm");
        let slice = load_slice(&path).expect("fixture loads");
        let _ = app.update(Message::SliceLoaded {
            series: SeriesKey::new("PAT001", "1.2.3", "9.9.9"),
            position: 0,
            result: Ok(Arc::new(slice)),
        });

        assert!(app.rendered.is_none());
        assert!(app.viewer.as_ref().is_some_and(SeriesViewer::is_loading));
    }

    #[test]
    fn failed_loads_surface_a_notice() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());
        let index = scanned_index(scratch.path(), 1);
        let _ = app.update(Message::ScanFinished {
            generation: app.scan_generation,
            index,
        });
        let _ = app.update(Message::SelectSeries(series_key()));
        let _ = app.update(Message::SliceLoaded {
            series: series_key(),
            position: 0,
            result: Err("broken pixel data".to_string()),
        });

        assert_eq!(
            app.notice,
            Some(Notice::Error("broken pixel data".to_string()))
        );
        assert!(app.viewer.as_ref().is_some_and(|viewer| !viewer.is_loading()));
    }

    #[test]
    fn failed_export_surfaces_a_notice() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());

        let _ = app.update(Message::ExportFinished(Err("disk full".to_string())));
        assert_eq!(
            app.notice,
            Some(Notice::Error("Export failed: disk full".to_string()))
        );

        let _ = app.update(Message::ExportFinished(Ok(None)));
        assert_eq!(
            app.notice,
            Some(Notice::Error("Export failed: disk full".to_string()))
        );
    }

    #[test]
    fn saved_folders_are_loaded_and_scanned_on_startup() {
        let scratch = TempDir::new().expect("tempdir");
        let folder = scratch.path().join("studies");
        std::fs::write(
            scratch.path().join("folders.txt"),
            format!("{}\n", folder.display()),
        )
        .expect("seed registry");

        let app = test_app(scratch.path());
        assert_eq!(app.registry.folders(), &[folder]);
        assert!(app.scanning);
        assert_eq!(app.scan_generation, 1);
        assert!(app.notice.is_none());
    }

    #[test]
    fn right_drag_adjusts_the_window() {
        let scratch = TempDir::new().expect("tempdir");
        let mut app = test_app(scratch.path());
        let before = app.window.window();

        let _ = app.update(Message::PointerMoved(Point::new(0.0, 0.0)));
        assert_eq!(app.window.window(), before);

        let _ = app.update(Message::DragStarted);
        let _ = app.update(Message::PointerMoved(Point::new(10.0, 10.0)));
        let _ = app.update(Message::PointerMoved(Point::new(15.0, 30.0)));
        let _ = app.update(Message::DragEnded);
        let _ = app.update(Message::PointerMoved(Point::new(50.0, 50.0)));

        assert_eq!(app.window.window(), Window::new(45.0, 380.0));
    }

    #[test]
    fn scroll_steps_one_slice_per_notch() {
        assert_eq!(slice_step_from_scroll(ScrollDelta::Lines { x: 0.0, y: 1.0 }), 1);
        assert_eq!(slice_step_from_scroll(ScrollDelta::Lines { x: 0.0, y: -3.0 }), -1);
        assert_eq!(slice_step_from_scroll(ScrollDelta::Pixels { x: 4.0, y: 0.0 }), 0);
    }

    #[test]
    fn export_path_gets_png_extension() {
        assert_eq!(
            with_png_extension(PathBuf::from("out/slice")),
            PathBuf::from("out/slice.png")
        );
        assert_eq!(
            with_png_extension(PathBuf::from("out/slice.PNG")),
            PathBuf::from("out/slice.PNG")
        );
    }
}
