mod app;
mod components;
mod config;
mod error;
mod image_pipeline;
mod message;
mod model;
mod utils;
mod viewer;
mod views;
mod windowing;

fn main() -> iced::Result {
    app::run()
}
