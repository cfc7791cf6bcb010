use crate::board::Color;
use crate::error::{GeometryError, ScreenError};
use crate::geometry::{BoardRegion, Point, SquareGrid};
use crate::moves::UciMove;
use anyhow::Result;
use log::debug;
use rdev::{Button, EventType};
use std::path::Path;
use std::thread;
use std::time::Duration;
use xcap::Monitor;

/// Display side effects: grabbing pixels and clicking.
pub trait Screen {
    /// Saves exactly the pixels inside `region` to `destination`, replacing any existing file.
    fn capture(&mut self, region: &BoardRegion, destination: &Path) -> Result<(), ScreenError>;

    /// Left-clicks at the nearest whole pixel to `point`.
    fn click(&mut self, point: Point) -> Result<(), ScreenError>;
}

/// Finds the board on screen and which side we play.
pub trait CornerLocator {
    fn locate(&mut self) -> Result<BoardRegion>;
}

/// Board corners known ahead of time rather than detected.
pub struct FixedCorners {
    region: BoardRegion,
}

impl FixedCorners {
    pub fn new(region: BoardRegion) -> Self {
        Self { region }
    }
}

impl Default for FixedCorners {
    fn default() -> Self {
        Self::new(BoardRegion {
            top_left: Point::new(19.0, 182.0),
            bottom_right: Point::new(785.0, 948.0),
            side: Color::Black,
        })
    }
}

impl CornerLocator for FixedCorners {
    fn locate(&mut self) -> Result<BoardRegion> {
        Ok(self.region)
    }
}

/// The real desktop: `xcap` for pixels, `rdev` for synthetic mouse input.
pub struct DesktopScreen {
    settle: Duration,
}

impl DesktopScreen {
    /// `settle` is slept after each synthetic input event; zero sends them back to back.
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    fn send(&self, event: EventType, name: &'static str, x: i32, y: i32) -> Result<(), ScreenError> {
        rdev::simulate(&event).map_err(|_| ScreenError::Input { event: name, x, y })?;
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}

impl Screen for DesktopScreen {
    fn capture(&mut self, region: &BoardRegion, destination: &Path) -> Result<(), ScreenError> {
        let (left, top) = region.top_left.snapped();
        let (right, bottom) = region.bottom_right.snapped();

        let monitor =
            Monitor::from_point(left, top).map_err(|e| ScreenError::Capture(e.to_string()))?;
        let screenshot = monitor
            .capture_image()
            .map_err(|e| ScreenError::Capture(e.to_string()))?;

        // Monitor coordinates are logical; the captured image is in physical pixels.
        let scale = monitor.scale_factor() as f64;
        let to_pixels = |v: i32| (v as f64 * scale).round() as i64;
        let x = to_pixels(left - monitor.x());
        let y = to_pixels(top - monitor.y());
        let width = to_pixels(right - left);
        let height = to_pixels(bottom - top);

        if x < 0
            || y < 0
            || width <= 0
            || height <= 0
            || x + width > screenshot.width() as i64
            || y + height > screenshot.height() as i64
        {
            return Err(ScreenError::OutOfBounds(region.to_string()));
        }

        let cropped = image::imageops::crop_imm(
            &screenshot,
            x as u32,
            y as u32,
            width as u32,
            height as u32,
        )
        .to_image();
        cropped.save(destination).map_err(|source| ScreenError::Save {
            path: destination.to_path_buf(),
            source,
        })?;
        debug!("Saved {}x{} capture to {}", width, height, destination.display());
        Ok(())
    }

    fn click(&mut self, point: Point) -> Result<(), ScreenError> {
        let (x, y) = point.snapped();
        self.send(
            EventType::MouseMove {
                x: x as f64,
                y: y as f64,
            },
            "mouse move",
            x,
            y,
        )?;
        self.send(EventType::ButtonPress(Button::Left), "button press", x, y)?;
        self.send(EventType::ButtonRelease(Button::Left), "button release", x, y)
    }
}

/// Maps logical board squares onto the screen for one board region.
pub struct BoardInterface<S> {
    screen: S,
    region: BoardRegion,
    grid: SquareGrid,
}

impl<S: Screen> BoardInterface<S> {
    pub fn new(screen: S, region: BoardRegion) -> Result<Self, GeometryError> {
        let grid = SquareGrid::for_region(&region)?;
        Ok(Self {
            screen,
            region,
            grid,
        })
    }

    pub fn region(&self) -> &BoardRegion {
        &self.region
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn capture(&mut self, destination: &Path) -> Result<(), ScreenError> {
        self.screen.capture(&self.region, destination)
    }

    /// Clicks the origin square and then the destination square. The click
    /// is not verified, and nothing waits between the two clicks.
    pub fn execute_move(&mut self, mv: &UciMove) -> Result<(Point, Point), ScreenError> {
        let origin = self.grid.center(mv.from);
        let destination = self.grid.center(mv.to);
        debug!("Clicking {} at {} then {} at {}", mv.from, origin, mv.to, destination);
        self.screen.click(origin)?;
        self.screen.click(destination)?;
        Ok((origin, destination))
    }
}
