//! Terminal render driver
//!
//! Keeps one panel per displayed event and redraws the whole frame after each
//! tick. Refresh and arrival updates touch only their own panel; the panel
//! list itself is only replaced on a rebuild.

use chrono::{DateTime, Local};
use countdown_api::{
    Celebration, CounterStyle, DisplayUpdate, EventView, FaceEncoding, HexColor, SandLevels,
    TimeRemaining, TimeUnit, UnitFace, changed_flip_positions, flip_digits, flip_width,
    hourglass_needs_flip,
};
use countdown_host_api::{RenderDriver, RenderError, RenderResult};
use countdown_util::{EventKey, format_datetime_full};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{QueueableCommand, cursor, terminal};
use std::io::Write;

/// Width of ring and hourglass bars, in cells
const BAR_WIDTH: usize = 10;
/// Upper bound on celebration particles drawn on one line
const MAX_PARTICLES_PER_LINE: usize = 24;

#[derive(Debug, Clone, Default)]
struct UnitState {
    last: Option<u64>,
    /// Flip digit positions that changed on the last refresh
    changed_digits: Vec<usize>,
    /// Hourglass wrapped on the last refresh
    flipping: bool,
}

#[derive(Debug, Clone)]
struct Panel {
    view: EventView,
    units: [UnitState; 4],
}

impl Panel {
    fn new(view: EventView) -> Self {
        let units = TimeUnit::ALL.map(|unit| UnitState {
            last: Some(view.remaining.value(unit)),
            ..Default::default()
        });
        Self { view, units }
    }

    fn refresh(&mut self, remaining: TimeRemaining) {
        let style = self.view.style;
        for (unit, state) in TimeUnit::ALL.into_iter().zip(self.units.iter_mut()) {
            let value = remaining.value(unit);
            state.changed_digits.clear();
            state.flipping = false;

            if let Some(last) = state.last {
                match style {
                    CounterStyle::Flip => {
                        let width = flip_width(unit);
                        state.changed_digits = changed_flip_positions(
                            &flip_digits(last, width),
                            &flip_digits(value, width),
                        );
                    }
                    CounterStyle::Hourglass => {
                        state.flipping = hourglass_needs_flip(last, value, unit.range());
                    }
                    CounterStyle::Digital | CounterStyle::Rings => {}
                }
            }
            state.last = Some(value);
        }
        self.view.remaining = remaining;
    }

    fn arrive(&mut self, celebration: Option<Celebration>) {
        self.view.remaining = TimeRemaining::ARRIVED;
        self.view.arrived = true;
        self.view.celebration = celebration;
        for state in &mut self.units {
            *state = UnitState {
                last: Some(0),
                ..Default::default()
            };
        }
    }
}

/// A run of text drawn in one style
#[derive(Debug, Clone, PartialEq)]
struct Span {
    text: String,
    color: Option<HexColor>,
    bold: bool,
}

/// Styled text for one redraw
#[derive(Debug, Default)]
struct Frame {
    spans: Vec<Span>,
}

impl Frame {
    fn push(&mut self, text: impl Into<String>, color: Option<HexColor>, bold: bool) {
        self.spans.push(Span {
            text: text.into(),
            color,
            bold,
        });
    }

    fn plain(&mut self, text: impl Into<String>) {
        self.push(text, None, false);
    }

    fn colored(&mut self, color: HexColor, text: impl Into<String>) {
        self.push(text, Some(color), false);
    }

    fn newline(&mut self) {
        self.plain("\n");
    }
}

/// Render driver drawing countdown panels with crossterm
pub struct TerminalRenderer<W: Write> {
    out: W,
    color_mode: bool,
    clear_screen: bool,
    panels: Vec<Panel>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, color_mode: bool) -> Self {
        Self {
            out,
            color_mode,
            clear_screen: true,
            panels: Vec::new(),
        }
    }

    /// Append frames instead of redrawing the screen in place
    pub fn without_clearing(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    fn panel_mut(&mut self, key: EventKey) -> RenderResult<&mut Panel> {
        self.panels
            .iter_mut()
            .find(|p| p.view.key == key)
            .ok_or_else(|| RenderError::missing(key, "panel"))
    }

    /// Terminal colour for `color`, reduced to its luma in grayscale mode
    fn color(&self, color: HexColor) -> Color {
        if self.color_mode {
            Color::Rgb {
                r: color.r,
                g: color.g,
                b: color.b,
            }
        } else {
            let y = color.luma();
            Color::Rgb { r: y, g: y, b: y }
        }
    }

    fn frame(&self) -> Frame {
        let mut frame = Frame::default();
        if self.panels.is_empty() {
            frame.plain("No upcoming events\n");
            return frame;
        }

        for panel in &self.panels {
            draw_panel(&mut frame, panel);
            frame.newline();
        }
        frame
    }

    fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        if self.clear_screen {
            self.out.queue(cursor::MoveTo(0, 0))?;
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        for span in &frame.spans {
            let Some(color) = span.color else {
                self.out.queue(Print(&span.text))?;
                continue;
            };
            let color = self.color(color);
            if span.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            self.out.queue(SetForegroundColor(color))?;
            self.out.queue(Print(&span.text))?;
            self.out.queue(ResetColor)?;
            if span.bold {
                self.out.queue(SetAttribute(Attribute::Reset))?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> RenderDriver for TerminalRenderer<W> {
    fn apply(&mut self, update: &DisplayUpdate) -> RenderResult<()> {
        match update {
            DisplayUpdate::Rebuild { events } => {
                self.panels = events.iter().cloned().map(Panel::new).collect();
            }
            DisplayUpdate::NothingScheduled => {
                self.panels.clear();
            }
            DisplayUpdate::Refresh { key, remaining } => {
                self.panel_mut(*key)?.refresh(*remaining);
            }
            DisplayUpdate::Arrived { key, celebration } => {
                self.panel_mut(*key)?.arrive(celebration.clone());
            }
        }
        Ok(())
    }

    fn end_tick(&mut self, _now: DateTime<Local>) -> RenderResult<()> {
        let frame = self.frame();
        self.write_frame(&frame)?;
        Ok(())
    }
}

fn draw_panel(frame: &mut Frame, panel: &Panel) {
    let view = &panel.view;
    let title = match &view.icon {
        Some(icon) => format!("{icon} {}", view.name),
        None => view.name.clone(),
    };
    frame.push(title, Some(view.colors.text), true);
    frame.newline();
    frame.plain(format!("  {}", format_datetime_full(&view.target)));
    frame.newline();

    frame.plain("  ");
    let faces = view.style.faces(&view.remaining);
    for (i, (face, state)) in faces.iter().zip(panel.units.iter()).enumerate() {
        if i > 0 {
            frame.plain("  ");
        }
        draw_face(frame, view, face, state);
    }
    frame.newline();

    if view.arrived
        && let Some(celebration) = &view.celebration
    {
        frame.plain("  ");
        frame.colored(view.colors.accent, celebration_line(celebration));
        frame.newline();
    }
}

fn draw_face(frame: &mut Frame, view: &EventView, face: &UnitFace, state: &UnitState) {
    let numbers = view.colors.counter_text;
    let accent = view.colors.accent;

    match &face.encoding {
        FaceEncoding::Digital => {
            frame.colored(numbers, face.value.to_string());
        }
        FaceEncoding::Flip { digits } => {
            for (i, digit) in digits.chars().enumerate() {
                let color = if state.changed_digits.contains(&i) {
                    accent
                } else {
                    numbers
                };
                frame.colored(color, format!("[{digit}]"));
            }
        }
        FaceEncoding::Ring(fill) => {
            frame.colored(accent, bar(fill.percent, '█', '░'));
            frame.plain(" ");
            frame.colored(numbers, face.value.to_string());
        }
        FaceEncoding::Hourglass(levels) => {
            let levels = if state.flipping {
                SandLevels::refilled()
            } else {
                *levels
            };
            frame.plain(if state.flipping { "⟳" } else { "⏳" });
            frame.colored(accent, bar(levels.top_fill, '▓', '·'));
            frame.plain(" ");
            frame.colored(numbers, face.value.to_string());
        }
    }
    frame.plain(format!(" {}", face.label));
}

/// Horizontal bar with `percent` of its cells filled
fn bar(percent: f64, filled: char, empty: char) -> String {
    let cells = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(std::iter::repeat_n(filled, cells));
    bar.extend(std::iter::repeat_n(empty, BAR_WIDTH - cells));
    bar
}

/// A line of celebration particles cycling through the emoji set
fn celebration_line(celebration: &Celebration) -> String {
    let count = (celebration.particle_count as usize).min(MAX_PARTICLES_PER_LINE);
    celebration
        .emojis
        .iter()
        .cycle()
        .take(count)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
