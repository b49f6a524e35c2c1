//! Display configuration and graphic-panel rendering.
//!
//! [`render_page`] draws a [`PageView`] onto any monochrome
//! `embedded-graphics` target; [`render_boot`] draws the splash shown
//! before the dispatcher starts.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle, Triangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;
use memorymode::catalog::PatchRecord;
use memorymode::SettingsLevel;

use crate::view::PageView;

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Configuration for the dispatcher loop and the graphic panel layout.
///
/// [`DisplayConfig::default()`] gives a 30 Hz loop, a 2 s boot splash and
/// the 128×64 geometry below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Dispatcher loop rate in Hz. Default: 30.
    pub update_frequency_hz: u32,
    /// How long the boot page stays up before the first page frame, in ms.
    /// Default: 2000.
    pub startup_grace_ms: u64,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Top of each of the three list rows. Default: `[2, 23, 44]`.
    pub row_y: [i32; 3],
    /// Height of the highlight bar behind the selected row. Default: 18.
    pub row_height: u32,
    /// Y of the rule under a page heading. Default: 21.
    pub rule_y: i32,
    /// Right-hand margin reserved for the settings up/down arrows.
    /// Default: 10.
    pub arrow_margin: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            startup_grace_ms: 2000,
            display_width: 128,
            display_height: 64,
            row_y: [2, 23, 44],
            row_height: 18,
            rule_y: 21,
            arrow_margin: 10,
        }
    }
}

impl DisplayConfig {
    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`. A frequency of 0 is treated as 1 Hz.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

fn small(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_6X10, color)
}

fn large() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_10X20, BinaryColor::On)
}

/// Draw `text` with its top edge at `y`, left aligned or centred.
fn text<D>(
    display: &mut D,
    text: &str,
    x: i32,
    y: i32,
    style: MonoTextStyle<'static, BinaryColor>,
    alignment: Alignment,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = TextStyleBuilder::new()
        .baseline(Baseline::Top)
        .alignment(alignment)
        .build();
    Text::with_text_style(text, Point::new(x, y), style, text_style).draw(display)?;
    Ok(())
}

fn rule<D>(display: &mut D, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Line::new(
        Point::new(0, config.rule_y),
        Point::new(config.display_width as i32 - 1, config.rule_y),
    )
    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
    .draw(display)
}

/// Heading in the large font above a rule, then up to two centred lines.
fn message<D>(display: &mut D, heading: &str, lines: &[&str], config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centre = config.display_width as i32 / 2;
    text(display, heading, centre, config.row_y[0], large(), Alignment::Center)?;
    rule(display, config)?;
    for (line, y) in lines.iter().zip(&config.row_y[1..]) {
        text(display, line, centre, *y + 4, small(BinaryColor::On), Alignment::Center)?;
    }
    Ok(())
}

/// One catalog row: `"003 Brass"`, inverted when `selected`.
fn record_row<D>(
    display: &mut D,
    record: Option<&PatchRecord>,
    row: usize,
    selected: bool,
    config: &DisplayConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let Some(record) = record else {
        return Ok(());
    };
    let y = config.row_y[row];
    let color = if selected {
        Rectangle::new(Point::new(0, y - 1), Size::new(config.display_width, config.row_height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
        BinaryColor::Off
    } else {
        BinaryColor::On
    };

    let mut number: String<4> = String::new();
    let _ = write!(number, "{:03}", record.program);
    text(display, &number, 2, y + 4, small(color), Alignment::Left)?;
    text(display, record.name.as_str(), 26, y + 4, small(color), Alignment::Left)?;
    Ok(())
}

/// Up/down arrows at the right edge of a row, marking the line the
/// encoder scrolls.
fn arrows<D>(display: &mut D, y: i32, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let x = config.display_width as i32 - config.arrow_margin as i32 / 2 - 1;
    let style = PrimitiveStyle::with_fill(BinaryColor::On);
    Triangle::new(Point::new(x, y), Point::new(x - 3, y + 4), Point::new(x + 3, y + 4))
        .into_styled(style)
        .draw(display)?;
    Triangle::new(Point::new(x - 3, y + 9), Point::new(x + 3, y + 9), Point::new(x, y + 13))
        .into_styled(style)
        .draw(display)
}

/// Render a [`PageView`] to a display buffer using `embedded-graphics`.
///
/// # Layout
///
/// ```text
/// Parameter / Patch        Recall                  Save / Delete
/// ┌────────────────────┐   ┌────────────────────┐   ┌────────────────────┐
/// │ Cutoff             │   │ 002 Bass           │   │ Save               │
/// ├────────────────────┤   │█003 Brass██████████│   │ 002 Bass           │
/// │       64.00        │   │ 004 Pad            │   │█003 Initial Patch██│
/// └────────────────────┘   └────────────────────┘   └────────────────────┘
/// ```
///
/// The buffer is not cleared; callers clear before drawing.
pub fn render_page<D>(display: &mut D, view: &PageView, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centre = config.display_width as i32 / 2;

    match view {
        PageView::Parameter(p) => {
            text(display, &p.name, 0, config.row_y[0] + 4, small(BinaryColor::On), Alignment::Left)?;
            rule(display, config)?;
            let mut value: String<24> = String::new();
            let _ = write!(value, "{}", p.value);
            text(display, &value, centre, config.row_y[1] + 10, large(), Alignment::Center)?;
        }
        PageView::Patch(p) => {
            let mut number: String<4> = String::new();
            let _ = write!(number, "{:03}", p.program);
            text(display, &number, centre, config.row_y[0], large(), Alignment::Center)?;
            rule(display, config)?;
            text(
                display,
                p.name.as_str(),
                centre,
                config.row_y[1] + 10,
                small(BinaryColor::On),
                Alignment::Center,
            )?;
        }
        PageView::Recall(v) => {
            record_row(display, v.previous.as_ref(), 0, false, config)?;
            record_row(display, Some(&v.selected), 1, true, config)?;
            record_row(display, v.next.as_ref(), 2, false, config)?;
        }
        PageView::Save(v) => {
            text(display, "Save", 2, config.row_y[0] + 4, small(BinaryColor::On), Alignment::Left)?;
            record_row(display, v.previous.as_ref(), 1, false, config)?;
            record_row(display, Some(&v.target), 2, true, config)?;
        }
        PageView::Delete(v) => {
            text(display, "Delete", 2, config.row_y[0] + 4, small(BinaryColor::On), Alignment::Left)?;
            record_row(display, v.previous.as_ref(), 1, false, config)?;
            record_row(display, Some(&v.candidate), 2, true, config)?;
        }
        PageView::DeleteMessage => message(display, "Renumbering", &["SD Card"], config)?,
        PageView::PatchNaming(name) => message(display, "Rename", &["Rename Patch", name.as_str()], config)?,
        PageView::Reinitialise => message(display, "Initialise", &["Initialise to", "panel setting"], config)?,
        PageView::Settings(s) => {
            text(display, &s.option, 2, config.row_y[0] + 4, small(BinaryColor::On), Alignment::Left)?;
            rule(display, config)?;
            text(display, &s.value, centre, config.row_y[1] + 10, large(), Alignment::Center)?;
            match s.level {
                SettingsLevel::Option => arrows(display, config.row_y[0] + 2, config)?,
                SettingsLevel::Value => arrows(display, config.row_y[1] + 13, config)?,
            }
        }
    }

    Ok(())
}

/// Boot splash: product name and firmware `version`.
pub fn render_boot<D>(display: &mut D, version: &str, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centre = config.display_width as i32 / 2;
    text(display, "CHERRY", centre, config.row_y[0], large(), Alignment::Center)?;
    text(display, "EDITOR", centre, config.row_y[1], large(), Alignment::Center)?;
    let mut footer: String<24> = String::new();
    let _ = write!(footer, "MEMORYMODE {}", version);
    text(display, &footer, centre, config.row_y[2] + 6, small(BinaryColor::On), Alignment::Center)
}

// ── Tests ────────────────────────────────────────────────────────────────
