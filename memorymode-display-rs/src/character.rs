//! HD44780 20×2 character panel behind a PCF8574 I2C backpack.
//!
//! The controller runs in 4-bit mode. Every byte goes out as two nibbles,
//! each latched by pulsing EN, so one byte costs a 4-byte I2C write:
//!
//! ```text
//! PCF8574 bit   7   6   5   4   3    2   1   0
//!               D7  D6  D5  D4  BL   EN  RW  RS
//! ```
//!
//! `render` only fills a shadow buffer; `commit` rewrites the lines whose
//! text differs from what the panel already shows.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::error::DisplayError;
use crate::layout::DisplayConfig;
use crate::renderer::PanelRenderer;
use crate::view::{line, PageView, TextLine, CHAR_COLS, CHAR_ROWS};

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // cursor and blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 lines, 5×8
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; CHAR_ROWS] = [0x00, 0x40];

type Row = [u8; CHAR_COLS];

const BLANK: Row = [b' '; CHAR_COLS];

/// Async HD44780 driver with a shadow text buffer.
pub struct CharacterPanel<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    frame: [Row; CHAR_ROWS],
    shown: [Row; CHAR_ROWS],
    initialized: bool,
}

impl<I2C, D> CharacterPanel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Construct an uninitialised panel at 7-bit `address` (PCF8574
    /// backpacks default to `0x27`). No I2C traffic.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            frame: [BLANK; CHAR_ROWS],
            shown: [BLANK; CHAR_ROWS],
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Text waiting in the shadow buffer for `row`.
    pub fn pending_row(&self, row: usize) -> Option<&str> {
        self.frame.get(row).and_then(|r| core::str::from_utf8(r).ok())
    }

    fn set_lines(&mut self, lines: &[TextLine; CHAR_ROWS]) {
        for (row, text) in self.frame.iter_mut().zip(lines) {
            *row = BLANK;
            // The HD44780 ROM is ASCII in the printable range.
            for (cell, c) in row.iter_mut().zip(text.chars()) {
                *cell = if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' };
            }
        }
    }

    async fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let bits = (nibble & 0xF0) | mode | BACKLIGHT;
        self.i2c
            .write(self.address, &[bits | EN, bits])
            .await
            .map_err(|_| DisplayError::Bus)
    }

    async fn write_byte(&mut self, byte: u8, mode: u8) -> Result<(), DisplayError> {
        let high = (byte & 0xF0) | mode | BACKLIGHT;
        let low = (byte << 4) | mode | BACKLIGHT;
        self.i2c
            .write(self.address, &[high | EN, high, low | EN, low])
            .await
            .map_err(|_| DisplayError::Bus)
    }

    async fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.write_byte(cmd, 0).await?;
        // Clear and home need 1.52 ms; everything else under 40 µs.
        let wait_us = if cmd <= 0x03 { 2000 } else { 50 };
        self.delay.delay_us(wait_us).await;
        Ok(())
    }
}

impl<I2C, D> PanelRenderer for CharacterPanel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = DisplayError;

    /// Power-on reset sequence into 4-bit mode (HD44780 datasheet,
    /// figure 24).
    async fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50).await;
        for wait_us in [4500, 150, 150] {
            self.write_nibble(0x30, 0)
                .await
                .map_err(|_| DisplayError::InitializationFailed)?;
            self.delay.delay_us(wait_us).await;
        }
        self.write_nibble(0x20, 0).await?;
        self.delay.delay_us(150).await;

        for cmd in [CMD_FUNCTION_SET, CMD_DISPLAY_ON, CMD_CLEAR, CMD_ENTRY_MODE] {
            self.command(cmd).await?;
        }
        self.shown = [BLANK; CHAR_ROWS];
        self.initialized = true;
        Ok(())
    }

    fn render_boot(&mut self, version: &str, _config: &DisplayConfig) -> Result<(), DisplayError> {
        self.set_lines(&[
            line(format_args!("Cherry Editor {}", version)),
            line(format_args!("MemoryMode")),
        ]);
        Ok(())
    }

    fn render(&mut self, view: &PageView, _config: &DisplayConfig) -> Result<(), DisplayError> {
        self.set_lines(&view.text_lines());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        for row in 0..CHAR_ROWS {
            if self.frame[row] == self.shown[row] {
                continue;
            }
            self.command(CMD_SET_DDRAM | ROW_OFFSETS[row]).await?;
            let text = self.frame[row];
            for byte in text {
                self.write_byte(byte, RS).await?;
            }
            self.shown[row] = text;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
