//! memorymode-hw-interface
//!
//! Front-panel firmware for the Raspberry Pi Pico 2. Wires the panel state
//! and display crates into a live loop:
//!
//! 1. A button, the encoder or a pot moves.
//! 2. Its input task debounces/scales the reading and queues an
//!    [`InputEvent`] on the event channel.
//! 3. The panel task feeds the event to the [`PanelController`], which
//!    updates the shared [`PanelContext`] and reports storage work.
//! 4. The display task wakes on its 30 Hz ticker, snapshots the page and
//!    redraws whichever panel's content changed.
//!
//! Patch values are kept in RAM; no SD card or MIDI I/O in this stage.

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use memorymode::settings::SettingId;
use memorymode::{
    PanelAction, PanelConfig, PanelContext, PanelController, PanelEvent, PatchCatalog,
    SettingsMenu, INIT_PATCH_NAME, MAX_PATCHES,
};
use memorymode_display_rs::{
    display_dispatch_task, CharacterPanel, DisplayConfig, GraphicPanel,
};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Number of front-panel pots.
const N_POTS: usize = 3;

/// Display names of the pots, by pot id.
const POT_NAMES: [&str; N_POTS] = ["Cutoff", "Resonance", "Env Amount"];

/// Pot scan period.
const POT_SCAN_MS: u64 = 10;

/// Button debounce time.
const BUTTON_DEBOUNCE_MS: u64 = 20;

/// SSD1306 I2C address.
const OLED_ADDRESS: u8 = 0x3C;

/// PCF8574 LCD backpack I2C address.
const LCD_ADDRESS: u8 = 0x27;

const EVENT_QUEUE: usize = 16;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Shared I2C0 bus; both panels access it through I2cDevice wrappers that
/// serialise transactions.
static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>> =
    StaticCell::new();

/// Shared page state, written by the panel task and read by the display
/// task.
static PANEL_CONTEXT: StaticCell<Mutex<CriticalSectionRawMutex, PanelContext>> = StaticCell::new();

/// Input events from the button, encoder and pot tasks.
static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, EVENT_QUEUE> = Channel::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Concrete I2C type for either panel, sharing I2C_BUS.
type PanelI2c = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>;

type EventSender = Sender<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE>;
type EventReceiver = Receiver<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE>;

// ---------------------------------------------------------------------------
// Events and patch storage
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Format)]
enum InputEvent {
    /// Button or encoder.
    Panel(PanelEvent),
    /// Scaled pot reading, 0..=127.
    Pot { id: usize, raw: i32 },
}

/// RAM stand-in for the SD card: one value per pot for every program.
struct PatchStore {
    values: [[i32; N_POTS]; MAX_PATCHES],
}

impl PatchStore {
    fn new() -> Self {
        Self {
            values: [[64; N_POTS]; MAX_PATCHES],
        }
    }

    fn slot(program: u16) -> usize {
        (program as usize).saturating_sub(1).min(MAX_PATCHES - 1)
    }

    fn load(&self, program: u16) -> [i32; N_POTS] {
        self.values[Self::slot(program)]
    }

    fn store(&mut self, program: u16, values: [i32; N_POTS]) {
        self.values[Self::slot(program)] = values;
    }

    /// Drop `from` and shift every later program down by one.
    fn remove(&mut self, from: u16) {
        let start = Self::slot(from);
        self.values.copy_within(start + 1.., start);
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `display_dispatch_task` so
/// it can be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn display_task(
    graphic: GraphicPanel<PanelI2c>,
    character: CharacterPanel<PanelI2c, Delay>,
    ctx: &'static Mutex<CriticalSectionRawMutex, PanelContext>,
    config: DisplayConfig,
) {
    display_dispatch_task(graphic, character, ctx, config, env!("CARGO_PKG_VERSION")).await;
}

/// Debounced push button (active-low, pull-up).
#[embassy_executor::task(pool_size = 8)]
async fn button_task(mut pin: Input<'static>, event: PanelEvent, tx: EventSender) {
    loop {
        pin.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if pin.is_low() {
            tx.send(InputEvent::Panel(event)).await;
            pin.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        }
    }
}

/// Quadrature encoder: one detent per falling edge on A, direction from B.
#[embassy_executor::task]
async fn encoder_task(mut a: Input<'static>, b: Input<'static>, tx: EventSender) {
    loop {
        a.wait_for_falling_edge().await;
        let delta = if b.is_high() { 1 } else { -1 };
        tx.send(InputEvent::Panel(PanelEvent::Encoder(delta))).await;
    }
}

/// Scan the pots and queue readings that moved.
#[embassy_executor::task]
async fn pot_task(
    mut adc: Adc<'static, adc::Async>,
    mut pots: [adc::Channel<'static>; N_POTS],
    tx: EventSender,
) {
    let mut last = [i32::MIN; N_POTS];
    let mut ticker = Ticker::every(Duration::from_millis(POT_SCAN_MS));

    loop {
        ticker.next().await;
        for (id, pot) in pots.iter_mut().enumerate() {
            let sample = match adc.read(pot).await {
                Ok(s) => s,
                Err(_) => {
                    warn!("ADC read failed on pot {}", id);
                    continue;
                }
            };
            // 12-bit sample to MIDI range.
            let raw = i32::from(sample >> 5);
            if raw != last[id] {
                last[id] = raw;
                tx.send(InputEvent::Pot { id, raw }).await;
            }
        }
    }
}

/// Owns the controller; turns input events into page updates and storage
/// work. The context mutex is held only for the controller call.
#[embassy_executor::task]
async fn panel_task(
    rx: EventReceiver,
    ctx: &'static Mutex<CriticalSectionRawMutex, PanelContext>,
    mut controller: PanelController,
) {
    info!("Panel task started");

    let mut store = PatchStore::new();
    let mut live = [64i32; N_POTS];
    let mut positions = [0i32; N_POTS];

    let boot = {
        let mut ctx = ctx.lock().await;
        controller.boot(&mut ctx, now_ms())
    };
    match boot {
        Ok(action) => {
            perform(action, &mut controller, ctx, &mut store, &mut live, &positions).await
        }
        Err(e) => error!("Boot failed: {}", e),
    }

    loop {
        let event = rx.receive().await;
        let now = now_ms();

        match event {
            InputEvent::Pot { id, raw } => {
                positions[id] = raw;
                let accepted = {
                    let mut ctx = ctx.lock().await;
                    controller.pot_moved(&mut ctx, id, POT_NAMES[id], raw, now)
                };
                if let Some(value) = accepted {
                    live[id] = value;
                    debug!("{} = {}", POT_NAMES[id], value);
                }
            }
            InputEvent::Panel(mut event) => {
                if let PanelEvent::Encoder(delta) = event {
                    if controller.settings().value_index(SettingId::EncoderDirection) == 1 {
                        event = PanelEvent::Encoder(-delta);
                    }
                }
                let result = {
                    let mut ctx = ctx.lock().await;
                    controller.handle(&mut ctx, event, now)
                };
                match result {
                    Ok(action) => {
                        perform(action, &mut controller, ctx, &mut store, &mut live, &positions)
                            .await
                    }
                    Err(e) => warn!("{} rejected: {}", event, e),
                }
            }
        }
    }
}

/// Run the storage side of a controller action.
async fn perform(
    action: PanelAction,
    controller: &mut PanelController,
    ctx: &'static Mutex<CriticalSectionRawMutex, PanelContext>,
    store: &mut PatchStore,
    live: &mut [i32; N_POTS],
    positions: &[i32; N_POTS],
) {
    match action {
        PanelAction::None => {}
        PanelAction::LoadPatch(program) => {
            *live = store.load(program);
            controller.patch_loaded(live);
            info!("Loaded patch {}: {}", program, live);
        }
        PanelAction::StorePatch(program) => {
            store.store(program, *live);
            info!("Stored patch {}", program);
        }
        PanelAction::RenumberStorage { from } => {
            store.remove(from);
            let mut ctx = ctx.lock().await;
            if let Err(e) = controller.finish_delete(&mut ctx, now_ms()) {
                error!("Delete did not complete: {}", e);
            }
        }
        PanelAction::RenamePatch(program) => info!("Renamed patch {}", program),
        PanelAction::ReinitialiseFromPanel => {
            *live = *positions;
            info!("Parameters reloaded from panel: {}", live);
        }
        PanelAction::SettingChanged(change) => {
            info!("Setting {} -> {}", change.id, change.index);
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("memorymode-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA  → GP20  (p.PIN_20)  OLED 0x3C + LCD backpack 0x27
    // I2C_SCL  → GP21  (p.PIN_21)
    // RECALL   → GP2   SAVE → GP3   DELETE → GP4   SETTINGS → GP5
    // BACK     → GP6   RENAME → GP7   REINIT → GP8
    // ENC_SW   → GP9   (Select)
    // ENC_A    → GP10  ENC_B → GP11  all buttons active-low, pull-up
    // POT0..2  → GP26..GP28  (ADC0..2)
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let graphic = GraphicPanel::new(I2cDevice::new(i2c_bus), OLED_ADDRESS);
    let character = CharacterPanel::new(I2cDevice::new(i2c_bus), Delay, LCD_ADDRESS);

    let adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let pots = [
        adc::Channel::new_pin(p.PIN_26, Pull::None),
        adc::Channel::new_pin(p.PIN_27, Pull::None),
        adc::Channel::new_pin(p.PIN_28, Pull::None),
    ];

    // —— Panel state ————————————————————————————————————————————————————————

    let panel_ctx = PANEL_CONTEXT.init(Mutex::new(PanelContext::new(PanelConfig::default())));

    let catalog = match PatchCatalog::from_names([INIT_PATCH_NAME]) {
        Ok(c) => c,
        Err(e) => {
            error!("Could not build catalog: {}", e);
            PatchCatalog::new()
        }
    };
    let controller = PanelController::new(catalog, SettingsMenu::new());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    let tx = EVENTS.sender();
    let buttons = [
        (Input::new(p.PIN_2, Pull::Up), PanelEvent::Recall),
        (Input::new(p.PIN_3, Pull::Up), PanelEvent::Save),
        (Input::new(p.PIN_4, Pull::Up), PanelEvent::Delete),
        (Input::new(p.PIN_5, Pull::Up), PanelEvent::Settings),
        (Input::new(p.PIN_6, Pull::Up), PanelEvent::Back),
        (Input::new(p.PIN_7, Pull::Up), PanelEvent::Rename),
        (Input::new(p.PIN_8, Pull::Up), PanelEvent::Reinitialise),
        (Input::new(p.PIN_9, Pull::Up), PanelEvent::Select),
    ];
    for (pin, event) in buttons {
        spawner.spawn(button_task(pin, event, tx)).unwrap();
    }

    let enc_a = Input::new(p.PIN_10, Pull::Up);
    let enc_b = Input::new(p.PIN_11, Pull::Up);
    spawner.spawn(encoder_task(enc_a, enc_b, tx)).unwrap();
    spawner.spawn(pot_task(adc, pots, tx)).unwrap();

    spawner
        .spawn(panel_task(EVENTS.receiver(), panel_ctx, controller))
        .unwrap();
    spawner
        .spawn(display_task(graphic, character, panel_ctx, DisplayConfig::default()))
        .unwrap();

    info!("All tasks spawned");
}
