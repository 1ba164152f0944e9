#![no_std]
#![no_main]

use core::cell::RefCell;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::{debug, error, info, trace, warn};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Delay, Timer};
use hud_core::{HudConfig, HudQueue, Renderer, Screen, WatchOutcome};
use hud_firmware_rp2040::{
    button_watcher, ili9341, net, panel_layout, park, ButtonWatcher, GraphicsSurface, HudPanel,
    Ili9341, PanelBus, UdpBuffers, UdpTelemetrySource,
};
use mavlink_proto::ReceiveEvent;
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Panel SPI clock.
const PANEL_SPI_HZ: u32 = 32_000_000;

/// The command queue shared by all producers and the render task.
static QUEUE: StaticCell<HudQueue> = StaticCell::new();

static PANEL_BUS: StaticCell<Mutex<NoopRawMutex, RefCell<PanelBus>>> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static UDP_BUFFERS: StaticCell<UdpBuffers> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PX4 HUD starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());
    let config = HudConfig::DEFAULT.with_udp_port(net::udp_port());
    let queue = QUEUE.init(HudQueue::new());

    // --- Display Setup ---
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = PANEL_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let bus = PANEL_BUS.init(Mutex::new(RefCell::new(spi)));

    let panel = Ili9341::new(
        SpiDevice::new(bus, Output::new(p.PIN_9, Level::High)),
        Output::new(p.PIN_8, Level::Low),  // D/C
        Output::new(p.PIN_12, Level::High), // RESET
    );
    let backlight = Output::new(p.PIN_7, Level::High);

    // --- Buttons (left, middle, right) ---
    let left = button_watcher(p.PIN_13, Screen::General, &config);
    let middle = button_watcher(p.PIN_14, Screen::Heading, &config);
    let right = button_watcher(p.PIN_15, Screen::Speed, &config);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(render_task(panel, backlight, queue, config).unwrap());
    spawner.spawn(button_task(left, queue).unwrap());
    spawner.spawn(button_task(middle, queue).unwrap());
    spawner.spawn(button_task(right, queue).unwrap());

    // --- Wi-Fi Setup ---
    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, net::wifi_firmware()).await;
    spawner.spawn(cyw43_task(runner).unwrap());

    control.init(net::wifi_clm()).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let (stack, runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        net::NET_SEED,
    );
    spawner.spawn(net_task(runner).unwrap());

    info!("Joining Wi-Fi network {}...", net::WIFI_SSID);
    while let Err(e) = net::join(&mut control).await {
        warn!("Join failed: {:?}, retrying", e);
        Timer::after_secs(1).await;
    }

    stack.wait_config_up().await;
    if let Some(v4) = stack.config_v4() {
        info!("Wi-Fi up, address {}", v4.address);
    }

    spawner.spawn(telemetry_task(stack, queue, config).unwrap());

    info!("PX4 HUD initialized, waiting for telemetry...");
}

/// CYW43 driver task - runs the Wi-Fi chip.
#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack task.
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Render task - sole consumer of the command queue.
#[embassy_executor::task]
async fn render_task(
    mut panel: HudPanel,
    _backlight: Output<'static>,
    queue: &'static HudQueue,
    config: HudConfig,
) {
    if let Err(e) = panel.init(&mut Delay) {
        error!("Panel init failed: {:?}", e);
        park().await;
    }

    let layout = panel_layout(ili9341::WIDTH, ili9341::HEIGHT);
    let mut renderer = match Renderer::init(GraphicsSurface::new(panel), layout, &config) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Display init failed: {:?}", e);
            park().await
        }
    };
    info!("Display ready");

    renderer
        .run(queue, |result| match result {
            Ok(command) => debug!("Processed {:?}", command),
            Err(e) => error!("Draw failed: {:?}", e),
        })
        .await
}

/// Button task - one instance per screen button.
#[embassy_executor::task(pool_size = 3)]
async fn button_task(mut watcher: ButtonWatcher, queue: &'static HudQueue) {
    loop {
        match watcher.watch_once(queue).await {
            WatchOutcome::Queued(screen) => info!("Button pushed: {:?}", screen),
            WatchOutcome::Dropped(screen) => debug!("Queue full, dropped select {:?}", screen),
        }
    }
}

/// Telemetry task - receives MAVLink datagrams and queues VFR_HUD values.
#[embassy_executor::task]
async fn telemetry_task(stack: Stack<'static>, queue: &'static HudQueue, config: HudConfig) {
    let buffers = UDP_BUFFERS.init(UdpBuffers::new());
    let mut source = match UdpTelemetrySource::bind(stack, buffers, &config) {
        Ok(source) => source,
        Err(e) => {
            error!("UDP bind to port {} failed: {:?}", config.udp_port, e);
            park().await
        }
    };
    info!("Listening for MAVLink on UDP port {}", config.udp_port);

    loop {
        match source.receive(queue, log_event).await {
            Ok(len) => trace!("Datagram of {} bytes", len),
            Err(e) => debug!("UDP receive failed: {:?}", e),
        }
    }
}

fn log_event(event: ReceiveEvent) {
    match event {
        ReceiveEvent::Queued(t) => info!(
            "VFR_HUD airspeed={} groundspeed={} alt={} climb={} heading={} throttle={}",
            t.airspeed,
            t.groundspeed,
            t.alt,
            t.climb,
            t.heading,
            t.throttle
        ),
        ReceiveEvent::Dropped(_) => debug!("Queue full, dropped telemetry"),
        ReceiveEvent::ForeignComponent {
            system_id,
            component_id,
        } => trace!("Ignoring frame from {}:{}", system_id, component_id),
        ReceiveEvent::Ignored { message_id } => trace!("Ignoring message {}", message_id),
        #[cfg(feature = "log-bad-crc")]
        ReceiveEvent::Corrupt(e) => warn!("Bad MAVLink frame: {:?}", e),
        #[cfg(not(feature = "log-bad-crc"))]
        ReceiveEvent::Corrupt(_) => {}
    }
}
