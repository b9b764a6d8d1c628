#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Duration;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use esp_println::println;

use reveal_esp_light::controllers::ControlHttpController;
use reveal_esp_light::infrastructure::drivers::{init_network_stack, wait_for_connection};
use reveal_esp_light::infrastructure::tasks::light_composer::{
    init_light_composer, light_composer_task,
};
use reveal_esp_light::infrastructure::tasks::{
    command_feed_task, http_server_task, network_runner_task, wifi_connection_task,
};
use reveal_esp_light::mk_static;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // The radio driver allocates
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Start the render loop first so the strip animates while Wi-Fi connects
    let (driver, handles) =
        match init_light_composer(peripherals.RMT, reveal_esp_light::led_gpio!(peripherals)) {
            Ok(parts) => parts,
            Err(err) => panic!("light: RMT init failed: {:?}", err),
        };
    spawner.spawn(light_composer_task(driver)).ok();

    let (stack, runner, controller) = match init_network_stack(peripherals.WIFI) {
        Ok(parts) => parts,
        Err(err) => panic!("network: {}", err),
    };
    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    // Wait for network connection before starting network-dependent tasks
    let ip_config = wait_for_connection(stack).await;
    println!("network: got address {}", ip_config.address);

    let http_controller = mk_static!(
        ControlHttpController,
        ControlHttpController::new(handles.control, handles.replies, handles.status)
    );
    spawner.spawn(http_server_task(stack, http_controller)).ok();
    spawner.spawn(command_feed_task(stack, handles.queue)).ok();

    loop {
        embassy_time::Timer::after(Duration::from_secs(5)).await;
    }
}
