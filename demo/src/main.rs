mod config;
mod demos;

use crate::config::Config;
use crate::demos::Demo;
use charlcd_gpio::GpioDriver;
use charlcd_gpio::delay::StdDelay;
use charlcd_gpio::gpiod::GpiodDriver;
use charlcd_gpio::lcd::hd44780::CharacterLcd;
use charlcd_gpio::lcd::hd44780::driver::{GpioHD44780Driver, PinAssignment};
use charlcd_gpio::pwm::{PwmDriver, PwmPin, SysfsPwmDriver};
use charlcd_gpio::raw::RawGpioDriver;
use dotenv::{dotenv, var};
use log::{debug, info};
use sysinfo::System;

fn parse_pin_bus(pin_str: &str) -> eyre::Result<[usize; 4]> {
    pin_str
        .split([',', ' ', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()?
        .try_into()
        .map_err(|_| eyre::eyre!("Invalid number of data pins"))
}

/// Parses a `chip:channel` pair.
fn parse_pwm_channel(channel_str: &str) -> eyre::Result<(usize, usize)> {
    let (chip, channel) = channel_str
        .split_once(':')
        .ok_or_else(|| eyre::eyre!("Expected chip:channel, got {:?}", channel_str))?;
    Ok((chip.trim().parse()?, channel.trim().parse()?))
}

fn open_gpio() -> eyre::Result<Box<dyn GpioDriver>> {
    let backend = var("CHARLCD_GPIO_BACKEND").unwrap_or_else(|_| "gpiomem".to_string());
    let gpio: Box<dyn GpioDriver> = match backend.as_str() {
        "gpiomem" => Box::new(RawGpioDriver::new_gpiomem()?),
        "mem" => Box::new(RawGpioDriver::new_mem()?),
        "gpiod" => {
            let chip_path =
                var("CHARLCD_GPIO_CHIP").unwrap_or_else(|_| "/dev/gpiochip0".to_string());
            Box::new(GpiodDriver::open(chip_path)?)
        }
        _ => return Err(eyre::eyre!("Unknown GPIO backend {:?}", backend)),
    };
    Ok(gpio)
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "charlcd demo {} on {} ({})",
        env!("CARGO_PKG_VERSION"),
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR),
        System::long_os_version().as_deref().unwrap_or(UNKNOWN_STR),
    );
    info!(
        "Kernel {}, architecture {}",
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::cpu_arch()
    );

    let demo: Demo = match std::env::args().nth(1) {
        Some(name) => name.parse()?,
        None => Demo::default(),
    };

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };
    let geometry = config.geometry()?;

    // Get pin numbers from env
    let lcd_e_pin_no: usize = var("CHARLCD_PIN_E")?.parse()?;
    let lcd_rs_pin_no: usize = var("CHARLCD_PIN_RS")?.parse()?;
    let lcd_data_pin_nos: [usize; 4] = parse_pin_bus(&var("CHARLCD_PINS_DATA")?)?;
    let backlight_channel = var("CHARLCD_BACKLIGHT_PWM")
        .ok()
        .map(|s| parse_pwm_channel(&s))
        .transpose()?;

    info!(
        "LCD @ E: {}, RS: {}, Data: {:?}, backlight PWM: {:?}",
        lcd_e_pin_no, lcd_rs_pin_no, lcd_data_pin_nos, backlight_channel
    );

    debug!("Initializing GPIO driver...");
    let gpio = open_gpio()?;
    debug!("{:?} initialized.", gpio);
    let delay = StdDelay;

    let pwm_chip = backlight_channel
        .map(|(chip, _)| SysfsPwmDriver::get_chip(chip))
        .transpose()?;
    let mut backlight_pin = match (&pwm_chip, backlight_channel) {
        (Some(chip), Some((_, channel))) => Some(chip.get_pin(channel)?),
        _ => None,
    };
    let backlight: Option<&mut dyn PwmPin> = match &mut backlight_pin {
        Some(pin) => Some(&mut **pin),
        None => None,
    };

    debug!("Initializing LCD driver...");
    let driver = GpioHD44780Driver::new(
        &*gpio,
        &delay,
        PinAssignment::new(lcd_data_pin_nos, lcd_rs_pin_no, lcd_e_pin_no),
        config.timing.profile(),
    )?;
    let mut lcd = CharacterLcd::new(driver, geometry, backlight);
    lcd.init()?;
    lcd.set_backlight(config.backlight)?;
    debug!("{:?} initialized.", lcd);

    demo.run(&mut lcd, &config.glyph)
}
