use anyhow::Result;
use bladerf_globals::Direction;
use libbladerf2_rs::Backend;
use libbladerf2_rs::usb::UsbBackend;

fn main() -> Result<()> {
    env_logger::init();

    let mut backend = match std::env::args().nth(1) {
        Some(serial) => UsbBackend::from_serial(&serial)?,
        None => UsbBackend::from_first()?,
    };

    println!("Manufacturer:     {}", backend.manufacturer()?);
    println!("Product:          {}", backend.product()?);
    println!("Serial:           {}", backend.serial()?);
    println!("Firmware version: {}", backend.get_fw_version()?);
    println!("Firmware ready:   {}", backend.is_fw_ready()?);
    println!("Device speed:     {:?}", backend.get_device_speed()?);

    if !backend.is_fpga_configured()? {
        println!("FPGA:             not configured");
        return Ok(());
    }

    println!("FPGA version:     {}", backend.get_fpga_version()?);
    println!("RFFE control:     {:#010x}", backend.rffe_control_read()?);
    println!("Config GPIO:      {:#010x}", backend.config_gpio_read()?);
    println!("RX timestamp:     {}", backend.get_timestamp(Direction::Rx)?);
    println!("TX timestamp:     {}", backend.get_timestamp(Direction::Tx)?);

    Ok(())
}
