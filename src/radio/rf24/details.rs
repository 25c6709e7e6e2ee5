use super::{
    bit_fields::{Config, Feature, RfSetup, SetupRetry},
    commands,
    fifo::fifo_state,
    registers, Nrf24Error, RF24,
};
use crate::radio::prelude::{EsbChannel, EsbDetails, EsbPayloadLength};
use crate::RadioDetails;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

#[cfg(feature = "std")]
extern crate std;

impl<SPI, DO, DELAY> EsbDetails for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DetailsErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Reads the registers of bank 0 only. The STATUS byte's bank bit is
    /// reported as observed, without switching banks.
    fn details(&mut self) -> Result<RadioDetails, Self::DetailsErrorType> {
        self.spi_read(0, commands::NOP)?;
        let bank = self._status.bank();

        self.spi_read(1, registers::CONFIG)?;
        let config = Config::from_bits(self._buf[1]);
        let channel = self.get_channel()?;
        self.spi_read(1, registers::RF_SETUP)?;
        let rf_setup = RfSetup::from_bits(self._buf[1]);
        self.spi_read(1, registers::SETUP_AW)?;
        let address_length = (self._buf[1] & 3) + 2;
        let payload_length = self.get_payload_length(0)?;
        self.spi_read(1, registers::FEATURE)?;
        let feature = Feature::from_bits(self._buf[1]);
        self.spi_read(1, registers::SETUP_RETR)?;
        let retry = SetupRetry::from_bits(self._buf[1]);
        let observed = self.observe_tx_raw()?;
        let fifo = self.fifo_status()?;
        self.spi_read(1, registers::EN_AA)?;
        let auto_ack = self._buf[1];
        self.spi_read(1, registers::EN_RXADDR)?;
        let open_pipes = self._buf[1];

        let mut tx_address = [0u8; 5];
        self.spi_read(5, registers::TX_ADDR)?;
        tx_address.copy_from_slice(&self._buf[1..6]);
        let mut rx_addresses = [[0u8; 5]; 2];
        for (pipe, address) in (0u8..).zip(rx_addresses.iter_mut()) {
            self.spi_read(5, registers::RX_ADDR_P0 + pipe)?;
            address.copy_from_slice(&self._buf[1..6]);
        }
        let mut sub_addresses = [0u8; 4];
        for (pipe, lsb) in (2u8..).zip(sub_addresses.iter_mut()) {
            self.spi_read(1, registers::RX_ADDR_P0 + pipe)?;
            *lsb = self._buf[1];
        }

        Ok(RadioDetails {
            chip: self._chip,
            bank,
            state: self._state,
            powered: config.power(),
            is_rx: config.is_rx(),
            channel,
            data_rate: rf_setup.data_rate(),
            pa_level: rf_setup.pa_level(),
            lna_enabled: rf_setup.lna_enable(),
            crc_length: config.crc_length(),
            address_length,
            payload_length,
            dynamic_payloads: feature.dynamic_payloads(),
            ack_payloads: feature.ack_payloads(),
            retry_delay: (retry.ard() as u16 + 1) * 250,
            retry_count: retry.arc(),
            lost_packets: observed.lost_packets(),
            last_retries: observed.retries(),
            pending: self._events.peek(),
            tx_fifo: fifo_state(fifo.tx_full(), fifo.tx_empty()),
            rx_fifo: fifo_state(fifo.rx_full(), fifo.rx_empty()),
            auto_ack,
            open_pipes,
            tx_address,
            rx_addresses,
            sub_addresses,
        })
    }

    #[cfg(feature = "defmt")]
    #[cfg(target_os = "none")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let details = self.details()?;
        defmt::println!("{}", details);
        Ok(())
    }

    #[cfg(not(all(feature = "defmt", target_os = "none")))]
    #[cfg(feature = "std")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let details = self.details()?;
        std::println!("{details}");
        Ok(())
    }

    #[cfg(not(any(all(feature = "defmt", target_os = "none"), feature = "std")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        Ok(())
    }
}
