use super::{data_rate::set_tx_delay, mnemonics, registers, Nrf24Error, RF24};
use crate::{
    radio::{
        prelude::{EsbFifo, EsbInit, EsbStatus},
        RadioConfig,
    },
    ChipProfile, RadioState, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Write the auto-retry, RF_SETUP and channel portion of the `config`.
    ///
    /// The channel is read back to verify the SPI lines are working.
    fn apply_rf(&mut self, config: &RadioConfig) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_write_byte(registers::SETUP_RETR, config.setup_retry().into_bits())?;

        // only the data rate, PA level and LNA bits are ours to change
        self.spi_read(1, registers::RF_SETUP)?;
        let rf_setup = config.rf_setup.merge_into(self._buf[1]);
        self.spi_write_byte(registers::RF_SETUP, rf_setup)?;
        self.tx_delay = set_tx_delay(config.data_rate());

        self.spi_write_byte(registers::RF_CH, config.channel())?;
        self.spi_read(1, registers::RF_CH)?;
        if self._buf[1] != config.channel() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "channel {=u8} read back as {=u8}",
                config.channel(),
                self._buf[1]
            );
            return Err(Nrf24Error::BinaryCorruption);
        }
        Ok(())
    }
}

impl<SPI, DO, DELAY> EsbInit for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Initialize the radio's hardware using the [`SpiDevice`] and [`OutputPin`] given
    /// to [`RF24::new()`].
    ///
    /// The radio is left in standby (powered up as TX) when this returns `Ok`.
    fn init(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        config.validate().map_err(Nrf24Error::InvalidConfig)?;
        self._chip = config.chip();

        // Must allow the radio time to settle else configuration bits will not necessarily stick.
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(self._chip.power_on_delay());
        self.select_bank(false)?;

        let addr_len = config.address_length();
        self.spi_write_byte(registers::SETUP_AW, addr_len - 2)?;

        let mut address = [0; 5];
        let addr_len = addr_len as usize;
        config.address(&mut address);
        self.spi_write_buf(registers::TX_ADDR, &address[..addr_len])?;
        // ACK packets are received on pipe 0
        self.spi_write_buf(registers::RX_ADDR_P0, &address[..addr_len])?;
        config.rx_address(1, &mut address);
        self.spi_write_buf(registers::RX_ADDR_P1, &address[..addr_len])?;
        for pipe in 2..6 {
            if config.is_rx_pipe_enabled(pipe) {
                config.rx_address(pipe, &mut address);
                self.spi_write_byte(registers::RX_ADDR_P0 + pipe, address[0])?;
            }
        }
        self.spi_write_byte(registers::EN_RXADDR, config.rx_pipes() & 0x3F)?;
        self.spi_write_byte(registers::EN_AA, config.en_aa())?;

        if !config.dynamic_payloads() {
            for pipe in 0..6 {
                if config.is_rx_pipe_enabled(pipe) {
                    self.spi_write_byte(registers::RX_PW_P0 + pipe, config.payload_length())?;
                }
            }
        }

        // FEATURE reads as 0 on chips that need it unlocked first
        self.spi_read(1, registers::FEATURE)?;
        if self._buf[1] == 0 {
            self.activate(mnemonics::ACTIVATE_FEATURES)?;
        }
        self._feature = config.feature_reg();
        self.spi_write_byte(registers::FEATURE, self._feature.into_bits())?;
        self.spi_write_byte(registers::DYNPD, config.dynpd())?;
        self._payload_length = config.payload_length();
        self._auto_ack = config.auto_ack();

        self.apply_rf(config)?;

        self.pump_events()?;
        self._events.clear(StatusFlags::new());
        self.flush_rx()?;
        self.flush_tx()?;

        if self._chip == ChipProfile::DualBankLegacy {
            self.calibrate_bank1()?;
        }

        // Set CONFIG register:
        //      Set all IRQ events on IRQ pin
        //      Set CRC length
        //      Power up
        //      Enable PTX
        // Do not write CE high so radio will remain in standby-I mode.
        self._config_reg = config.config_reg.with_power(true).as_tx();
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self._delay_impl.delay_us(5000);
        self._state = RadioState::Standby;
        #[cfg(feature = "defmt")]
        defmt::debug!("radio initialized on channel {=u8}", config.channel());
        Ok(())
    }

    fn reconfigure_rf(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        config.validate_rf().map_err(Nrf24Error::InvalidConfig)?;
        self.apply_rf(config)
    }
}
