use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbPower, Nrf24Error, RF24};
use crate::RadioState;

use super::registers;

impl<SPI, DO, DELAY> EsbPower for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// After calling [`EsbRadio::as_rx()`](fn@crate::radio::prelude::EsbRadio::as_rx),
    /// a non-PA/LNA radio will consume about
    /// 13.5mA at [`PaLevel::MAX`](type@crate::types::PaLevel::Max).
    /// During active transmission (including RX role when transmitting an auto-ACK
    /// packet), a non-PA/LNA radio will consume about 11.5mA.
    /// In power standby mode (when not receiving nor transmitting), a non-PA/LNA radio
    /// will consume about 26uA (.026mA).
    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?; // Guarantee CE is low on powerDown
        // PRIM_RX is cleared too, so powering up always lands in standby
        self._config_reg = self._config_reg.with_power(false).as_tx();
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self._state = RadioState::PowerDown;
        Ok(())
    }

    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType> {
        // if not powered up then power up and wait for the radio to initialize
        if self._config_reg.power() {
            return Ok(());
        }
        self._config_reg = self._config_reg.with_power(true);
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;

        // There must be a delay of Tpd2standby after the radio leaves power down mode
        // before the CE is set high. Tpd2standby can be up to 5ms.
        match delay {
            Some(d) => {
                if d > 0 {
                    self._delay_impl.delay_us(d);
                }
            }
            None => self._delay_impl.delay_us(5000),
        }
        self._state = RadioState::Standby;
        Ok(())
    }

    /// Is the radio powered up?
    fn is_powered(&self) -> bool {
        self._config_reg.power()
    }

    fn get_state(&self) -> RadioState {
        self._state
    }
}
