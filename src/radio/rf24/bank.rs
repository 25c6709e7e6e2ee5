use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{Nrf24Error, RF24},
    ChipProfile,
};

use super::{bank1, commands, mnemonics};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Make register bank 1 (`true`) or bank 0 (`false`) the operating bank.
    ///
    /// Does nothing for [`ChipProfile::Standard`].
    pub(super) fn select_bank(&mut self, bank: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if self._chip == ChipProfile::Standard {
            return Ok(());
        }
        self.spi_read(0, commands::NOP)?;
        if self._status.bank() != bank {
            self.activate(mnemonics::ACTIVATE_BANK)?;
        }
        Ok(())
    }

    /// Write the factory calibration values to register bank 1.
    ///
    /// Leaves bank 0 selected.
    pub(super) fn calibrate_bank1(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.select_bank(true)?;
        for (reg, value) in bank1::REGISTERS.iter().enumerate() {
            let reg = reg as u8;
            let bytes = if reg <= bank1::LAST_LITTLE_ENDIAN {
                value.to_le_bytes()
            } else {
                value.to_be_bytes()
            };
            self.spi_write_buf(reg, &bytes)?;
        }
        self.spi_write_buf(bank1::REGISTERS.len() as u8, &bank1::RAMP_CURVE)?;

        let mut pll = bank1::REGISTERS[bank1::PLL_TOGGLE_REG as usize].to_le_bytes();
        pll[0] |= bank1::PLL_TOGGLE_MASK;
        self.spi_write_buf(bank1::PLL_TOGGLE_REG, &pll)?;
        pll[0] &= !bank1::PLL_TOGGLE_MASK;
        self.spi_write_buf(bank1::PLL_TOGGLE_REG, &pll)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("register bank 1 calibrated");
        self.select_bank(false)?;
        self._delay_impl.delay_us(1000);
        Ok(())
    }
}
