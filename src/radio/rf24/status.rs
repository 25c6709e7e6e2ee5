use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbFifo, EsbStatus},
        EventFlags, Nrf24Error, RF24,
    },
    types::StatusFlags,
};

use super::{commands, registers};

impl<SPI, DO, DELAY> EsbStatus for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type StatusErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn pump_events(&mut self) -> Result<StatusFlags, Self::StatusErrorType> {
        self.spi_read(0, commands::NOP)?;
        let status = self._status;
        if status.any() {
            // write 1 to clear
            self.spi_write_byte(registers::STATUS, status.into_bits() & StatusFlags::IRQ_MASK)?;
            self._events.raise(status);
            #[cfg(feature = "defmt")]
            defmt::trace!("pumped events 0x{=u8:X}", status.into_bits());
            if status.tx_df() {
                self.flush_tx()?;
            }
        }
        Ok(status)
    }

    fn events(&self) -> &EventFlags {
        &self._events
    }

    fn update(&mut self) -> Result<(), Self::StatusErrorType> {
        self.spi_read(0, commands::NOP)
    }

    fn get_status_flags(&self, flags: &mut StatusFlags) {
        *flags = self._status;
    }
}
