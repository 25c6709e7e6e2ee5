use crate::radio::{prelude::EsbPayloadLength, Nrf24Error, RF24};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers};

impl<SPI, DO, DELAY> EsbPayloadLength for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PayloadLengthErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_payload_length(&mut self, pipe: u8) -> Result<u8, Self::PayloadLengthErrorType> {
        self.spi_read(1, registers::RX_PW_P0 + pipe.min(5))?;
        Ok(self._buf[1])
    }

    fn get_dynamic_payloads(&self) -> bool {
        self._feature.dynamic_payloads()
    }

    /// The value returned is not checked. A value greater than 32 means the
    /// payload at the top of the RX FIFO is corrupt.
    fn get_dynamic_payload_length(&mut self) -> Result<u8, Self::PayloadLengthErrorType> {
        self.spi_read(1, commands::R_RX_PL_WID)?;
        Ok(self._buf[1])
    }
}
