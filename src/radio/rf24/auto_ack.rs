use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbAutoAck, Nrf24Error, RF24};

use super::commands;

impl<SPI, DO, DELAY> EsbAutoAck for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type AutoAckErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_auto_ack(&self) -> bool {
        self._auto_ack
    }

    fn get_ack_payloads(&self) -> bool {
        self._feature.ack_payloads()
    }

    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::AutoAckErrorType> {
        if self._feature.ack_payloads() && pipe <= 5 {
            let len = buf.len().min(32);
            self.spi_write_buf(commands::W_ACK_PAYLOAD | pipe, &buf[..len])?;
            // the STATUS byte was clocked out before the payload, so a full
            // TX FIFO means the payload was discarded
            return Ok(!self._status.tx_full());
        }
        Ok(false)
    }
}
