use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbFifo, Nrf24Error, RF24};
use crate::FifoState;

use super::{bit_fields::FifoStatus, commands, registers};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub(super) fn fifo_status(&mut self) -> Result<FifoStatus, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, registers::FIFO_STATUS)?;
        Ok(FifoStatus::from_bits(self._buf[1]))
    }
}

pub(super) const fn fifo_state(full: bool, empty: bool) -> FifoState {
    match (full, empty) {
        (true, _) => FifoState::Full,
        (_, true) => FifoState::Empty,
        _ => FifoState::Occupied,
    }
}

impl<SPI, DO, DELAY> EsbFifo for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn available(&mut self) -> Result<bool, Self::FifoErrorType> {
        Ok(!self.fifo_status()?.rx_empty())
    }

    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::FifoErrorType> {
        if self.available()? {
            // RX FIFO is not empty
            // get last used pipe
            self.spi_read(0, commands::NOP)?;
            *pipe = self._status.rx_pipe();
            return Ok(true);
        }
        Ok(false)
    }

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let fifo = self.fifo_status()?;
        Ok(if about_tx {
            fifo_state(fifo.tx_full(), fifo.tx_empty())
        } else {
            fifo_state(fifo.rx_full(), fifo.rx_empty())
        })
    }
}
