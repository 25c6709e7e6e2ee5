use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::registers;
use crate::radio::{prelude::EsbDataRate, Nrf24Error, RF24};
use crate::DataRate;

/// A function to set the [`RF24::tx_delay`] in accordance with the desired [`DataRate`].
///
/// This function is only public to the crate::radio::rf24 module.
pub(super) fn set_tx_delay(data_rate: DataRate) -> u32 {
    match data_rate {
        DataRate::Mbps1 => 280,
        DataRate::Mbps2 => 240,
        DataRate::Kbps250 => 505,
    }
}

impl<SPI, DO, DELAY> EsbDataRate for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DataRateErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateErrorType> {
        self.spi_read(1, registers::RF_SETUP)?;
        let da_bin = self._buf[1] & DataRate::MASK;
        if da_bin == DataRate::MASK {
            // both RF_DR_LOW and RF_DR_HIGH set is a reserved value
            return Err(Nrf24Error::BinaryCorruption);
        }
        Ok(DataRate::from_bits(da_bin))
    }

    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType> {
        self.tx_delay = set_tx_delay(data_rate);
        self.spi_read(1, registers::RF_SETUP)?;
        let out = self._buf[1] & !DataRate::MASK | data_rate.into_bits();
        self.spi_write_byte(registers::RF_SETUP, out)
    }
}
