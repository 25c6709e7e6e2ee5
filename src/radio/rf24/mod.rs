use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
mod asynch;
mod auto_ack;
mod bank;
pub(crate) mod bit_fields;
mod channel;
mod init;
use bit_fields::{Config, Feature};
mod constants;
mod crc_length;
mod data_rate;
mod fifo;
mod pa_level;
mod payload_length;
mod power;
mod radio;
use constants::bank1;
pub use constants::{commands, mnemonics, registers};
mod details;
mod status;
use super::{ConfigError, EventFlags};
use crate::{ChipProfile, RadioState, StatusFlags};

/// A collection of error types to describe hardware malfunctions and misuse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// Represents a DigitalInput error (from the IRQ pin).
    Gpi(embedded_hal::digital::ErrorKind),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    ///
    /// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) returns this when the
    /// channel written to the radio does not read back. The radio is not usable
    /// until `init()` succeeds.
    BinaryCorruption,
    /// The given [`RadioConfig`](crate::radio::RadioConfig) was rejected before
    /// anything was written to the radio.
    InvalidConfig(ConfigError),
    /// A transmit or receive operation was requested while the radio is powered down.
    PoweredDown,
    /// [`EsbRadio::write()`](fn@crate::radio::prelude::EsbRadio::write) was called
    /// while the radio is in RX mode. Call
    /// [`EsbRadio::as_tx()`](fn@crate::radio::prelude::EsbRadio::as_tx) first.
    NotAsTx,
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 and RFM7x transceivers.
///
/// Additionally, there are some functions implemented that are specific to the nRF24L01.
pub struct RF24<SPI, DO, DELAY> {
    /// The delay (in microseconds) in which [`RF24::as_tx()`] will wait for
    /// ACK packets to complete.
    ///
    /// If the auto-ack feature is disabled, then this can be set as low as 0.
    ///
    /// Since this value can be optimized per the radio's data rate, this value is
    /// automatically adjusted when calling
    /// [`EsbDataRate::set_data_rate()`](fn@crate::radio::prelude::EsbDataRate::set_data_rate)
    /// or [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init).
    /// If setting this to a custom value be sure, to set it *after*
    /// changing the radio's data rate.
    pub tx_delay: u32,
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// This really only exposed for advanced manipulation of active TX mode.
    /// It is strongly recommended to enter RX or TX mode using [`RF24::as_rx()`] and
    /// [`RF24::as_tx()`] because those methods keep [`RF24::get_state()`] accurate.
    pub ce_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _config_reg: Config,
    _feature: Feature,
    _payload_length: u8,
    _auto_ack: bool,
    _chip: ChipProfile,
    _state: RadioState,
    _events: EventFlags,
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    ///
    /// Nothing is written to the radio until
    /// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> RF24<SPI, DO, DELAY> {
        RF24 {
            tx_delay: 280,
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _status: StatusFlags::from_bits(0),
            _buf: [0u8; 33],
            _feature: Feature::from_bits(0),
            // 16 bit CRC, enable all IRQ, and power down as TX
            _config_reg: Config::from_bits(0xC),
            _payload_length: 32,
            _auto_ack: true,
            _chip: ChipProfile::Standard,
            _state: RadioState::PowerDown,
            _events: EventFlags::new(),
        }
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    /// The `len` bytes clocked out after the `command` are zeros.
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..=len as usize].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        let buf_len = buf.len().min(32);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    /// Send the ACTIVATE command with the given `operand`.
    ///
    /// With [`mnemonics::ACTIVATE_FEATURES`] this unlocks the FEATURE register on
    /// chips that need it. With [`mnemonics::ACTIVATE_BANK`] this toggles the
    /// register bank on dual-bank chips.
    fn activate(&mut self, operand: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = commands::ACTIVATE;
        self._buf[1] = operand;
        self.spi_transfer(2)
    }

    /// Pulse the CE pin high for the minimum time the radio needs to start
    /// transmitting the payload at the top of the TX FIFO.
    fn pulse_ce(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(20);
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
    }

    /// The family member this driver was initialized for.
    pub fn chip(&self) -> ChipProfile {
        self._chip
    }
}
