//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24_link::radio::prelude::*;
//! ```

use crate::types::{
    CrcLength, DataRate, FifoState, PaLevel, Payload, RadioDetails, RadioState, StatusFlags,
    TransmitResult,
};

use super::{EventFlags, ObserveTx, RadioConfig};

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// These channels translate to the RF frequency as an offset of MHz from 2400 MHz.
    /// The default channel is 76 (2400 + 76 = 2.476 GHz).
    /// Values greater than 127 are clamped to 127.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;
}

/// A trait to represent the handling of [`StatusFlags`]
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Read the STATUS register, clear any events it reports (on the radio) and
    /// record them in [`EsbStatus::events()`].
    ///
    /// This is the only place where the radio's event flags are read and cleared.
    /// It is called whenever a transmit or receive operation needs to know what
    /// happened (whether it was woken by the IRQ pin or is simply polling).
    ///
    /// If the "TX Data Failed" event is observed, the TX FIFO is also flushed.
    ///
    /// The returned value is the STATUS byte as it was read.
    fn pump_events(&mut self) -> Result<StatusFlags, Self::StatusErrorType>;

    /// The events recorded by [`EsbStatus::pump_events()`] and not yet consumed.
    fn events(&self) -> &EventFlags;

    /// Get the [`StatusFlags`] state that was cached from the latest SPI transaction.
    fn get_status_flags(&self, flags: &mut StatusFlags);

    /// Refresh the internal cache of status byte
    /// (which is also saved from every SPI transaction).
    ///
    /// This does not clear nor record any events.
    /// Use [`EsbStatus::get_status_flags()`] to get the updated status flags.
    fn update(&mut self) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;

    /// Is there a payload available in the radio's RX FIFO?
    ///
    /// This function simply returns true if there is data to [`EsbRadio::read()`] from the RX FIFO.
    /// Use [`EsbFifo::available_pipe()`] to get information about the pipe that received the data.
    fn available(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// This is similar to [`EsbFifo::available()`] except the `pipe` parameter is given
    /// a mutable [`u8`] value, and the pipe number that received the data is stored to it.
    ///
    /// If there is no data ready to read in the RX FIFO, then the `pipe` parameter's
    /// value is untouched.
    ///
    /// ```ignore
    /// let mut pipe = 9; // using an invalid pipe number
    /// if radio.available_pipe(&mut pipe).is_ok_and(|rv| rv) {
    ///     // `pipe` should now be set to a valid pipe number
    ///     print!("A Payload was received on pipe {pipe}");
    /// }
    /// ```
    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::FifoErrorType>;
}

/// A trait to represent manipulation of payload lengths (static or dynamic)
/// for an ESB capable transceiver.
pub trait EsbPayloadLength {
    type PayloadLengthErrorType;

    /// Get the currently configured static payload length of a specified `pipe`.
    fn get_payload_length(&mut self, pipe: u8) -> Result<u8, Self::PayloadLengthErrorType>;

    /// Get the current setting of the dynamic payloads feature.
    fn get_dynamic_payloads(&self) -> bool;

    /// Get the dynamic length of the next available payload in the RX FIFO.
    ///
    /// When dynamic payloads are disabled, this function's returned value shall be
    /// considered invalid.
    fn get_dynamic_payload_length(&mut self) -> Result<u8, Self::PayloadLengthErrorType>;
}

/// A trait to represent manipulation of the automatic acknowledgement feature
/// for an ESB capable transceiver.
pub trait EsbAutoAck {
    type AutoAckErrorType;

    /// Get the current setting of the auto-ACK feature.
    fn get_auto_ack(&self) -> bool;

    /// Get the current setting of the ACK payloads feature.
    fn get_ack_payloads(&self) -> bool;

    /// Upload a given ACK packet's payload (`buf`) into the radio's TX FIFO.
    ///
    /// The payload is sent along with the next auto-ACK packet for the given `pipe`.
    /// This feature requires [`RadioConfig::with_ack_payloads()`] (and thus
    /// dynamic payloads) to be enabled.
    ///
    /// Returns `false` (without touching the radio) if ACK payloads are disabled or
    /// the `pipe` is not in range [0, 5]. Returns `false` if the TX FIFO is full.
    /// Payloads longer than 32 bytes are truncated.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::AutoAckErrorType>;
}

/// A trait to represent manipulation of the power amplitude level
/// for an ESB capable transceiver.
pub trait EsbPaLevel {
    type PaLevelErrorType;

    /// Get the currently configured Power Amplitude Level (PA Level)
    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelErrorType>;

    /// Set the radio's Power Amplitude Level (PA Level)
    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelErrorType>;
}

/// A trait to represent manipulation of the power state
/// for an ESB capable transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio.
    ///
    /// <div class="warning">
    ///
    /// The radio cannot receive nor transmit data when powered down.
    ///
    /// </div>
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio.
    ///
    /// This wraps the radio's powered down state with a delay of 5 milliseconds
    /// (or the given `delay` in microseconds). Nothing happens if the radio is
    /// already powered up.
    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType>;

    /// Get the current (cached) state of the radio's power.
    fn is_powered(&self) -> bool;

    /// Get the radio's current operating state.
    fn get_state(&self) -> RadioState;
}

/// A trait to represent manipulation of Cyclical Redundancy Checksums
/// for an ESB capable transceiver.
pub trait EsbCrcLength {
    type CrcLengthErrorType;

    /// Get the currently configured CRC (Cyclical Redundancy Checksum) length
    fn get_crc_length(&mut self) -> Result<CrcLength, Self::CrcLengthErrorType>;
}

/// A trait to represent manipulation of data rate
/// for an ESB capable transceiver.
pub trait EsbDataRate {
    type DataRateErrorType;

    /// Get the currently configured Data Rate
    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateErrorType>;

    /// Set the radio's Data Rate
    ///
    /// This also adjusts the delay used when leaving RX mode.
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType>;
}

/// A trait to represent debug output
/// for an ESB capable transceiver.
pub trait EsbDetails {
    type DetailsErrorType;

    /// Read back the radio's configuration and state.
    fn details(&mut self) -> Result<RadioDetails, Self::DetailsErrorType>;

    /// Print details about radio's current configuration.
    ///
    /// This should only be used for debugging development.
    /// Using this in production should be limited due to a significant increase in
    /// compile size.
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType>;
}

/// A trait to represent the configuration sequence
/// of an ESB capable transceiver.
pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio's hardware with the given `config`.
    ///
    /// The configuration is validated before the radio is touched. Upon success,
    /// the radio is powered up in standby (TX) mode with both FIFOs empty and no
    /// pending events.
    fn init(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;

    /// Re-apply only the RF parameters of the given `config`:
    /// auto-retries, data rate, PA level, LNA and channel.
    ///
    /// Pipe addresses and payload settings are left untouched.
    fn reconfigure_rf(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}

/// A trait to represent manipulation of an ESB capable transceiver.
///
/// Although the name is rather generic, this trait describes the
/// basic functionality of the packet link.
pub trait EsbRadio {
    type RadioErrorType;

    /// Put the radio into active RX mode.
    ///
    /// Powers the radio up if needed. Any payloads and events left over from
    /// before are discarded.
    fn as_rx(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Put the radio into inactive TX mode (standby).
    ///
    /// This waits for [`RF24::tx_delay`](value@crate::radio::RF24::tx_delay) so an
    /// outgoing auto-ACK packet can finish, then flushes the TX FIFO.
    fn as_tx(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Is the radio in RX mode?
    fn is_rx(&self) -> bool;

    /// Blocking function that sends a given payload (`buf`) and waits for the outcome.
    ///
    /// If the radio is in RX mode, it is first put into TX mode.
    /// Set the `ask_no_ack` parameter to `true` to skip the receiver's auto-ACK.
    ///
    /// Returns
    /// - [`TransmitResult::FifoFull`] if the TX FIFO already held 3 payloads (nothing was sent).
    /// - [`TransmitResult::Success`] if the payload was sent (and acknowledged).
    /// - [`TransmitResult::MaxRetriesExceeded`] if no ACK arrived within the configured
    ///   retries. The TX FIFO is flushed in that case.
    fn transmit(&mut self, buf: &[u8], ask_no_ack: bool)
        -> Result<TransmitResult, Self::RadioErrorType>;

    /// Non-blocking function that uploads a given payload (`buf`) to the TX FIFO.
    ///
    /// If `start_tx` is `true`, then the CE pin is pulsed to begin transmitting.
    /// Returns `false` if the TX FIFO is full.
    ///
    /// The radio must not be in RX mode; use [`EsbRadio::as_tx()`] first.
    fn write(
        &mut self,
        buf: &[u8],
        ask_no_ack: bool,
        start_tx: bool,
    ) -> Result<bool, Self::RadioErrorType>;

    /// Non-blocking function that drains the RX FIFO if the event pump reports
    /// received data.
    ///
    /// Returns the last [`Payload`] drained (and the pipe it arrived on), or `None`
    /// if nothing was received. A dynamic payload reporting an invalid length causes
    /// the RX FIFO to be flushed and `None` to be returned.
    fn receive(&mut self) -> Result<Option<Payload>, Self::RadioErrorType>;

    /// Get data from the RX FIFO, one payload at a time.
    ///
    /// Use `len` to specify the number of bytes to read; otherwise the static
    /// or dynamic payload length is used.
    fn read(&mut self, buf: &mut [u8], len: Option<u8>) -> Result<u8, Self::RadioErrorType>;

    /// Get the Auto-Retry Count (ARC) about the previous transmission.
    fn get_last_arc(&mut self) -> Result<u8, Self::RadioErrorType>;

    /// Get the lost packet and retry counters.
    ///
    /// When the lost packet counter has saturated, it is reset (by re-writing the
    /// current channel) after being read.
    fn observe_tx(&mut self) -> Result<ObserveTx, Self::RadioErrorType>;
}
