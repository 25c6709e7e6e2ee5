use super::{commands, registers, Nrf24Error, RF24};
use crate::{
    radio::{
        prelude::{EsbChannel, EsbFifo, EsbPayloadLength, EsbPower, EsbRadio, EsbStatus},
        ObserveTx,
    },
    Payload, RadioState, StatusFlags, TransmitResult,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Upload a payload with the W_TX_PAYLOAD or W_TX_PAYLOAD_NO_ACK command.
    ///
    /// In static payload mode, the payload is padded with zeros (or truncated)
    /// to the static payload length.
    fn write_payload(
        &mut self,
        buf: &[u8],
        ask_no_ack: bool,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let buf_len = buf.len().min(32);
        let len = if self._feature.dynamic_payloads() {
            buf_len
        } else {
            self._payload_length as usize
        };
        // to avoid resizing the given buf, we'll have to use self._buf directly
        self._buf[0] = if ask_no_ack {
            commands::W_TX_PAYLOAD_NO_ACK
        } else {
            commands::W_TX_PAYLOAD
        };
        let copied = buf_len.min(len);
        self._buf[1..=copied].copy_from_slice(&buf[..copied]);
        self._buf[(copied + 1)..=len].fill(0);
        self.spi_transfer(len as u8 + 1)
    }

    /// The common start of [`RF24::transmit()`] and [`RF24::transmit_async()`].
    ///
    /// Returns `false` (without uploading anything) if the TX FIFO is full.
    pub(super) fn begin_transmit(
        &mut self,
        buf: &[u8],
        ask_no_ack: bool,
    ) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        match self._state {
            RadioState::PowerDown => return Err(Nrf24Error::PoweredDown),
            RadioState::ActiveReceive => self.as_tx()?,
            _ => (),
        }
        if self.fifo_status()?.tx_full() {
            return Ok(false);
        }
        // stale TX events would end the wait below prematurely
        self.pump_events()?;
        self._events
            .clear(StatusFlags::default().with_tx_ds(true).with_tx_df(true));
        self.write_payload(buf, ask_no_ack)?;
        self._state = RadioState::ActiveTransmit;
        self.pulse_ce()?;
        Ok(true)
    }

    /// Consume the outcome of a transmission from the pending events, if any.
    pub(super) fn take_transmit_outcome(&mut self) -> Option<TransmitResult> {
        let sent = self._events.take_tx_ds();
        let failed = self._events.take_tx_df();
        let result = if sent {
            TransmitResult::Success
        } else if failed {
            TransmitResult::MaxRetriesExceeded
        } else {
            return None;
        };
        self._state = RadioState::Standby;
        #[cfg(feature = "defmt")]
        defmt::trace!("transmit finished, acknowledged: {=bool}", sent);
        Some(result)
    }

    /// Drain the RX FIFO, returning the last payload read.
    fn drain_rx(&mut self) -> Result<Option<Payload>, Nrf24Error<SPI::Error, DO::Error>> {
        let mut last = None;
        loop {
            self.spi_read(0, commands::NOP)?;
            let pipe = self._status.rx_pipe();
            if pipe > 5 {
                break;
            }
            let len = if self._feature.dynamic_payloads() {
                let len = self.get_dynamic_payload_length()?;
                if len > 32 {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("discarding RX FIFO; invalid payload width {=u8}", len);
                    self.flush_rx()?;
                    return Ok(None);
                }
                len
            } else {
                self.get_payload_length(pipe)?.min(32)
            };
            self.spi_read(len, commands::R_RX_PAYLOAD)?;
            last = Some(Payload::new(pipe, &self._buf[1..=len as usize]));
            if self.fifo_status()?.rx_empty() {
                break;
            }
        }
        Ok(last)
    }
}

impl<SPI, DO, DELAY> EsbRadio for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn as_rx(&mut self) -> Result<(), Self::RadioErrorType> {
        self.power_up(None)?;
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self.flush_rx()?;
        self.pump_events()?;
        self._events.clear(StatusFlags::new());
        self._config_reg = self._config_reg.as_rx();
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._state = RadioState::ActiveReceive;
        Ok(())
    }

    fn as_tx(&mut self) -> Result<(), Self::RadioErrorType> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;

        self._delay_impl.delay_us(self.tx_delay);
        self.flush_tx()?;

        self._config_reg = self._config_reg.as_tx();
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self._state = if self._config_reg.power() {
            RadioState::Standby
        } else {
            RadioState::PowerDown
        };
        Ok(())
    }

    fn is_rx(&self) -> bool {
        self._config_reg.is_rx()
    }

    /// See [`EsbRadio::transmit()`] for implementation-agnostic detail.
    ///
    /// This busy-waits on the STATUS register. Use [`RF24::transmit_async()`]
    /// to wait on the IRQ pin instead.
    fn transmit(
        &mut self,
        buf: &[u8],
        ask_no_ack: bool,
    ) -> Result<TransmitResult, Self::RadioErrorType> {
        if !self.begin_transmit(buf, ask_no_ack)? {
            return Ok(TransmitResult::FifoFull);
        }
        loop {
            self.pump_events()?;
            if let Some(result) = self.take_transmit_outcome() {
                return Ok(result);
            }
        }
    }

    /// See [`EsbRadio::write()`] for implementation-agnostic detail.
    ///
    /// The outcome is observed later with
    /// [`EsbStatus::pump_events()`](fn@crate::radio::prelude::EsbStatus::pump_events).
    fn write(
        &mut self,
        buf: &[u8],
        ask_no_ack: bool,
        start_tx: bool,
    ) -> Result<bool, Self::RadioErrorType> {
        if self.is_rx() {
            // leaving RX mode must go through as_tx()
            return Err(Nrf24Error::NotAsTx);
        }
        if start_tx && self._state == RadioState::PowerDown {
            return Err(Nrf24Error::PoweredDown);
        }
        if self.fifo_status()?.tx_full() {
            return Ok(false);
        }
        self.write_payload(buf, ask_no_ack)?;
        if start_tx {
            self.pulse_ce()?;
        }
        Ok(true)
    }

    fn receive(&mut self) -> Result<Option<Payload>, Self::RadioErrorType> {
        if self._state == RadioState::PowerDown {
            return Err(Nrf24Error::PoweredDown);
        }
        self.pump_events()?;
        if !self._events.take_rx_dr() {
            return Ok(None);
        }
        self.drain_rx()
    }

    /// See [`EsbRadio::read()`] for implementation-agnostic detail.
    ///
    /// Remember that each call to [`RF24::read()`] fetches data from the
    /// RX FIFO beginning with the first byte from the first available
    /// payload. A payload is not removed from the RX FIFO until it's
    /// entire length (or more) is fetched.
    fn read(&mut self, buf: &mut [u8], len: Option<u8>) -> Result<u8, Self::RadioErrorType> {
        let payload_len = match len {
            Some(l) => l,
            None if self._feature.dynamic_payloads() => {
                let l = self.get_dynamic_payload_length()?;
                if l > 32 {
                    self.flush_rx()?;
                    return Ok(0);
                }
                l
            }
            None => self._payload_length,
        };
        let buf_len = (buf.len().min(32) as u8).min(payload_len);
        if buf_len == 0 {
            return Ok(0);
        }
        self.spi_read(buf_len, commands::R_RX_PAYLOAD)?;
        buf[..buf_len as usize].copy_from_slice(&self._buf[1..=buf_len as usize]);
        Ok(buf_len)
    }

    fn get_last_arc(&mut self) -> Result<u8, Self::RadioErrorType> {
        Ok(self.observe_tx_raw()?.retries())
    }

    fn observe_tx(&mut self) -> Result<ObserveTx, Self::RadioErrorType> {
        let observed = self.observe_tx_raw()?;
        if observed.lost_packets() == ObserveTx::LOST_PACKETS_SATURATED {
            // writing RF_CH resets PLOS_CNT
            let channel = self.get_channel()?;
            self.set_channel(channel)?;
        }
        Ok(observed)
    }
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub(super) fn observe_tx_raw(&mut self) -> Result<ObserveTx, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, registers::OBSERVE_TX)?;
        Ok(ObserveTx::from_bits(self._buf[1]))
    }
}
