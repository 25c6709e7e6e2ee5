use embedded_hal::{delay::DelayNs, digital::Error, digital::OutputPin, spi::SpiDevice};
use embedded_hal_async::digital::Wait;

use super::{Nrf24Error, RF24};
use crate::{
    radio::prelude::{EsbRadio, EsbStatus},
    Payload, TransmitResult,
};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Like [`EsbRadio::transmit()`], but suspends on the radio's IRQ pin
    /// (active low) instead of polling the STATUS register.
    ///
    /// The IRQ pin is released by the event pump, so the `irq` line must not be
    /// serviced by anything else while this future is pending.
    pub async fn transmit_async<IRQ: Wait>(
        &mut self,
        irq: &mut IRQ,
        buf: &[u8],
        ask_no_ack: bool,
    ) -> Result<TransmitResult, Nrf24Error<SPI::Error, DO::Error>> {
        if !self.begin_transmit(buf, ask_no_ack)? {
            return Ok(TransmitResult::FifoFull);
        }
        loop {
            irq.wait_for_low()
                .await
                .map_err(|e| Nrf24Error::Gpi(e.kind()))?;
            self.pump_events()?;
            if let Some(result) = self.take_transmit_outcome() {
                return Ok(result);
            }
        }
    }

    /// Wait on the radio's IRQ pin until a payload is received.
    ///
    /// The radio should already be in RX mode (see [`EsbRadio::as_rx()`]),
    /// otherwise this never completes.
    pub async fn receive_async<IRQ: Wait>(
        &mut self,
        irq: &mut IRQ,
    ) -> Result<Payload, Nrf24Error<SPI::Error, DO::Error>> {
        loop {
            if let Some(payload) = self.receive()? {
                return Ok(payload);
            }
            irq.wait_for_low()
                .await
                .map_err(|e| Nrf24Error::Gpi(e.kind()))?;
        }
    }
}
