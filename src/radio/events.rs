use core::cell::Cell;

use critical_section::Mutex;

use crate::StatusFlags;

/// The radio events observed by the event pump and not yet consumed.
///
/// Flags are only ever raised by
/// [`EsbStatus::pump_events()`](fn@crate::radio::prelude::EsbStatus::pump_events)
/// and only ever cleared by the operation that waits on them. Every access runs inside
/// a [`critical_section`], so a shared reference may be handed to another execution
/// context (an interrupt handler for instance) that only needs to peek at pending events.
///
/// The application (or its HAL) must provide a `critical-section` implementation.
pub struct EventFlags(Mutex<Cell<u8>>);

impl EventFlags {
    /// Create a set of flags with no events pending.
    pub const fn new() -> Self {
        Self(Mutex::new(Cell::new(0)))
    }

    /// Record the IRQ events present in `flags`.
    pub(crate) fn raise(&self, flags: StatusFlags) {
        let raised = flags.into_bits() & StatusFlags::IRQ_MASK;
        self.update(|pending| pending | raised);
    }

    /// Get the pending events without consuming them.
    pub fn peek(&self) -> StatusFlags {
        StatusFlags::from_bits(critical_section::with(|cs| self.0.borrow(cs).get()))
    }

    /// Consume the "RX Data Ready" event. Returns `true` if it was pending.
    pub fn take_rx_dr(&self) -> bool {
        self.take(StatusFlags::default().with_rx_dr(true))
    }

    /// Consume the "TX Data Sent" event. Returns `true` if it was pending.
    pub fn take_tx_ds(&self) -> bool {
        self.take(StatusFlags::default().with_tx_ds(true))
    }

    /// Consume the "TX Data Failed" (max retries) event. Returns `true` if it was pending.
    pub fn take_tx_df(&self) -> bool {
        self.take(StatusFlags::default().with_tx_df(true))
    }

    /// Discard the events present in `flags`.
    pub fn clear(&self, flags: StatusFlags) {
        let mask = flags.into_bits();
        self.update(|pending| pending & !mask);
    }

    fn take(&self, flag: StatusFlags) -> bool {
        let mask = flag.into_bits();
        self.update(|pending| pending & !mask) & mask != 0
    }

    /// Replace the pending byte with `f(pending)`; returns the previous byte.
    fn update(&self, f: impl FnOnce(u8) -> u8) -> u8 {
        critical_section::with(|cs| {
            let cell = self.0.borrow(cs);
            let prev = cell.get();
            cell.set(f(prev));
            prev
        })
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EventFlags")
            .field(&self.peek().into_bits())
            .finish()
    }
}
