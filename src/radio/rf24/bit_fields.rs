use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, PaLevel};

#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// The IRQ masks for `RX_DR`, `TX_DS` and `MAX_RT`.
    ///
    /// These stay cleared so every event asserts the IRQ pin.
    #[bits(3)]
    _irq_mask: u8,

    #[bits(2, access = None, default = 3)]
    pub crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }

    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | 1)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !1)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 5)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    /// `CONT_WAVE` and a reserved bit; preserved on writes.
    #[bits(2)]
    _padding: u8,

    #[bits(3, access = None)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1, default = true)]
    pub lna_enable: bool,
}

impl RfSetup {
    /// The bits of RF_SETUP owned by this driver.
    pub const REG_MASK: u8 = DataRate::MASK | PaLevel::MASK | 1;

    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }

    /// Merge the driver-owned bits into a value read from the RF_SETUP register.
    pub const fn merge_into(&self, current: u8) -> u8 {
        current & !Self::REG_MASK | (self.into_bits() & Self::REG_MASK)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(5)]
    _padding: u8,

    /// `EN_DPL`
    pub dynamic_payloads: bool,

    /// `EN_ACK_PAY`
    pub ack_payloads: bool,

    /// `EN_DYN_ACK`
    pub ask_no_ack: bool,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct FifoStatus {
    /// `TX_REUSE` is not used by this driver.
    #[bits(2)]
    _padding: u8,

    pub tx_full: bool,

    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    pub rx_full: bool,

    pub rx_empty: bool,
}

/// The transmit observation counters from the OBSERVE_TX register.
///
/// Use [`EsbRadio::observe_tx()`](fn@crate::radio::prelude::EsbRadio::observe_tx)
/// to fetch this.
#[bitfield(u8, order = Msb)]
pub struct ObserveTx {
    /// The number of packets lost on the current channel.
    ///
    /// This counter saturates at 15 and is reset by writing the RF_CH register.
    #[bits(4, access = RO)]
    pub lost_packets: u8,

    /// The number of retransmissions made for the last payload.
    #[bits(4, access = RO)]
    pub retries: u8,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for ObserveTx {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ObserveTx lost_packets: {}, retries: {}",
            self.lost_packets(),
            self.retries()
        )
    }
}

impl ObserveTx {
    /// The value at which [`ObserveTx::lost_packets()`] stops counting.
    pub const LOST_PACKETS_SATURATED: u8 = 15;
}
