//! This module defines types used by various traits.
//! These types are meant to be agnostic of the trait implementation.

use core::{
    fmt::{Display, Formatter, Result},
    write, writeln,
};

use bitfield_struct::bitfield;

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// | nRF24L01 | RFM73 |
    /// | :-------:|:-----:|
    /// | -18 dBm | -10 dBm |
    Min,
    /// | nRF24L01 | RFM73 |
    /// | :-------:|:-----:|
    /// | -12 dBm | -5 dBm |
    Low,
    /// | nRF24L01 | RFM73 |
    /// | :-------:|:-----:|
    /// | -6 dBm | 0 dBm |
    High,
    /// | nRF24L01 | RFM73 |
    /// | :-------:|:-----:|
    /// | 0 dBm | 5 dBm |
    Max,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "Min"),
            PaLevel::Low => defmt::write!(fmt, "Low"),
            PaLevel::High => defmt::write!(fmt, "High"),
            PaLevel::Max => defmt::write!(fmt, "Max"),
        }
    }
}

impl PaLevel {
    pub(crate) const MASK: u8 = 6;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The length of the CRC checksum appended to every packet.
///
/// The hardware refuses to run auto-ack without a CRC, so there is no
/// "disabled" option.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrcLength {
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Bit8 => 8,
            CrcLength::Bit16 => 12,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            8 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrcLength::Bit8 => defmt::write!(fmt, "8 bit"),
            CrcLength::Bit16 => defmt::write!(fmt, "16 bit"),
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// The possible states of a FIFO.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FifoState {
    /// Represent the state of a FIFO when it is full.
    Full,
    /// Represent the state of a FIFO when it is empty.
    Empty,
    /// Represent the state of a FIFO when it is not full but not empty either.
    Occupied,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for FifoState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FifoState::Empty => defmt::write!(fmt, "Empty"),
            FifoState::Full => defmt::write!(fmt, "Full"),
            FifoState::Occupied => defmt::write!(fmt, "Occupied"),
        }
    }
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FifoState::Empty => write!(f, "Empty"),
            FifoState::Full => write!(f, "Full"),
            FifoState::Occupied => write!(f, "Occupied"),
        }
    }
}

/// The family member being driven.
///
/// This decides whether the second register bank exists and needs its
/// calibration table written during [`init()`](fn@crate::radio::prelude::EsbInit::init).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ChipProfile {
    /// nRF24L01(+) and compatible single-bank chips.
    #[default]
    Standard,
    /// RFM70/RFM73/RFM75 modules with an analog tuning register bank.
    DualBankLegacy,
}

impl ChipProfile {
    /// The settling time (in microseconds) required between applying power
    /// to the chip and the first register write.
    pub(crate) const fn power_on_delay(self) -> u32 {
        match self {
            ChipProfile::Standard => 5000,
            ChipProfile::DualBankLegacy => 50000,
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for ChipProfile {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ChipProfile::Standard => defmt::write!(fmt, "nRF24L01"),
            ChipProfile::DualBankLegacy => defmt::write!(fmt, "RFM7x"),
        }
    }
}

impl Display for ChipProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ChipProfile::Standard => write!(f, "nRF24L01"),
            ChipProfile::DualBankLegacy => write!(f, "RFM7x"),
        }
    }
}

/// The operating state of the radio as tracked by the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadioState {
    /// `PWR_UP` is cleared. Registers are retained but nothing is clocked.
    PowerDown,
    /// Powered up with CE low (aka Standby-I) and `PRIM_RX` cleared.
    Standby,
    /// A payload is being clocked out (CE is pulsed high).
    ActiveTransmit,
    /// Listening with CE held high and `PRIM_RX` set.
    ActiveReceive,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for RadioState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RadioState::PowerDown => defmt::write!(fmt, "PowerDown"),
            RadioState::Standby => defmt::write!(fmt, "Standby"),
            RadioState::ActiveTransmit => defmt::write!(fmt, "ActiveTransmit"),
            RadioState::ActiveReceive => defmt::write!(fmt, "ActiveReceive"),
        }
    }
}

impl Display for RadioState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RadioState::PowerDown => write!(f, "PowerDown"),
            RadioState::Standby => write!(f, "Standby"),
            RadioState::ActiveTransmit => write!(f, "ActiveTransmit"),
            RadioState::ActiveReceive => write!(f, "ActiveReceive"),
        }
    }
}

/// The outcome of [`EsbRadio::transmit()`](fn@crate::radio::prelude::EsbRadio::transmit).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransmitResult {
    /// The payload was sent (and acknowledged, if an ACK was requested).
    Success,
    /// The receiver never acknowledged the payload within the configured retries.
    ///
    /// The TX FIFO has been flushed.
    MaxRetriesExceeded,
    /// The TX FIFO already held 3 payloads. Nothing was sent.
    FifoFull,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for TransmitResult {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransmitResult::Success => defmt::write!(fmt, "Success"),
            TransmitResult::MaxRetriesExceeded => defmt::write!(fmt, "MaxRetriesExceeded"),
            TransmitResult::FifoFull => defmt::write!(fmt, "FifoFull"),
        }
    }
}

impl Display for TransmitResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TransmitResult::Success => write!(f, "Success"),
            TransmitResult::MaxRetriesExceeded => write!(f, "MaxRetriesExceeded"),
            TransmitResult::FifoFull => write!(f, "FifoFull"),
        }
    }
}

/// A received packet along with the pipe it arrived on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Payload {
    pipe: u8,
    len: u8,
    buf: [u8; 32],
}

impl Payload {
    pub(crate) fn new(pipe: u8, data: &[u8]) -> Self {
        let len = data.len().min(32);
        let mut buf = [0u8; 32];
        buf[..len].copy_from_slice(&data[..len]);
        Self {
            pipe,
            len: len as u8,
            buf,
        }
    }

    /// The pipe number (0 - 5) that received this packet.
    pub const fn pipe(&self) -> u8 {
        self.pipe
    }

    /// The number of bytes in this packet.
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Is this a zero-length packet?
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packet's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for Payload {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Payload pipe: {}, bytes: {=[u8]}", self.pipe, self.as_bytes())
    }
}

/// A struct used to describe the STATUS byte, which the radio clocks out
/// at the start of every SPI transaction.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use rf24_link::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all event flags set to true.
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    /// The active register bank (only meaningful on dual-bank chips).
    #[bits(1, access = RO)]
    pub bank: bool,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if TX Data Failed.
    #[bits(1, access = RO)]
    pub tx_df: bool,

    /// The pipe number of the payload at the top of the RX FIFO.
    ///
    /// A value of 7 means the RX FIFO is empty.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    /// Is the TX FIFO full?
    #[bits(1, access = RO)]
    pub tx_full: bool,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all event fields are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// Does this hold any of the 3 IRQ events?
    pub const fn any(&self) -> bool {
        self.into_bits() & Self::IRQ_MASK != 0
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::RX_DR_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::RX_DR_OFFSET))
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DS_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DS_OFFSET))
    }

    /// A flag to describe if TX Data Failed.
    pub fn with_tx_df(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DF_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DF_OFFSET))
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

/// A snapshot of the radio's configuration and state, as read back from its registers.
///
/// Fetched with [`EsbDetails::details()`](fn@crate::radio::prelude::EsbDetails::details).
/// The [`Display`] output is what
/// [`EsbDetails::print_details()`](fn@crate::radio::prelude::EsbDetails::print_details) prints.
#[derive(Clone, Copy, Debug)]
pub struct RadioDetails {
    pub chip: ChipProfile,
    /// The register bank reported in the STATUS byte (`false` is bank 0).
    pub bank: bool,
    pub state: RadioState,
    pub powered: bool,
    pub is_rx: bool,
    pub channel: u8,
    pub data_rate: DataRate,
    pub pa_level: PaLevel,
    pub lna_enabled: bool,
    pub crc_length: CrcLength,
    /// Address width in bytes.
    pub address_length: u8,
    /// The static payload length of pipe 0.
    pub payload_length: u8,
    pub dynamic_payloads: bool,
    pub ack_payloads: bool,
    /// The auto-retry delay in microseconds, as programmed after rounding up
    /// to the minimum safe delay.
    pub retry_delay: u16,
    pub retry_count: u8,
    pub lost_packets: u8,
    pub last_retries: u8,
    /// Events observed by the event pump and not yet consumed.
    pub pending: StatusFlags,
    pub tx_fifo: FifoState,
    pub rx_fifo: FifoState,
    /// EN_AA, one bit per pipe.
    pub auto_ack: u8,
    /// EN_RXADDR, one bit per pipe.
    pub open_pipes: u8,
    pub tx_address: [u8; 5],
    /// Full addresses of pipes 0 and 1.
    pub rx_addresses: [[u8; 5]; 2],
    /// The LSBytes of pipes 2 - 5; the other bytes are shared with pipe 1.
    pub sub_addresses: [u8; 4],
}

impl RadioDetails {
    /// The full address of a `pipe` (0 - 5), truncated to the configured width.
    ///
    /// Returns the number of bytes written to `address`.
    pub fn pipe_address(&self, pipe: u8, address: &mut [u8; 5]) -> usize {
        match pipe {
            0 | 1 => *address = self.rx_addresses[pipe as usize],
            2..=5 => {
                *address = self.rx_addresses[1];
                address[0] = self.sub_addresses[pipe as usize - 2];
            }
            _ => return 0,
        }
        self.address_length.min(5) as usize
    }
}

impl Display for RadioDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let width = self.address_length.min(5) as usize;
        writeln!(f, "Chip profile........ {} (bank {})", self.chip, self.bank as u8)?;
        writeln!(
            f,
            "State............... {} (powered: {}, PRIM_RX: {})",
            self.state, self.powered, self.is_rx
        )?;
        writeln!(
            f,
            "Channel............. {} ({} MHz)",
            self.channel,
            2400 + self.channel as u16
        )?;
        writeln!(
            f,
            "RF setup............ {}, PA {}, LNA {}",
            self.data_rate, self.pa_level, self.lna_enabled
        )?;
        writeln!(f, "CRC length.......... {}", self.crc_length)?;
        if self.dynamic_payloads {
            writeln!(
                f,
                "Payloads............ dynamic (ACK payloads: {})",
                self.ack_payloads
            )?;
        } else {
            writeln!(f, "Payloads............ static, {} bytes", self.payload_length)?;
        }
        writeln!(
            f,
            "Auto-retry.......... {} x {} us",
            self.retry_count, self.retry_delay
        )?;
        writeln!(
            f,
            "Observed............ {} lost, {} retries",
            self.lost_packets, self.last_retries
        )?;
        writeln!(
            f,
            "Pending events...... rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.pending.rx_dr(),
            self.pending.tx_ds(),
            self.pending.tx_df()
        )?;
        writeln!(f, "FIFOs............... TX {}, RX {}", self.tx_fifo, self.rx_fifo)?;
        write!(f, "TX address.......... ")?;
        for byte in &self.tx_address[..width] {
            write!(f, "{byte:02X}")?;
        }
        for pipe in 0..6u8 {
            let mut address = [0u8; 5];
            let len = self.pipe_address(pipe, &mut address);
            let open = self.open_pipes & (1 << pipe) != 0;
            write!(
                f,
                "\nPipe {pipe}.............. {} ",
                if open { "open  " } else { "closed" }
            )?;
            for byte in &address[..len] {
                write!(f, "{byte:02X}")?;
            }
            if open {
                write!(f, " auto-ack: {}", self.auto_ack & (1 << pipe) != 0)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for RadioDetails {
    fn format(&self, fmt: defmt::Formatter) {
        let width = self.address_length.min(5) as usize;
        defmt::write!(
            fmt,
            "{} bank {=u8}, {} powered: {=bool}, PRIM_RX: {=bool}\n\
             channel {=u8}, {}, PA {}, LNA {=bool}, CRC {}\n\
             dynamic payloads: {=bool}, ACK payloads: {=bool}, static length {=u8}\n\
             auto-retry {=u8} x {=u16} us, observed {=u8} lost, {=u8} retries\n\
             pending {}, TX FIFO {}, RX FIFO {}\n\
             TX address {=[u8]:X}, pipe 0 {=[u8]:X}, pipe 1 {=[u8]:X}, pipes 2-5 LSB {=[u8]:X}\n\
             open pipes 0b{=0..6}, auto-ack 0b{=0..6}",
            self.chip,
            self.bank as u8,
            self.state,
            self.powered,
            self.is_rx,
            self.channel,
            self.data_rate,
            self.pa_level,
            self.lna_enabled,
            self.crc_length,
            self.dynamic_payloads,
            self.ack_payloads,
            self.payload_length,
            self.retry_count,
            self.retry_delay,
            self.lost_packets,
            self.last_retries,
            self.pending,
            self.tx_fifo,
            self.rx_fifo,
            &self.tx_address[..width],
            &self.rx_addresses[0][..width],
            &self.rx_addresses[1][..width],
            &self.sub_addresses[..],
            self.open_pipes,
            self.auto_ack,
        )
    }
}
