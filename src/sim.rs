//! A simulated set of transceivers sharing the same air.
//!
//! Each chip models the register file, the 3-level FIFOs, auto-ACK with
//! retransmission and the dual-bank register layout closely enough to run the
//! driver end-to-end in unit tests. Transmissions complete instantly on the
//! rising edge of a chip's CE pin.
extern crate std;

use core::convert::Infallible;
use std::{cell::RefCell, collections::VecDeque, rc::Rc, vec, vec::Vec};

use embedded_hal::{
    digital::{ErrorType as PinErrorType, OutputPin},
    spi::{ErrorType as SpiErrorType, Operation, SpiDevice},
};
use embedded_hal_async::digital::Wait;
use embedded_hal_mock::eh1::delay::NoopDelay;

use crate::radio::{rf24::commands, rf24::registers, RF24};

const FIFO_DEPTH: usize = 3;

struct TxEntry {
    data: Vec<u8>,
    no_ack: bool,
    /// `Some(pipe)` for ACK payloads.
    ack_pipe: Option<u8>,
}

struct RxEntry {
    pipe: u8,
    data: Vec<u8>,
}

/// The state of one simulated transceiver.
pub struct Chip {
    regs: [u8; 0x1E],
    tx_addr: [u8; 5],
    rx_addr_p0: [u8; 5],
    rx_addr_p1: [u8; 5],
    events: u8,
    observe_tx: u8,
    ce: bool,
    tx_fifo: VecDeque<TxEntry>,
    rx_fifo: VecDeque<RxEntry>,
    /// Models the RFM7x register bank 1.
    pub dual_bank: bool,
    /// Is register bank 1 selected?
    pub bank: bool,
    /// Every write made to register bank 1 as `(register, bytes)`.
    pub bank1_writes: Vec<(u8, Vec<u8>)>,
    /// The RF_CH register always reads back as 0.
    pub stuck_channel: bool,
    /// R_RX_PL_WID reports an invalid width.
    pub corrupt_width: bool,
    /// Can this chip hear (and be heard by) the others?
    pub reachable: bool,
    /// The number of SPI transactions this chip has seen.
    pub transactions: usize,
}

impl Chip {
    fn new(dual_bank: bool) -> Self {
        let mut regs = [0u8; 0x1E];
        regs[registers::CONFIG as usize] = 0x08;
        regs[registers::EN_AA as usize] = 0x3F;
        regs[registers::EN_RXADDR as usize] = 0x03;
        regs[registers::SETUP_AW as usize] = 0x03;
        regs[registers::SETUP_RETR as usize] = 0x03;
        regs[registers::RF_CH as usize] = 0x02;
        regs[registers::RF_SETUP as usize] = 0x0F;
        regs[0x0C..0x10].copy_from_slice(&[0xC3, 0xC4, 0xC5, 0xC6]);
        Self {
            regs,
            tx_addr: [0xE7; 5],
            rx_addr_p0: [0xE7; 5],
            rx_addr_p1: [0xC2; 5],
            events: 0,
            observe_tx: 0,
            ce: false,
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            dual_bank,
            bank: false,
            bank1_writes: Vec::new(),
            stuck_channel: false,
            corrupt_width: false,
            reachable: true,
            transactions: 0,
        }
    }

    fn reg(&self, reg: u8) -> u8 {
        self.regs[reg as usize]
    }

    fn powered(&self) -> bool {
        self.reg(registers::CONFIG) & 2 != 0
    }

    fn is_rx(&self) -> bool {
        self.reg(registers::CONFIG) & 1 != 0
    }

    fn listening(&self) -> bool {
        self.reachable && self.powered() && self.is_rx() && self.ce
    }

    fn address_width(&self) -> usize {
        self.reg(registers::SETUP_AW) as usize + 2
    }

    fn dynamic_payloads(&self, pipe: u8) -> bool {
        self.reg(registers::FEATURE) & 4 != 0 && self.reg(registers::DYNPD) & (1 << pipe) != 0
    }

    fn status(&self) -> u8 {
        let rx_pipe = self.rx_fifo.front().map(|p| p.pipe).unwrap_or(7);
        ((self.bank as u8) << 7)
            | self.events
            | (rx_pipe << 1)
            | (self.tx_fifo.len() >= FIFO_DEPTH) as u8
    }

    fn fifo_status(&self) -> u8 {
        (((self.tx_fifo.len() >= FIFO_DEPTH) as u8) << 5)
            | ((self.tx_fifo.is_empty() as u8) << 4)
            | (((self.rx_fifo.len() >= FIFO_DEPTH) as u8) << 1)
            | self.rx_fifo.is_empty() as u8
    }

    /// The pipe (if any) that would accept a packet sent to `address`.
    fn matching_pipe(&self, address: &[u8]) -> Option<u8> {
        let width = self.address_width();
        if address.len() != width {
            return None;
        }
        let enabled = self.reg(registers::EN_RXADDR);
        (0..6u8).find(|&pipe| {
            if enabled & (1 << pipe) == 0 {
                return false;
            }
            match pipe {
                0 => self.rx_addr_p0[..width] == *address,
                1 => self.rx_addr_p1[..width] == *address,
                _ => {
                    address[0] == self.reg(registers::RX_ADDR_P0 + pipe)
                        && self.rx_addr_p1[1..width] == address[1..]
                }
            }
        })
    }

    fn push_tx(&mut self, entry: TxEntry) {
        if self.tx_fifo.len() < FIFO_DEPTH {
            self.tx_fifo.push_back(entry);
        }
    }

    fn read_register(&self, reg: u8, out: &mut [u8]) {
        if self.bank {
            out.fill(0);
            return;
        }
        match reg {
            registers::RX_ADDR_P0 | registers::RX_ADDR_P1 | registers::TX_ADDR => {
                let addr = match reg {
                    registers::RX_ADDR_P0 => &self.rx_addr_p0,
                    registers::RX_ADDR_P1 => &self.rx_addr_p1,
                    _ => &self.tx_addr,
                };
                for (i, byte) in out.iter_mut().enumerate() {
                    *byte = addr.get(i).copied().unwrap_or(0);
                }
            }
            _ => {
                let value = match reg {
                    registers::STATUS => self.status(),
                    registers::FIFO_STATUS => self.fifo_status(),
                    registers::OBSERVE_TX => self.observe_tx,
                    registers::RF_CH if self.stuck_channel => 0,
                    r if (r as usize) < self.regs.len() => self.reg(r),
                    _ => 0,
                };
                if let Some(first) = out.first_mut() {
                    *first = value;
                }
            }
        }
    }

    fn write_register(&mut self, reg: u8, data: &[u8]) {
        if self.bank {
            self.bank1_writes.push((reg, data.to_vec()));
            return;
        }
        let Some(&value) = data.first() else {
            return;
        };
        match reg {
            registers::STATUS => self.events &= !(value & 0x70),
            registers::RX_ADDR_P0 | registers::RX_ADDR_P1 | registers::TX_ADDR => {
                let addr = match reg {
                    registers::RX_ADDR_P0 => &mut self.rx_addr_p0,
                    registers::RX_ADDR_P1 => &mut self.rx_addr_p1,
                    _ => &mut self.tx_addr,
                };
                let len = data.len().min(5);
                addr[..len].copy_from_slice(&data[..len]);
            }
            registers::RF_CH => {
                self.regs[reg as usize] = value & 0x7F;
                // writing RF_CH resets PLOS_CNT
                self.observe_tx &= 0x0F;
            }
            r if (r as usize) < self.regs.len() => self.regs[r as usize] = value,
            _ => (),
        }
    }

    /// Execute one SPI transaction. The STATUS byte is clocked out first.
    fn transfer(&mut self, buf: &mut [u8]) {
        self.transactions += 1;
        let Some(&command) = buf.first() else {
            return;
        };
        buf[0] = self.status();
        let data = &mut buf[1..];
        match command {
            c if c < commands::W_REGISTER => self.read_register(c & 0x1F, data),
            c if c < 0x40 => self.write_register(c & 0x1F, data),
            commands::ACTIVATE => {
                if data.first() == Some(&0x53) && self.dual_bank {
                    self.bank = !self.bank;
                }
            }
            commands::R_RX_PL_WID => {
                let width = match self.rx_fifo.front() {
                    Some(_) if self.corrupt_width => 0xFF,
                    Some(p) => p.data.len() as u8,
                    None => 0,
                };
                if let Some(first) = data.first_mut() {
                    *first = width;
                }
            }
            commands::R_RX_PAYLOAD => {
                let payload = self.rx_fifo.pop_front().map(|p| p.data).unwrap_or_default();
                for (i, byte) in data.iter_mut().enumerate() {
                    *byte = payload.get(i).copied().unwrap_or(0);
                }
            }
            commands::W_TX_PAYLOAD | commands::W_TX_PAYLOAD_NO_ACK => self.push_tx(TxEntry {
                data: data.to_vec(),
                no_ack: command == commands::W_TX_PAYLOAD_NO_ACK,
                ack_pipe: None,
            }),
            c if c & 0xF8 == commands::W_ACK_PAYLOAD => self.push_tx(TxEntry {
                data: data.to_vec(),
                no_ack: false,
                ack_pipe: Some(c & 7),
            }),
            commands::FLUSH_TX => self.tx_fifo.clear(),
            commands::FLUSH_RX => self.rx_fifo.clear(),
            _ => (),
        }
    }

    /// Accept a packet on `pipe` if the RX FIFO has room.
    fn accept(&mut self, pipe: u8, data: &[u8]) -> bool {
        if self.rx_fifo.len() >= FIFO_DEPTH {
            return false;
        }
        let data = if self.dynamic_payloads(pipe) {
            data.to_vec()
        } else {
            let mut fixed = vec![0u8; self.reg(registers::RX_PW_P0 + pipe) as usize];
            let len = fixed.len().min(data.len());
            fixed[..len].copy_from_slice(&data[..len]);
            fixed
        };
        self.rx_fifo.push_back(RxEntry { pipe, data });
        self.events |= 0x40;
        true
    }

    /// Take the ACK payload queued for `pipe`.
    fn take_ack_payload(&mut self, pipe: u8) -> Option<Vec<u8>> {
        let index = self.tx_fifo.iter().position(|e| e.ack_pipe == Some(pipe))?;
        self.tx_fifo.remove(index).map(|e| e.data)
    }
}

/// The shared medium connecting all simulated chips.
#[derive(Default)]
pub struct Air {
    pub chips: Vec<Chip>,
}

impl Air {
    /// Send the packet at the top of the chip's TX FIFO.
    fn transmit_from(&mut self, index: usize) {
        let sender = &self.chips[index];
        if !sender.powered() || sender.is_rx() || sender.events & 0x10 != 0 {
            return;
        }
        let Some(front) = sender.tx_fifo.front() else {
            return;
        };
        let width = sender.address_width();
        let address = sender.tx_addr[..width].to_vec();
        let channel = sender.reg(registers::RF_CH);
        let data_rate = sender.reg(registers::RF_SETUP) & 0x28;
        let data = front.data.clone();
        let wants_ack = !(front.no_ack && sender.reg(registers::FEATURE) & 1 != 0)
            && sender.reg(registers::EN_AA) & 1 != 0;
        let reachable = sender.reachable;

        let mut acked = false;
        let mut ack_payload = None;
        for (i, chip) in self.chips.iter_mut().enumerate() {
            if i == index
                || !reachable
                || !chip.listening()
                || chip.reg(registers::RF_CH) != channel
                || chip.reg(registers::RF_SETUP) & 0x28 != data_rate
            {
                continue;
            }
            let Some(pipe) = chip.matching_pipe(&address) else {
                continue;
            };
            // a full RX FIFO drops the packet without acknowledging it
            if chip.accept(pipe, &data) && wants_ack && chip.reg(registers::EN_AA) & (1 << pipe) != 0
            {
                acked = true;
                ack_payload = chip.take_ack_payload(pipe);
            }
        }

        let sender = &mut self.chips[index];
        if !wants_ack || acked {
            sender.tx_fifo.pop_front();
            sender.events |= 0x20;
            sender.observe_tx &= 0xF0;
            if let Some(ack) = ack_payload {
                sender.accept(0, &ack);
            }
        } else {
            let lost = (sender.observe_tx >> 4).saturating_add(1).min(15);
            let retries = sender.reg(registers::SETUP_RETR) & 0x0F;
            sender.observe_tx = (lost << 4) | retries;
            sender.events |= 0x10;
        }
    }
}

pub type SharedAir = Rc<RefCell<Air>>;

/// The SPI bus (with CSN) of one simulated chip.
pub struct SimSpi {
    air: SharedAir,
    index: usize,
}

impl SpiErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut air = self.air.borrow_mut();
        for op in operations.iter_mut() {
            if let Operation::TransferInPlace(buf) = op {
                air.chips[self.index].transfer(buf);
            }
        }
        Ok(())
    }
}

/// The CE pin of one simulated chip.
pub struct SimPin {
    air: SharedAir,
    index: usize,
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.air.borrow_mut().chips[self.index].ce = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut air = self.air.borrow_mut();
        if !air.chips[self.index].ce {
            air.chips[self.index].ce = true;
            air.transmit_from(self.index);
        }
        Ok(())
    }
}

/// The IRQ pin of one simulated chip. It is low while any event is pending.
pub struct SimIrq {
    air: SharedAir,
    index: usize,
}

impl SimIrq {
    fn is_low(&self) -> bool {
        self.air.borrow().chips[self.index].events != 0
    }

    async fn wait_until(&self, low: bool) {
        while self.is_low() != low {
            embassy_futures::yield_now().await;
        }
    }
}

impl PinErrorType for SimIrq {
    type Error = Infallible;
}

impl Wait for SimIrq {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait_until(false).await;
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait_until(true).await;
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_until(true).await;
        self.wait_until(false).await;
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_until(false).await;
        self.wait_until(true).await;
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        let low = self.is_low();
        self.wait_until(!low).await;
        Ok(())
    }
}

pub type SimRadio = RF24<SimSpi, SimPin, NoopDelay>;

/// Add a chip to the `air` and create a driver for it.
pub fn add_radio(air: &SharedAir, dual_bank: bool) -> (SimRadio, SimIrq, usize) {
    let index = {
        let mut air = air.borrow_mut();
        air.chips.push(Chip::new(dual_bank));
        air.chips.len() - 1
    };
    let spi = SimSpi {
        air: air.clone(),
        index,
    };
    let ce_pin = SimPin {
        air: air.clone(),
        index,
    };
    let irq = SimIrq {
        air: air.clone(),
        index,
    };
    (RF24::new(ce_pin, spi, NoopDelay), irq, index)
}

/////////////////////////////////////////////////////////////////////////////////
/// end-to-end tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{add_radio, Air, SharedAir, SimRadio};
    use crate::{
        radio::{prelude::*, Nrf24Error, RadioConfig},
        ChipProfile, FifoState, RadioState, TransmitResult,
    };
    use std::{cell::RefCell, rc::Rc, vec::Vec};

    const TX_NODE: [u8; 5] = *b"1Node";
    const RX_NODE: [u8; 5] = *b"2Node";

    fn link_config(dynamic: bool) -> (RadioConfig, RadioConfig) {
        let tx = RadioConfig::default()
            .with_address(&TX_NODE)
            .with_dynamic_payloads(dynamic);
        let rx = RadioConfig::default()
            .with_address(&RX_NODE)
            .with_rx_address(1, &TX_NODE)
            .with_dynamic_payloads(dynamic);
        (tx, rx)
    }

    /// Two initialized radios: `a` in standby and `b` listening for `a`.
    fn mk_link(dynamic: bool) -> (SharedAir, SimRadio, SimRadio) {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, false);
        let (mut b, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(dynamic);
        a.init(&tx).unwrap();
        b.init(&rx).unwrap();
        b.as_rx().unwrap();
        (air, a, b)
    }

    /// A small xorshift generator for reproducible test data.
    struct Xorshift(u32);

    impl Xorshift {
        fn next(&mut self) -> u32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 17;
            self.0 ^= self.0 << 5;
            self.0
        }
    }

    #[test]
    fn every_payload_length_round_trips() {
        let (_air, mut a, mut b) = mk_link(true);
        let data: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(7) ^ 0xA5).collect();
        for len in 0..=32 {
            assert_eq!(
                a.transmit(&data[..len], false).unwrap(),
                TransmitResult::Success
            );
            let payload = b.receive().unwrap().unwrap();
            assert_eq!(payload.pipe(), 1);
            assert_eq!(payload.len(), len);
            assert_eq!(payload.as_bytes(), &data[..len]);
        }
        assert!(b.receive().unwrap().is_none());
    }

    #[test]
    fn static_payloads_are_padded() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, false);
        let (mut b, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(false);
        a.init(&tx.with_payload_length(8)).unwrap();
        b.init(&rx.with_payload_length(8)).unwrap();
        b.as_rx().unwrap();
        assert_eq!(a.transmit(&[1, 2, 3], false).unwrap(), TransmitResult::Success);
        let payload = b.receive().unwrap().unwrap();
        assert_eq!(payload.as_bytes(), &[1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn fourth_queued_payload_is_rejected() {
        let (_air, mut a, _b) = mk_link(true);
        for _ in 0..3 {
            assert!(a.write(b"queued", false, false).unwrap());
        }
        assert_eq!(a.get_fifo_state(true).unwrap(), FifoState::Full);
        assert!(!a.write(b"queued", false, false).unwrap());
        assert_eq!(
            a.transmit(b"fourth", false).unwrap(),
            TransmitResult::FifoFull
        );
    }

    #[test]
    fn retry_after_max_retries() {
        let (air, mut a, mut b) = mk_link(true);
        air.borrow_mut().chips[1].reachable = false;
        assert_eq!(
            a.transmit(b"hello", false).unwrap(),
            TransmitResult::MaxRetriesExceeded
        );
        // the failed payload was flushed
        assert_eq!(a.get_fifo_state(true).unwrap(), FifoState::Empty);
        assert_eq!(a.get_last_arc().unwrap(), 15);
        assert_eq!(a.observe_tx().unwrap().lost_packets(), 1);
        assert_eq!(a.get_state(), RadioState::Standby);

        air.borrow_mut().chips[1].reachable = true;
        assert_eq!(a.transmit(b"hello", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"hello");
    }

    #[test]
    fn fifty_random_packets() {
        let (_air, mut a, mut b) = mk_link(true);
        let mut rng = Xorshift(0x2545_F491);
        for count in 0..50u8 {
            let len = (rng.next() % 32) as usize + 1;
            let mut data = [0u8; 32];
            data[0] = count;
            for byte in data[1..len].iter_mut() {
                *byte = rng.next() as u8;
            }
            assert_eq!(
                a.transmit(&data[..len], false).unwrap(),
                TransmitResult::Success
            );
            let payload = b.receive().unwrap().unwrap();
            assert_eq!(payload.pipe(), 1);
            assert_eq!(payload.as_bytes(), &data[..len]);
            // exactly one packet per transmission
            assert!(b.receive().unwrap().is_none());
        }
    }

    #[test]
    fn full_receiver_stops_acknowledging() {
        let (_air, mut a, mut b) = mk_link(true);
        for i in 0..6u8 {
            let expected = if i < 3 {
                TransmitResult::Success
            } else {
                TransmitResult::MaxRetriesExceeded
            };
            assert_eq!(a.transmit(&[i; 4], false).unwrap(), expected);
        }
        assert_eq!(b.get_fifo_state(false).unwrap(), FifoState::Full);
        // only the last of the 3 stored packets is returned
        let payload = b.receive().unwrap().unwrap();
        assert_eq!(payload.as_bytes(), &[2; 4]);
        assert_eq!(b.get_fifo_state(false).unwrap(), FifoState::Empty);
    }

    #[test]
    fn no_ack_payloads_are_not_retried() {
        let (air, mut a, _b) = mk_link(true);
        air.borrow_mut().chips[1].reachable = false;
        assert_eq!(a.transmit(b"fire", true).unwrap(), TransmitResult::Success);
    }

    #[test]
    fn stuck_channel_is_corruption() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, index) = add_radio(&air, false);
        air.borrow_mut().chips[index].stuck_channel = true;
        assert_eq!(
            a.init(&RadioConfig::default()),
            Err(Nrf24Error::BinaryCorruption)
        );
        assert_eq!(
            a.transmit(b"nope", false),
            Err(Nrf24Error::PoweredDown)
        );
    }

    #[test]
    fn invalid_config_touches_nothing() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, index) = add_radio(&air, false);
        let config = RadioConfig::default().with_ack_payloads(true);
        assert!(matches!(
            a.init(&config),
            Err(Nrf24Error::InvalidConfig(_))
        ));
        assert_eq!(air.borrow().chips[index].transactions, 0);
    }

    #[test]
    fn dual_bank_calibration() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, index) = add_radio(&air, true);
        let config = RadioConfig::default().with_chip(ChipProfile::DualBankLegacy);
        a.init(&config).unwrap();
        assert_eq!(a.chip(), ChipProfile::DualBankLegacy);

        let air = air.borrow();
        let chip = &air.chips[index];
        assert!(!chip.bank);
        let writes = &chip.bank1_writes;
        assert_eq!(writes.len(), 17);
        assert_eq!(writes[0], (0, [0x40, 0x4B, 0x01, 0xE2].to_vec()));
        assert_eq!(writes[12], (12, [0x00, 0x12, 0x73, 0x00].to_vec()));
        assert_eq!(writes[14].0, 14);
        assert_eq!(writes[14].1.len(), 11);
        assert_eq!(writes[15], (4, [0xDF, 0x96, 0x82, 0x1B].to_vec()));
        assert_eq!(writes[16], (4, [0xD9, 0x96, 0x82, 0x1B].to_vec()));
    }

    #[test]
    fn dual_bank_link() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, true);
        let (mut b, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(true);
        a.init(&tx.with_chip(ChipProfile::DualBankLegacy)).unwrap();
        b.init(&rx).unwrap();
        b.as_rx().unwrap();
        assert_eq!(a.transmit(b"rfm73", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"rfm73");
    }

    #[test]
    fn ack_payload_round_trip() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, false);
        let (mut b, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(true);
        a.init(&tx.with_ack_payloads(true)).unwrap();
        b.init(&rx.with_ack_payloads(true)).unwrap();
        b.as_rx().unwrap();

        assert!(b.write_ack_payload(1, b"pong").unwrap());
        assert_eq!(a.transmit(b"ping", false).unwrap(), TransmitResult::Success);
        let payload = b.receive().unwrap().unwrap();
        assert_eq!((payload.pipe(), payload.as_bytes()), (1, &b"ping"[..]));
        let ack = a.receive().unwrap().unwrap();
        assert_eq!((ack.pipe(), ack.as_bytes()), (0, &b"pong"[..]));
    }

    #[test]
    fn corrupt_width_is_discarded() {
        let (air, mut a, mut b) = mk_link(true);
        air.borrow_mut().chips[1].corrupt_width = true;
        assert_eq!(a.transmit(b"garbled", false).unwrap(), TransmitResult::Success);
        assert!(b.receive().unwrap().is_none());
        assert_eq!(b.get_fifo_state(false).unwrap(), FifoState::Empty);
    }

    #[test]
    fn reconfigure_channel() {
        let (_air, mut a, mut b) = mk_link(true);
        let (tx, _) = link_config(true);
        a.reconfigure_rf(&tx.with_channel(10)).unwrap();
        assert_eq!(a.get_channel().unwrap(), 10);
        assert_eq!(
            a.transmit(b"lost", false).unwrap(),
            TransmitResult::MaxRetriesExceeded
        );
        a.reconfigure_rf(&tx).unwrap();
        assert_eq!(a.transmit(b"found", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"found");
    }

    #[test]
    fn transmit_from_rx_mode() {
        let (_air, mut a, mut b) = mk_link(true);
        a.as_rx().unwrap();
        assert!(a.is_rx());
        assert_eq!(a.transmit(b"switch", false).unwrap(), TransmitResult::Success);
        assert!(!a.is_rx());
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"switch");
    }

    #[test]
    fn write_refused_while_listening() {
        let (_air, mut a, mut b) = mk_link(true);
        assert_eq!(b.write(b"oops", false, true), Err(Nrf24Error::NotAsTx));
        assert_eq!(b.get_state(), RadioState::ActiveReceive);
        // still listening
        assert_eq!(a.transmit(b"hello", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"hello");

        b.as_tx().unwrap();
        assert!(b.write(b"queued", false, false).unwrap());
        assert_eq!(b.get_fifo_state(true).unwrap(), FifoState::Occupied);
    }

    #[test]
    fn sub_address_pipe() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, false);
        let (mut b, _, _) = add_radio(&air, false);
        let (mut c, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(true);
        a.init(&tx).unwrap();
        // pipe 3 shares the 4 upper bytes of pipe 1's address
        b.init(&rx.with_rx_address(3, b"3")).unwrap();
        c.init(
            &RadioConfig::default()
                .with_address(b"3Node")
                .with_dynamic_payloads(true),
        )
        .unwrap();
        b.as_rx().unwrap();

        assert_eq!(c.transmit(b"third", false).unwrap(), TransmitResult::Success);
        let payload = b.receive().unwrap().unwrap();
        assert_eq!(payload.pipe(), 3);
        assert_eq!(payload.as_bytes(), b"third");

        assert_eq!(a.transmit(b"first", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().pipe(), 1);

        let details = b.details().unwrap();
        assert_eq!(details.open_pipes, 0b1011);
        assert_eq!(details.auto_ack, 0b1011);
        let mut address = [0u8; 5];
        assert_eq!(details.pipe_address(3, &mut address), 5);
        assert_eq!(&address, b"3Node");
    }

    #[test]
    fn powered_down_radio_refuses() {
        let (_air, mut a, mut b) = mk_link(true);
        a.power_down().unwrap();
        b.power_down().unwrap();
        assert_eq!(a.get_state(), RadioState::PowerDown);
        assert_eq!(a.transmit(b"zzz", false), Err(Nrf24Error::PoweredDown));
        assert_eq!(b.receive(), Err(Nrf24Error::PoweredDown));

        // power up lands in standby; RX mode must be entered again
        b.as_rx().unwrap();
        a.power_up(None).unwrap();
        assert_eq!(a.transmit(b"awake", false).unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"awake");
    }

    #[test]
    fn transmit_async() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, mut irq, _) = add_radio(&air, false);
        let (mut b, _, _) = add_radio(&air, false);
        let (tx, rx) = link_config(true);
        a.init(&tx).unwrap();
        b.init(&rx).unwrap();
        b.as_rx().unwrap();
        let result = embassy_futures::block_on(a.transmit_async(&mut irq, b"irq", false));
        assert_eq!(result.unwrap(), TransmitResult::Success);
        assert_eq!(b.receive().unwrap().unwrap().as_bytes(), b"irq");

        air.borrow_mut().chips[1].reachable = false;
        let result = embassy_futures::block_on(a.transmit_async(&mut irq, b"irq", false));
        assert_eq!(result.unwrap(), TransmitResult::MaxRetriesExceeded);
    }

    #[test]
    fn receive_async() {
        let air: SharedAir = Rc::new(RefCell::new(Air::default()));
        let (mut a, _, _) = add_radio(&air, false);
        let (mut b, mut irq, _) = add_radio(&air, false);
        let (tx, rx) = link_config(true);
        a.init(&tx).unwrap();
        b.init(&rx).unwrap();
        b.as_rx().unwrap();

        let (received, sent) = embassy_futures::block_on(embassy_futures::join::join(
            b.receive_async(&mut irq),
            async { a.transmit(b"later", false) },
        ));
        assert_eq!(sent.unwrap(), TransmitResult::Success);
        assert_eq!(received.unwrap().as_bytes(), b"later");
    }
}
