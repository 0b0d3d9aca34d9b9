/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Mock bring-up environment shared by the driver tests.
//!
//! Records every register write and settle delay in one ordered event log, so
//! tests can check both the content and the interleaving of the sequences.

use core::time::Duration;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use memory_addr::PhysAddr;

use crate::mp::{BootEnv, RegisterRegion};

/// Physical secondary entry address handed to the mock contexts.
pub const ENTRY: usize = 0x4020_0000;

/// A31/A23 PRCM window.
pub const PRCM_PADDR: usize = 0x01f0_1400;
/// A31/A23 CPU config window.
pub const CPUCFG_PADDR: usize = 0x01f0_1c00;
/// A window the mock refuses to map, for mapping-failure tests.
pub const UNMAPPABLE_PADDR: usize = 0x0bad_0000;

/// Hardware block a mock access lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Block {
    Prcm,
    CpuCfg,
    Exec0,
    Exec1,
}

/// One recorded register write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Write {
    pub block: Block,
    pub offset: usize,
    pub value: u32,
}

/// One recorded driver action, in global order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Write(Write),
    Settle(Duration),
}

#[derive(Default)]
struct RegSpace {
    cells: BTreeMap<(Block, usize), u32>,
    events: Vec<Event>,
}

/// The mock kernel environment.
pub struct MockEnv {
    space: Arc<Mutex<RegSpace>>,
    nodes: Vec<(&'static str, usize, usize)>,
    map_calls: AtomicUsize,
}

impl MockEnv {
    /// An environment whose device tree holds the given
    /// `(compatible, base, size)` nodes.
    pub fn new(nodes: &[(&'static str, usize, usize)]) -> Self {
        Self {
            space: Arc::default(),
            nodes: nodes.to_vec(),
            map_calls: AtomicUsize::new(0),
        }
    }

    /// All recorded events, in order.
    pub fn events(&self) -> Vec<Event> {
        self.space.lock().unwrap().events.clone()
    }

    /// The recorded register writes, in order.
    pub fn writes(&self) -> Vec<Write> {
        self.events()
            .into_iter()
            .filter_map(|ev| match ev {
                Event::Write(w) => Some(w),
                Event::Settle(_) => None,
            })
            .collect()
    }

    /// The recorded settle delays, in order.
    pub fn settles(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|ev| match ev {
                Event::Settle(d) => Some(d),
                Event::Write(_) => None,
            })
            .collect()
    }

    /// How many times `map_device` was invoked (successfully or not).
    pub fn map_calls(&self) -> usize {
        self.map_calls.load(Ordering::Relaxed)
    }
}

fn block_for(base: PhysAddr) -> Option<Block> {
    match base.as_usize() {
        PRCM_PADDR => Some(Block::Prcm),
        CPUCFG_PADDR => Some(Block::CpuCfg),
        0x0700_05c4 => Some(Block::Exec0),
        0x0700_05c8 => Some(Block::Exec1),
        0x0901_0000 => Some(Block::CpuCfg),
        _ => None,
    }
}

impl BootEnv for MockEnv {
    type Region = MockRegion;

    fn find_compatible(&self, compatible: &str) -> Option<(PhysAddr, usize)> {
        self.nodes
            .iter()
            .find(|(c, _, _)| *c == compatible)
            .map(|&(_, base, size)| (PhysAddr::from(base), size))
    }

    fn map_device(&self, base: PhysAddr, size: usize) -> Option<MockRegion> {
        self.map_calls.fetch_add(1, Ordering::Relaxed);
        Some(MockRegion {
            block: block_for(base)?,
            size,
            space: self.space.clone(),
        })
    }

    fn settle(&self, duration: Duration) {
        self.space
            .lock()
            .unwrap()
            .events
            .push(Event::Settle(duration));
    }
}

/// A mapped window of the mock register space.
///
/// Unwritten registers read back as all-ones so bit-clearing sequences are
/// observable; written values read back as written. The window is exactly as
/// large as the `map_device` call asked for, and accesses past its end panic.
pub struct MockRegion {
    block: Block,
    size: usize,
    space: Arc<Mutex<RegSpace>>,
}

impl MockRegion {
    fn check(&self, offset: usize) {
        assert!(
            offset + 4 <= self.size,
            "access at {:#x} is outside the {:?} window of {:#x} bytes",
            offset,
            self.block,
            self.size
        );
    }
}

impl RegisterRegion for MockRegion {
    fn read32(&self, offset: usize) -> u32 {
        self.check(offset);
        self.space
            .lock()
            .unwrap()
            .cells
            .get(&(self.block, offset))
            .copied()
            .unwrap_or(!0)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.check(offset);
        let mut space = self.space.lock().unwrap();
        space.cells.insert((self.block, offset), value);
        space.events.push(Event::Write(Write {
            block: self.block,
            offset,
            value,
        }));
    }
}

/// An environment with both A31 nodes present.
pub fn a31_env() -> MockEnv {
    MockEnv::new(&[
        ("allwinner,sun6i-a31-prcm", PRCM_PADDR, 0x200),
        ("allwinner,sun6i-a31-cpuconfig", CPUCFG_PADDR, 0x300),
    ])
}

/// An environment with both A23 nodes present.
pub fn a23_env() -> MockEnv {
    MockEnv::new(&[
        ("allwinner,sun8i-a23-prcm", PRCM_PADDR, 0x200),
        ("allwinner,sun8i-a23-cpuconfig", CPUCFG_PADDR, 0x300),
    ])
}

/// An environment with no device-tree nodes, as used by the T113 method.
pub fn t113_env() -> MockEnv {
    MockEnv::new(&[])
}
