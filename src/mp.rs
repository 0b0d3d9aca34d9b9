/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Bring-up context and the services it borrows from the kernel.

use core::time::Duration;

use lazyinit::LazyInit;
use memory_addr::PhysAddr;
use spin::Mutex;

/// Settle time after the power clamp ramp, for supply stabilization.
pub const CLAMP_SETTLE: Duration = Duration::from_millis(10);
/// Settle time after clearing a core's power-off gating bit.
pub const PWROFF_SETTLE: Duration = Duration::from_millis(1);

/// 32-bit access into one mapped register window.
///
/// Offsets are in bytes from the window base. The real implementation is
/// [`MmioRegion`](crate::mmio::MmioRegion); tests substitute a recording mock.
pub trait RegisterRegion: Send + Sync {
    /// Reads the register at `offset`.
    fn read32(&self, offset: usize) -> u32;
    /// Writes the register at `offset`.
    fn write32(&self, offset: usize, value: u32);
}

/// Services the surrounding kernel provides to the bring-up driver.
pub trait BootEnv {
    /// The mapped-window handle type produced by [`map_device`](Self::map_device).
    type Region: RegisterRegion;

    /// Finds a device-tree node by its compatible string and returns its first
    /// `reg` window as `(base, size)`.
    fn find_compatible(&self, compatible: &str) -> Option<(PhysAddr, usize)>;

    /// Maps a device register window and returns an addressable handle, or
    /// [`None`] if the window cannot be mapped.
    fn map_device(&self, base: PhysAddr, size: usize) -> Option<Self::Region>;

    /// Busy-waits for a fixed hardware settle time.
    ///
    /// The durations are part of the boot protocol, not a tunable; the wait
    /// blocks the calling core and cannot be cancelled.
    fn settle(&self, duration: Duration);
}

/// Shared state of one SoC's secondary-core bring-up.
///
/// Holds the two register-block handles populated by discovery and the single
/// lock that serializes every bring-up sequence. The handles are written once
/// and read-only afterwards; the boot-address and general-control registers
/// are shared between cores, so concurrent sequences would corrupt each other
/// without the lock.
pub struct MpContext<E: BootEnv> {
    /// Power/reset management block, set by discovery.
    pub(crate) prcm: LazyInit<E::Region>,
    /// Per-core configuration block, set by discovery.
    pub(crate) cpucfg: LazyInit<E::Region>,
    /// Serializes all bring-up sequences, across every core index.
    pub(crate) boot_lock: Mutex<()>,
    entry: PhysAddr,
}

impl<E: BootEnv> MpContext<E> {
    /// Creates an empty context.
    ///
    /// `entry` is the physical address secondary cores start fetching from,
    /// resolved by the kernel from its secondary entry symbol.
    pub const fn new(entry: PhysAddr) -> Self {
        Self {
            prcm: LazyInit::new(),
            cpucfg: LazyInit::new(),
            boot_lock: Mutex::new(()),
            entry,
        }
    }

    /// The physical secondary entry address.
    pub fn entry(&self) -> PhysAddr {
        self.entry
    }

    /// Whether discovery has mapped both register blocks.
    pub fn is_prepared(&self) -> bool {
        self.prcm.is_inited() && self.cpucfg.is_inited()
    }
}
