/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Volatile access to a mapped device register window.

use crate::mp::RegisterRegion;

/// A device register window mapped into the kernel address space.
///
/// The kernel's [`BootEnv`](crate::mp::BootEnv) implementation typically
/// builds one from `phys_to_virt` and keeps the mapping alive for as long as
/// the region is used.
pub struct MmioRegion {
    base: *mut u32,
}

impl MmioRegion {
    /// Wraps a mapped window.
    ///
    /// # Safety
    ///
    /// `base` must point to a device register window mapped uncached, large
    /// enough for every offset accessed through the region, and stay mapped
    /// for the region's lifetime.
    pub const unsafe fn new(base: *mut u8) -> Self {
        Self {
            base: base as *mut u32,
        }
    }
}

// One region per hardware block; register sequences through it are serialized
// by the bring-up lock.
unsafe impl Send for MmioRegion {}
unsafe impl Sync for MmioRegion {}

impl RegisterRegion for MmioRegion {
    fn read32(&self, offset: usize) -> u32 {
        unsafe { self.base.byte_add(offset).read_volatile() }
    }

    fn write32(&self, offset: usize, value: u32) {
        unsafe { self.base.byte_add(offset).write_volatile(value) }
    }
}
