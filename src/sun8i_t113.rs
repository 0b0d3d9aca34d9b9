/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Secondary CPU bring-up for the Allwinner T113/R528 (sun8iw20).
//!
//! Newest and still incomplete variant: there is no discovery step, the
//! register windows are hard-coded and remapped on every call, and only CPU 1
//! of the two-core cluster can be started. The sequence stops short of
//! de-asserting the core reset, so for now the target core is left held in
//! reset after this returns.

use axerrno::{ax_err, AxResult};
use memory_addr::PhysAddr;

use crate::mp::{BootEnv, MpContext, RegisterRegion};

/// Machine compatible string this method is registered under.
pub const METHOD_COMPATIBLE: &str = "allwinner,sun8iw20p1";

/// Per-core boot-address windows.
const CPU_EXEC_PADDR: [PhysAddr; 2] = [PhysAddr::from(0x0700_05c4), PhysAddr::from(0x0700_05c8)];
/// Cluster 0 CPUX config block.
const CPUX_CFG_PADDR: PhysAddr = PhysAddr::from(0x0901_0000);
const EXEC_WINDOW_SIZE: usize = 0x10;
/// The config window must reach past [`CTRL_REG0`].
const CPUX_CFG_SIZE: usize = 0x14;

/// Cluster reset control; bits 0/1 release CPU 0/1 from reset.
const RST_CTRL: usize = 0x00;
/// Cluster control register 0; bit N invalidates core N's L1 cache.
const CTRL_REG0: usize = 0x10;

/// Runs the partial bring-up sequence for CPU 1.
///
/// Any other core index is a successful no-op: the cluster has two cores and
/// core 0 is the caller. The windows are remapped on every invocation;
/// nothing is cached in `ctx` besides the entry address and the lock.
pub fn boot_secondary<E: BootEnv>(ctx: &MpContext<E>, env: &E, cpu: usize) -> AxResult {
    let exec = [
        env.map_device(CPU_EXEC_PADDR[0], EXEC_WINDOW_SIZE),
        env.map_device(CPU_EXEC_PADDR[1], EXEC_WINDOW_SIZE),
    ];

    if cpu != 1 {
        return Ok(());
    }

    let Some(exec) = &exec[cpu] else {
        return ax_err!(BadAddress, "couldn't map the CPU exec window");
    };
    let Some(cpucfg) = env.map_device(CPUX_CFG_PADDR, CPUX_CFG_SIZE) else {
        return ax_err!(BadAddress, "couldn't map the CPUX config window");
    };

    debug!(
        "starting CPU {} via exec window {:#x}...",
        cpu,
        CPU_EXEC_PADDR[cpu].as_usize()
    );
    let _guard = ctx.boot_lock.lock();

    // Set the secondary boot address.
    exec.write32(0, ctx.entry().as_usize() as u32);

    // Assert reset on the target core.
    let reg = cpucfg.read32(RST_CTRL);
    cpucfg.write32(RST_CTRL, reg & !(1 << cpu));

    // Invalidate the L1 cache.
    let reg = cpucfg.read32(CTRL_REG0);
    cpucfg.write32(CTRL_REG0, reg & !(1 << cpu));

    // TODO: de-assert the core reset (RST_CTRL bit 1) once the sequence is
    // validated on hardware; until then the core stays held in reset.

    Ok(())
}
