/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Secondary CPU bring-up for the Allwinner A23 (sun8i).
//!
//! Same contract as [`sun6i`](crate::sun6i), but the SoC needs neither the
//! power clamp ramp nor the debug gating, so the sequence ends at the reset
//! de-assert.

use axerrno::{ax_err, AxResult};

use crate::mp::{BootEnv, MpContext, RegisterRegion, PWROFF_SETTLE};
use crate::regs::{cpu_rst_ctrl, CPUCFG_GEN_CTRL, CPUCFG_PRIVATE0, PRCM_CPU_PWROFF};

/// Machine compatible string this method is registered under.
pub const METHOD_COMPATIBLE: &str = "allwinner,sun8i-a23";

const PRCM_COMPATIBLE: &str = "allwinner,sun8i-a23-prcm";
const CPUCFG_COMPATIBLE: &str = "allwinner,sun8i-a23-cpuconfig";

/// Locates and maps the A23 PRCM and CPU config blocks into `ctx`.
///
/// Same discovery contract as [`sun6i::prepare_cpus`](crate::sun6i::prepare_cpus).
pub fn prepare_cpus<E: BootEnv>(ctx: &MpContext<E>, env: &E) {
    let Some((base, size)) = env.find_compatible(PRCM_COMPATIBLE) else {
        error!("missing A23 PRCM node in the device tree");
        return;
    };
    let Some(prcm) = env.map_device(base, size) else {
        error!("couldn't map A23 PRCM registers");
        return;
    };
    if !ctx.prcm.is_inited() {
        ctx.prcm.init_once(prcm);
    }

    let Some((base, size)) = env.find_compatible(CPUCFG_COMPATIBLE) else {
        error!("missing A23 CPU config node in the device tree");
        return;
    };
    match env.map_device(base, size) {
        Some(cpucfg) => {
            if !ctx.cpucfg.is_inited() {
                ctx.cpucfg.init_once(cpucfg);
            }
        }
        None => error!("couldn't map A23 CPU config registers"),
    }
}

/// Releases `cpu` from reset so it starts fetching at the secondary entry
/// address.
pub fn boot_secondary<E: BootEnv>(ctx: &MpContext<E>, env: &E, cpu: usize) -> AxResult {
    let (Some(prcm), Some(cpucfg)) = (ctx.prcm.get(), ctx.cpucfg.get()) else {
        return ax_err!(BadAddress, "A23 SMP registers are not mapped");
    };

    debug!("starting CPU {}...", cpu);
    let _guard = ctx.boot_lock.lock();

    // Set the secondary boot address.
    cpucfg.write32(CPUCFG_PRIVATE0, ctx.entry().as_usize() as u32);

    // Assert the CPU core in reset.
    cpucfg.write32(cpu_rst_ctrl(cpu), 0);

    // Assert the L1 cache in reset.
    let reg = cpucfg.read32(CPUCFG_GEN_CTRL);
    cpucfg.write32(CPUCFG_GEN_CTRL, reg & !(1 << cpu));

    // Clear the power-off gating.
    let reg = prcm.read32(PRCM_CPU_PWROFF);
    prcm.write32(PRCM_CPU_PWROFF, reg & !(1 << cpu));
    env.settle(PWROFF_SETTLE);

    // De-assert the core and debug/cache domain reset; nothing follows it.
    cpucfg.write32(cpu_rst_ctrl(cpu), 0b11);

    Ok(())
}
