/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Secondary CPU bring-up for the Allwinner A31 (sun6i).
//!
//! The richest variant of the family: besides the reset sequencing it ramps
//! the core's power clamp down in steps and gates external debug access while
//! the core is being released.

use axerrno::{ax_err, AxResult};

use crate::mp::{BootEnv, MpContext, RegisterRegion, CLAMP_SETTLE, PWROFF_SETTLE};
use crate::regs::{
    cpu_rst_ctrl, prcm_pwr_clamp, CPUCFG_DBG_CTL1, CPUCFG_GEN_CTRL, CPUCFG_PRIVATE0,
    PRCM_CPU_PWROFF,
};

/// Machine compatible string this method is registered under.
pub const METHOD_COMPATIBLE: &str = "allwinner,sun6i-a31";

const PRCM_COMPATIBLE: &str = "allwinner,sun6i-a31-prcm";
const CPUCFG_COMPATIBLE: &str = "allwinner,sun6i-a31-cpuconfig";

/// Locates and maps the A31 PRCM and CPU config blocks into `ctx`.
///
/// Runs once before any secondary core is started. A lookup or mapping
/// failure is logged and leaves the remaining handle(s) unset; every later
/// [`boot_secondary`] then fails fast. Invoking it again re-resolves the
/// nodes and keeps any handle that is already set.
pub fn prepare_cpus<E: BootEnv>(ctx: &MpContext<E>, env: &E) {
    let Some((base, size)) = env.find_compatible(PRCM_COMPATIBLE) else {
        error!("missing A31 PRCM node in the device tree");
        return;
    };
    let Some(prcm) = env.map_device(base, size) else {
        error!("couldn't map A31 PRCM registers");
        return;
    };
    if !ctx.prcm.is_inited() {
        ctx.prcm.init_once(prcm);
    }

    let Some((base, size)) = env.find_compatible(CPUCFG_COMPATIBLE) else {
        error!("missing A31 CPU config node in the device tree");
        return;
    };
    match env.map_device(base, size) {
        Some(cpucfg) => {
            if !ctx.cpucfg.is_inited() {
                ctx.cpucfg.init_once(cpucfg);
            }
        }
        None => error!("couldn't map A31 CPU config registers"),
    }
}

/// Releases `cpu` from reset so it starts fetching at the secondary entry
/// address.
///
/// The whole sequence runs under the context's bring-up lock: the boot-address
/// and general-control registers are shared between cores. Once the sequence
/// starts it runs to completion; hardware failure is not detected here.
pub fn boot_secondary<E: BootEnv>(ctx: &MpContext<E>, env: &E, cpu: usize) -> AxResult {
    let (Some(prcm), Some(cpucfg)) = (ctx.prcm.get(), ctx.cpucfg.get()) else {
        return ax_err!(BadAddress, "A31 SMP registers are not mapped");
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

    // Disable external debug access while the core is powered up.
    let reg = cpucfg.read32(CPUCFG_DBG_CTL1);
    cpucfg.write32(CPUCFG_DBG_CTL1, reg & !(1 << cpu));

    // Release the power clamp step by step; a single write would let the
    // supply rush in.
    for i in 0..=8 {
        prcm.write32(prcm_pwr_clamp(cpu), 0xff >> i);
    }
    env.settle(CLAMP_SETTLE);

    // Clear the power-off gating.
    let reg = prcm.read32(PRCM_CPU_PWROFF);
    prcm.write32(PRCM_CPU_PWROFF, reg & !(1 << cpu));
    env.settle(PWROFF_SETTLE);

    // De-assert the core and debug/cache domain reset.
    cpucfg.write32(cpu_rst_ctrl(cpu), 0b11);

    // Enable back the external debug accesses.
    let reg = cpucfg.read32(CPUCFG_DBG_CTL1);
    cpucfg.write32(CPUCFG_DBG_CTL1, reg | (1 << cpu));

    Ok(())
}
