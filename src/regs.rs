/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Register offsets of the sun6i/sun8i CPUCFG and PRCM blocks.
//!
//! Each core owns a 0x40-byte block in CPUCFG and one clamp register in the
//! PRCM; the registers shared between cores sit above all per-core blocks.

use static_assertions::const_assert;

/// Largest core count among the supported SoCs (the A31 has four cores).
pub const MAX_CPUS: usize = 4;

/// Core reset control; write 0 to assert reset, `0b11` to release the core
/// and its debug/cache domain.
pub const fn cpu_rst_ctrl(cpu: usize) -> usize {
    (cpu + 1) * 0x40
}

/// General control; bit N holds core N's L1 cache in reset while clear.
pub const CPUCFG_GEN_CTRL: usize = 0x184;
/// Secondary boot address, shared by all cores (last writer wins).
pub const CPUCFG_PRIVATE0: usize = 0x1a4;
/// Debug control; bit N gates external debug access to core N.
pub const CPUCFG_DBG_CTL1: usize = 0x1e4;

/// Power-off gating, one bit per core.
pub const PRCM_CPU_PWROFF: usize = 0x100;

/// Per-core power clamp register.
pub const fn prcm_pwr_clamp(cpu: usize) -> usize {
    cpu * 4 + 0x140
}

// Shared registers must not fall inside any per-core block.
const_assert!(CPUCFG_GEN_CTRL >= cpu_rst_ctrl(MAX_CPUS));
const_assert!(PRCM_CPU_PWROFF < prcm_pwr_clamp(0));
