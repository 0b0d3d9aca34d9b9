/* Copyright (c) [2023] [Syswonder Community]
 *   [Ruxos] is licensed under Mulan PSL v2.
 *   You can use this software according to the terms and conditions of the Mulan PSL v2.
 *   You may obtain a copy of Mulan PSL v2 at:
 *               http://license.coscl.org.cn/MulanPSL2
 *   THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 *   See the Mulan PSL v2 for more details.
 */

//! Secondary CPU bring-up for Allwinner sunxi SoCs.
//!
//! The sunxi family does not start its secondary cores through PSCI; the
//! primary core walks a vendor boot protocol over two register blocks (the
//! PRCM power/reset management block and the per-core CPUCFG block) to release
//! a held-in-reset core so it starts fetching at a fixed physical address.
//!
//! Supported boot methods (keyed by the machine compatible string):
//!
//! - `allwinner,sun6i-a31` — A31: full sequence with the power clamp ramp.
//! - `allwinner,sun8i-a23` — A23: reduced sequence, no clamp ramp and no
//!   debug gating.
//! - `allwinner,sun8iw20p1` — T113/R528: hard-coded register windows, can only
//!   start CPU 1 and currently leaves it held in reset (see [`sun8i_t113`]).
//!
//! The surrounding kernel supplies its services through a [`BootEnv`]:
//! device-tree lookup, device memory mapping and the fixed hardware settle
//! delays. All bring-up state (the two mapped blocks and the single bring-up
//! lock) lives in an explicitly constructed [`MpContext`], so discovery before
//! bring-up is a visible dependency rather than hidden ordering.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

pub mod fdt;
pub mod mmio;
pub mod mp;
pub mod regs;
pub mod sun6i;
pub mod sun8i;
pub mod sun8i_t113;

#[cfg(test)]
pub(crate) mod testing;

use axerrno::AxResult;

pub use mmio::MmioRegion;
pub use mp::{BootEnv, MpContext, RegisterRegion};

/// A (prepare-cpus, boot-secondary) operation pair registered under a fixed
/// machine compatible string.
///
/// The platform layer resolves the method once from the root `compatible`
/// property, calls [`prepare_cpus`](Self::prepare_cpus) early, and then
/// [`boot_secondary`](Self::boot_secondary) once per core it wants online.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootMethod {
    /// Allwinner A31 (`allwinner,sun6i-a31`).
    Sun6i,
    /// Allwinner A23 (`allwinner,sun8i-a23`).
    Sun8i,
    /// Allwinner T113/R528 (`allwinner,sun8iw20p1`).
    Sun8iT113,
}

impl BootMethod {
    /// Looks up the boot method registered for a machine compatible string.
    pub fn from_compatible(compatible: &str) -> Option<Self> {
        match compatible {
            sun6i::METHOD_COMPATIBLE => Some(Self::Sun6i),
            sun8i::METHOD_COMPATIBLE => Some(Self::Sun8i),
            sun8i_t113::METHOD_COMPATIBLE => Some(Self::Sun8iT113),
            _ => None,
        }
    }

    /// Resolves and maps the method's register blocks into `ctx`.
    ///
    /// Runs once, before any secondary core is started. Failures are logged
    /// and leave the affected handle unset; they are not fatal here, but every
    /// later [`boot_secondary`](Self::boot_secondary) will fail fast. The T113
    /// method has no discovery step.
    pub fn prepare_cpus<E: BootEnv>(self, ctx: &MpContext<E>, env: &E) {
        match self {
            Self::Sun6i => sun6i::prepare_cpus(ctx, env),
            Self::Sun8i => sun8i::prepare_cpus(ctx, env),
            Self::Sun8iT113 => {}
        }
    }

    /// Releases `cpu` from reset so it starts fetching at the context's
    /// secondary entry address.
    ///
    /// Whether the core actually comes alive is not checked here; the caller
    /// owns liveness confirmation and any retry policy.
    pub fn boot_secondary<E: BootEnv>(self, ctx: &MpContext<E>, env: &E, cpu: usize) -> AxResult {
        match self {
            Self::Sun6i => sun6i::boot_secondary(ctx, env, cpu),
            Self::Sun8i => sun8i::boot_secondary(ctx, env, cpu),
            Self::Sun8iT113 => sun8i_t113::boot_secondary(ctx, env, cpu),
        }
    }
}
